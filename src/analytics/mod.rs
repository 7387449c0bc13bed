//! Activity analytics: a JSONL log of every remote agent call and the
//! per-endpoint aggregation behind `portwatch activity`.

pub mod logger;
pub mod reporter;
