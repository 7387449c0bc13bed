//! View renderers. Each view is built from session state plus client
//! results and serialized as-is to the web frontend or printed by the CLI.

pub mod assistant;
pub mod dashboard;
pub mod reports;
pub mod routes;
