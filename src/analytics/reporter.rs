//! Activity reporter: per-endpoint aggregation of the activity log.
//!
//! Backs `portwatch activity`: call counts, failure rates, and average
//! latency for each remote endpoint.

use std::collections::HashMap;

use crate::analytics::logger::{self, ActivityEntry};

// ---------------------------------------------------------------------------
// Aggregated stats
// ---------------------------------------------------------------------------

/// Summary statistics over a window of the activity log.
#[derive(Debug)]
pub struct ActivityStats {
    pub total_calls: usize,
    pub total_failures: usize,
    pub endpoint_stats: Vec<EndpointStat>,
}

impl ActivityStats {
    /// Overall failure percentage, 0.0 when there were no calls.
    pub fn failure_pct(&self) -> f64 {
        pct(self.total_failures, self.total_calls)
    }
}

/// Per-endpoint aggregated statistics.
#[derive(Debug, Clone)]
pub struct EndpointStat {
    pub endpoint: String,
    pub calls: usize,
    pub failures: usize,
    pub failure_pct: f64,
    pub avg_latency_ms: u64,
    /// Most frequent error kind among failures, if any.
    pub primary_error: Option<String>,
}

/// Compute stats from the activity log, optionally limited to the last
/// `days` days.
pub fn compute_stats(days: Option<u32>) -> ActivityStats {
    let entries = logger::read_entries_since_days(days);
    build_stats(&entries)
}

fn build_stats(entries: &[ActivityEntry]) -> ActivityStats {
    let total_calls = entries.len();
    let total_failures = entries.iter().filter(|e| !e.success).count();

    let mut groups: HashMap<&str, Vec<&ActivityEntry>> = HashMap::new();
    for entry in entries {
        groups.entry(entry.endpoint.as_str()).or_default().push(entry);
    }

    let mut endpoint_stats: Vec<EndpointStat> = groups
        .into_iter()
        .map(|(endpoint, group)| {
            let calls = group.len();
            let failures = group.iter().filter(|e| !e.success).count();
            let total_latency: u64 = group.iter().map(|e| e.latency_ms).sum();

            let mut error_counts: HashMap<&str, usize> = HashMap::new();
            for kind in group.iter().filter_map(|e| e.error_kind.as_deref()) {
                *error_counts.entry(kind).or_default() += 1;
            }
            let primary_error = error_counts
                .into_iter()
                .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
                .map(|(kind, _)| kind.to_string());

            EndpointStat {
                endpoint: endpoint.to_string(),
                calls,
                failures,
                failure_pct: pct(failures, calls),
                avg_latency_ms: total_latency / calls as u64,
                primary_error,
            }
        })
        .collect();

    // Busiest endpoints first, ties by name for stable output
    endpoint_stats.sort_by(|a, b| b.calls.cmp(&a.calls).then_with(|| a.endpoint.cmp(&b.endpoint)));

    ActivityStats {
        total_calls,
        total_failures,
        endpoint_stats,
    }
}

fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(endpoint: &str, latency_ms: u64, error_kind: Option<&str>) -> ActivityEntry {
        ActivityEntry {
            timestamp: "2025-03-01T09:00:00+00:00".to_string(),
            conversation_id: "conv_20250301_090000".to_string(),
            endpoint: endpoint.to_string(),
            success: error_kind.is_none(),
            latency_ms,
            error_kind: error_kind.map(str::to_string),
            error: error_kind.map(|_| "boom".to_string()),
        }
    }

    fn sample_entries() -> Vec<ActivityEntry> {
        vec![
            entry("/api/chat", 1200, None),
            entry("/api/chat", 800, None),
            entry("/api/chat", 45000, Some("transport")),
            entry("/api/port_risks", 100, Some("status")),
            entry("/api/health", 20, None),
        ]
    }

    #[test]
    fn totals_and_failure_rate() {
        let stats = build_stats(&sample_entries());
        assert_eq!(stats.total_calls, 5);
        assert_eq!(stats.total_failures, 2);
        assert!((stats.failure_pct() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn groups_by_endpoint_busiest_first() {
        let stats = build_stats(&sample_entries());
        let chat = &stats.endpoint_stats[0];
        assert_eq!(chat.endpoint, "/api/chat");
        assert_eq!(chat.calls, 3);
        assert_eq!(chat.failures, 1);
        assert_eq!(chat.avg_latency_ms, 15666);
        assert_eq!(chat.primary_error.as_deref(), Some("transport"));

        let health = stats
            .endpoint_stats
            .iter()
            .find(|s| s.endpoint == "/api/health")
            .unwrap();
        assert!(health.primary_error.is_none());
        assert_eq!(health.failure_pct, 0.0);
    }

    #[test]
    fn empty_log_produces_zeroes() {
        let stats = build_stats(&[]);
        assert_eq!(stats.total_calls, 0);
        assert_eq!(stats.failure_pct(), 0.0);
        assert!(stats.endpoint_stats.is_empty());
    }
}
