use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Activity log entry (JSONL analytics)
// ---------------------------------------------------------------------------

/// A single entry in the activity log (`~/.portwatch/activity.jsonl`).
///
/// One entry is written per remote agent call, whether it succeeded or
/// degraded. Used by the reporter for `portwatch activity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: String,
    /// Conversation identifier of the client that made the call.
    #[serde(default)]
    pub conversation_id: String,
    /// Remote endpoint path, e.g. `/api/chat`.
    pub endpoint: String,
    pub success: bool,
    pub latency_ms: u64,
    /// `transport`, `status`, or `decode` when the call failed.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Logging functions
// ---------------------------------------------------------------------------

/// Record one remote call. Best-effort: I/O failures are ignored.
pub fn log_call(
    conversation_id: &str,
    endpoint: &str,
    latency_ms: u64,
    failure: Option<(&str, String)>,
) {
    let (error_kind, error) = match failure {
        Some((kind, message)) => (Some(kind.to_string()), Some(message)),
        None => (None, None),
    };

    let entry = ActivityEntry {
        timestamp: Utc::now().to_rfc3339(),
        conversation_id: conversation_id.to_string(),
        endpoint: endpoint.to_string(),
        success: error_kind.is_none(),
        latency_ms,
        error_kind,
        error,
    };

    let _ = append_log_entry(&entry);
}

// ---------------------------------------------------------------------------
// Reading log entries
// ---------------------------------------------------------------------------

/// Read all entries from `~/.portwatch/activity.jsonl`.
///
/// Silently skips malformed lines. Returns an empty vec if the file does not
/// exist or cannot be read.
pub fn read_all_entries() -> Vec<ActivityEntry> {
    let Some(path) = activity_log_path() else {
        return Vec::new();
    };

    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<ActivityEntry>(&line).ok())
        .collect()
}

/// Read entries from the last `days` days, or all entries for `None`.
pub fn read_entries_since_days(days: Option<u32>) -> Vec<ActivityEntry> {
    let entries = read_all_entries();

    let Some(days) = days else {
        return entries;
    };

    let cutoff = (Utc::now() - chrono::Duration::days(i64::from(days))).to_rfc3339();

    entries
        .into_iter()
        .filter(|e| e.timestamp >= cutoff)
        .collect()
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

fn append_log_entry(entry: &ActivityEntry) -> Result<()> {
    let Some(path) = activity_log_path() else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Return the path to the activity log file.
pub fn activity_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".portwatch").join("activity.jsonl"))
}
