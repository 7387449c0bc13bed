//! Request and response shapes for the remote agent service.
//!
//! Response types are resolved into Rust types once, at the client
//! boundary, so views never inspect raw JSON.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body for `POST /api/chat`.
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
}

/// Body for `POST /api/analyze_route`.
#[derive(Debug, Serialize)]
pub(crate) struct RouteRequest<'a> {
    pub origin: &'a str,
    pub destination: &'a str,
}

/// Body for `POST /api/generate_report`.
#[derive(Debug, Serialize)]
pub(crate) struct ReportRequest<'a> {
    pub report_type: &'a str,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Successful `POST /api/chat` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
    /// Server-side transcript as `User: ...` / `Assistant: ...` lines.
    #[serde(default)]
    pub conversation_history: Vec<String>,
    #[serde(default)]
    pub agent_used: bool,
}

/// Uniform chat result handed to views. Never an error.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOutcome {
    /// The assistant reply, or a human-readable error on failure.
    pub response: String,
    pub history: Vec<String>,
    pub agent_used: bool,
    pub success: bool,
}

impl From<ChatReply> for ChatOutcome {
    fn from(reply: ChatReply) -> Self {
        Self {
            response: reply.response,
            history: reply.conversation_history,
            agent_used: reply.agent_used,
            success: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Route analysis
// ---------------------------------------------------------------------------

/// The `analysis` field of a route analysis: free text or a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Text(String),
    Structured(Map<String, Value>),
}

/// Route risk shown for a text-only analysis.
const TEXT_ANALYSIS_RISK: f64 = 0.25;

/// Risk level shown when the analysis does not state one.
const DEFAULT_ROUTE_LEVEL: &str = "MEDIUM";

impl AnalysisResult {
    /// `overall_risk` from a structured analysis (0.0 when absent), or the
    /// fixed text-analysis figure.
    pub fn overall_risk(&self) -> f64 {
        match self {
            Self::Text(_) => TEXT_ANALYSIS_RISK,
            Self::Structured(map) => map
                .get("overall_risk")
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
        }
    }

    /// `risk_level` from a structured analysis, `MEDIUM` otherwise.
    pub fn risk_level(&self) -> String {
        match self {
            Self::Text(_) => DEFAULT_ROUTE_LEVEL.to_string(),
            Self::Structured(map) => map
                .get("risk_level")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_ROUTE_LEVEL)
                .to_string(),
        }
    }
}

/// `POST /api/analyze_route` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteAnalysis {
    #[serde(default)]
    pub success: bool,
    pub analysis: AnalysisResult,
    #[serde(default)]
    pub agent_used: bool,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// `POST /api/generate_report` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub report: String,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// Wire shape of `GET /api/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub agent_initialized: bool,
}

/// Connection status used to annotate the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub connected: bool,
    pub agent_initialized: bool,
}

// ---------------------------------------------------------------------------
// Port risks
// ---------------------------------------------------------------------------

/// Coarse risk classification assigned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "LOW", alias = "low", alias = "Low")]
    Low,
    #[serde(rename = "MEDIUM", alias = "medium", alias = "Medium")]
    Medium,
    #[serde(rename = "HIGH", alias = "high", alias = "High")]
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One monitored port as reported by `GET /api/port_risks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortRiskRecord {
    pub port_name: String,
    pub country: String,
    /// Continuous risk score in `[0, 1]`.
    pub overall_risk: f64,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub nearby_disasters_count: u32,
    #[serde(default)]
    pub news_mentions: u32,
}

/// Wire shape of `GET /api/port_risks`.
#[derive(Debug, Deserialize)]
pub(crate) struct PortRisksResponse {
    pub data: Vec<PortRiskRecord>,
}

/// Records shown when the service cannot supply port risks.
pub fn fallback_port_risks() -> Vec<PortRiskRecord> {
    [
        ("Shanghai", "China", 0.24),
        ("Los Angeles", "USA", 0.266),
        ("Hong Kong", "China", 0.277),
    ]
    .into_iter()
    .map(|(port_name, country, overall_risk)| PortRiskRecord {
        port_name: port_name.to_string(),
        country: country.to_string(),
        overall_risk,
        risk_level: RiskLevel::Low,
        nearby_disasters_count: 0,
        news_mentions: 0,
    })
    .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_resolves_text_variant() {
        let route: RouteAnalysis = serde_json::from_str(
            r#"{"success": true, "analysis": "Route is clear", "agent_used": false}"#,
        )
        .unwrap();
        assert_eq!(route.analysis, AnalysisResult::Text("Route is clear".to_string()));
        assert_eq!(route.analysis.overall_risk(), 0.25);
        assert_eq!(route.analysis.risk_level(), "MEDIUM");
    }

    #[test]
    fn analysis_resolves_structured_variant() {
        let route: RouteAnalysis = serde_json::from_str(
            r#"{"success": true, "analysis": {"overall_risk": 0.41, "risk_level": "HIGH"}, "agent_used": true}"#,
        )
        .unwrap();
        assert!(matches!(route.analysis, AnalysisResult::Structured(_)));
        assert!((route.analysis.overall_risk() - 0.41).abs() < 1e-9);
        assert_eq!(route.analysis.risk_level(), "HIGH");
        assert!(route.agent_used);
    }

    #[test]
    fn structured_analysis_defaults_missing_fields() {
        let analysis: AnalysisResult = serde_json::from_str(r#"{"notes": "n/a"}"#).unwrap();
        assert_eq!(analysis.overall_risk(), 0.0);
        assert_eq!(analysis.risk_level(), "MEDIUM");
    }

    #[test]
    fn port_record_defaults_missing_counts() {
        let record: PortRiskRecord = serde_json::from_str(
            r#"{"port_name": "Busan", "country": "South Korea", "overall_risk": 0.5, "risk_level": "HIGH"}"#,
        )
        .unwrap();
        assert_eq!(record.risk_level, RiskLevel::High);
        assert_eq!(record.nearby_disasters_count, 0);
        assert_eq!(record.news_mentions, 0);
    }

    #[test]
    fn port_record_rejects_unknown_level() {
        let result = serde_json::from_str::<PortRiskRecord>(
            r#"{"port_name": "Busan", "country": "KR", "overall_risk": 0.5, "risk_level": "SEVERE"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn fallback_set_matches_documented_values() {
        let records = fallback_port_risks();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].port_name, "Shanghai");
        assert_eq!(records[0].country, "China");
        assert_eq!(records[0].overall_risk, 0.24);
        assert_eq!(records[1].port_name, "Los Angeles");
        assert_eq!(records[1].overall_risk, 0.266);
        assert_eq!(records[2].port_name, "Hong Kong");
        assert_eq!(records[2].overall_risk, 0.277);
        assert!(records.iter().all(|r| r.risk_level == RiskLevel::Low));
    }

    #[test]
    fn chat_reply_tolerates_missing_optional_fields() {
        let reply: ChatReply = serde_json::from_str(r#"{"response": "hi"}"#).unwrap();
        let outcome = ChatOutcome::from(reply);
        assert!(outcome.success);
        assert!(!outcome.agent_used);
        assert!(outcome.history.is_empty());
    }
}
