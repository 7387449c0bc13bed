//! Route analysis view.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::agent::{AgentClient, AnalysisResult, ChatOutcome, PortRiskRecord, RouteAnalysis};

use super::assistant::uses_tools;

/// Port choices for the origin/destination selectors.
#[derive(Debug, Clone, Serialize)]
pub struct RouteForm {
    pub ports: Vec<String>,
    pub default_origin: Option<String>,
    pub default_destination: Option<String>,
}

impl RouteForm {
    /// Defaults are the first and second port; a single port serves as both.
    pub fn from_records(records: &[PortRiskRecord]) -> Self {
        let ports: Vec<String> = records.iter().map(|r| r.port_name.clone()).collect();
        let default_origin = ports.first().cloned();
        let default_destination = ports.get(1).or(ports.first()).cloned();
        Self {
            ports,
            default_origin,
            default_destination,
        }
    }
}

/// Body of a route analysis as rendered.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnalysisView {
    Text { text: String, uses_tools: bool },
    Structured { fields: Map<String, Value> },
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteView {
    pub origin: String,
    pub destination: String,
    pub route_risk: f64,
    pub risk_level: String,
    pub agent_used: bool,
    /// "Enhanced" when the agent produced the analysis, "Standard" otherwise.
    pub analysis_type: &'static str,
    pub analysis: AnalysisView,
}

impl RouteView {
    /// `None` unless the service reported success.
    pub fn from_analysis(origin: &str, destination: &str, result: RouteAnalysis) -> Option<Self> {
        if !result.success {
            return None;
        }
        let analysis = &result.analysis;
        let route_risk = analysis.overall_risk();
        let risk_level = analysis.risk_level();

        Some(Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            route_risk,
            risk_level,
            agent_used: result.agent_used,
            analysis_type: if result.agent_used { "Enhanced" } else { "Standard" },
            analysis: match result.analysis {
                AnalysisResult::Text(text) => AnalysisView::Text {
                    uses_tools: uses_tools(&text),
                    text,
                },
                AnalysisResult::Structured(fields) => AnalysisView::Structured { fields },
            },
        })
    }
}

pub fn analyze(client: &AgentClient, origin: &str, destination: &str) -> Option<RouteView> {
    let result = client.analyze_route(origin, destination)?;
    RouteView::from_analysis(origin, destination, result)
}

pub fn follow_up_prompt(origin: &str, destination: &str, question: &str) -> String {
    format!("Regarding the route {origin} to {destination}: {question}")
}

/// Follow-up questions go through the regular chat endpoint.
pub fn follow_up(
    client: &AgentClient,
    origin: &str,
    destination: &str,
    question: &str,
) -> ChatOutcome {
    client.send_message(&follow_up_prompt(origin, destination, question))
}
