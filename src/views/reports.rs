//! Report generation and downloads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::agent::{AgentClient, ChatOutcome};
use crate::session::store::StoredReport;

use super::assistant::uses_tools;

/// Shown in place of the PDF download when the service cannot produce one.
pub const PDF_UNAVAILABLE: &str = "PDF generation requires active API connection";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    ExecutiveSummary,
    ComprehensiveAnalysis,
    RegionalFocusAsia,
    DisasterImpact,
    PortPerformance,
}

impl ReportType {
    pub const ALL: [ReportType; 5] = [
        ReportType::ExecutiveSummary,
        ReportType::ComprehensiveAnalysis,
        ReportType::RegionalFocusAsia,
        ReportType::DisasterImpact,
        ReportType::PortPerformance,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ExecutiveSummary => "Executive Summary",
            Self::ComprehensiveAnalysis => "Comprehensive Analysis",
            Self::RegionalFocusAsia => "Regional Focus - Asia",
            Self::DisasterImpact => "Disaster Impact Report",
            Self::PortPerformance => "Port Performance",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::ExecutiveSummary => "Brief overview for management",
            Self::ComprehensiveAnalysis => "Detailed risk assessment",
            Self::RegionalFocusAsia => "Asia-specific risks",
            Self::DisasterImpact => "Natural disaster analysis",
            Self::PortPerformance => "Individual port deep dive",
        }
    }

    /// Value sent as `report_type`: the lower-cased display name.
    pub fn param(self) -> String {
        self.name().to_lowercase()
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportType {
    type Err = anyhow::Error;

    /// Accepts the display name or its lower-cased form, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.param() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|t| t.name()).collect();
                anyhow::anyhow!(
                    "unknown report type '{}' (expected one of: {})",
                    s.trim(),
                    names.join(", ")
                )
            })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportTypeView {
    pub name: &'static str,
    pub description: &'static str,
}

pub fn report_types() -> Vec<ReportTypeView> {
    ReportType::ALL
        .iter()
        .map(|t| ReportTypeView {
            name: t.name(),
            description: t.description(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub report_type: String,
    pub report: String,
    pub uses_tools: bool,
    pub text_filename: String,
    pub pdf_filename: String,
}

impl ReportView {
    pub fn from_stored(stored: &StoredReport) -> Self {
        Self {
            report_type: stored.report_type.clone(),
            report: stored.text.clone(),
            uses_tools: uses_tools(&stored.text),
            text_filename: report_filename(stored.generated_at, "txt"),
            pdf_filename: report_filename(stored.generated_at, "pdf"),
        }
    }
}

/// `enhanced_report_YYYYMMDD_HHMM.<ext>`
pub fn report_filename(at: DateTime<Local>, ext: &str) -> String {
    format!("enhanced_report_{}.{ext}", at.format("%Y%m%d_%H%M"))
}

/// Generate a report. `None` unless the service reported success.
pub fn generate(client: &AgentClient, report_type: ReportType) -> Option<StoredReport> {
    let result = client.generate_report(&report_type.param())?;
    if !result.success {
        return None;
    }
    Some(StoredReport {
        report_type: report_type.name().to_string(),
        text: result.report,
        generated_at: Local::now(),
    })
}

pub fn custom_report_prompt(focus: &str) -> String {
    format!("Generate a custom risk intelligence report focusing on: {focus}")
}

/// Custom reports are ordinary chat messages.
pub fn custom_report(client: &AgentClient, focus: &str) -> ChatOutcome {
    client.send_message(&custom_report_prompt(focus.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn report_type_params_are_lowercased_names() {
        let params: Vec<String> = ReportType::ALL.iter().map(|t| t.param()).collect();
        assert_eq!(
            params,
            [
                "executive summary",
                "comprehensive analysis",
                "regional focus - asia",
                "disaster impact report",
                "port performance",
            ]
        );
    }

    #[test]
    fn report_type_parses_any_case() {
        assert_eq!(
            "Regional Focus - Asia".parse::<ReportType>().unwrap(),
            ReportType::RegionalFocusAsia
        );
        assert_eq!(
            "  executive SUMMARY ".parse::<ReportType>().unwrap(),
            ReportType::ExecutiveSummary
        );
        assert!("weekly digest".parse::<ReportType>().is_err());
    }

    #[test]
    fn filenames_use_minute_precision() {
        let at = Local.with_ymd_and_hms(2025, 3, 1, 9, 5, 42).unwrap();
        assert_eq!(report_filename(at, "txt"), "enhanced_report_20250301_0905.txt");
        assert_eq!(report_filename(at, "pdf"), "enhanced_report_20250301_0905.pdf");
    }

    #[test]
    fn custom_prompt_wording() {
        assert_eq!(
            custom_report_prompt("climate risks"),
            "Generate a custom risk intelligence report focusing on: climate risks"
        );
    }

    #[test]
    fn report_view_flags_tools() {
        let stored = StoredReport {
            report_type: "Port Performance".to_string(),
            text: "TOOL: port_stats\nAll good".to_string(),
            generated_at: Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
        };
        let view = ReportView::from_stored(&stored);
        assert!(view.uses_tools);
        assert_eq!(view.text_filename, "enhanced_report_20250102_0304.txt");
    }

    #[test]
    fn five_report_types_with_descriptions() {
        let types = report_types();
        assert_eq!(types.len(), 5);
        assert!(types.iter().all(|t| !t.description.is_empty()));
    }
}
