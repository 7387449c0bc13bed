/// Configuration schema and defaults for portwatch.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[agent]`, `[agent.timeouts]`, `[session]`, `[web]`, and `[logging]`.
///
/// Every field has a built-in default. Users only need to set the values
/// they want to override.
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level portwatch configuration.
///
/// Maps directly to the `~/.portwatch/config.toml` and `.portwatch.toml`
/// file schemas. Missing sections and fields fall back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortwatchConfig {
    pub agent: AgentConfig,
    pub session: SessionConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [agent]
// ---------------------------------------------------------------------------

/// Remote AI agent service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Base URL of the agent service. Endpoint paths (`/api/chat`, ...) are
    /// appended to it.
    pub base_url: String,
    /// Per-endpoint request timeouts.
    pub timeouts: TimeoutsConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeouts: TimeoutsConfig::default(),
        }
    }
}

/// Request timeouts in seconds, one per remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutsConfig {
    /// `GET /api/health`
    pub health: u64,
    /// `POST /api/chat`
    pub chat: u64,
    /// `POST /api/analyze_route`
    pub route: u64,
    /// `POST /api/generate_report`
    pub report: u64,
    /// `POST /api/clear_history`
    pub history: u64,
    /// `GET /api/port_risks`
    pub ports: u64,
    /// `GET /api/generate_pdf_report`
    pub pdf: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            health: 5,
            chat: 45,
            route: 30,
            report: 60,
            history: 10,
            ports: 10,
            pdf: 30,
        }
    }
}

impl TimeoutsConfig {
    pub fn health(&self) -> Duration {
        Duration::from_secs(self.health)
    }

    pub fn chat(&self) -> Duration {
        Duration::from_secs(self.chat)
    }

    pub fn route(&self) -> Duration {
        Duration::from_secs(self.route)
    }

    pub fn report(&self) -> Duration {
        Duration::from_secs(self.report)
    }

    pub fn history(&self) -> Duration {
        Duration::from_secs(self.history)
    }

    pub fn ports(&self) -> Duration {
        Duration::from_secs(self.ports)
    }

    pub fn pdf(&self) -> Duration {
        Duration::from_secs(self.pdf)
    }
}

// ---------------------------------------------------------------------------
// [session]
// ---------------------------------------------------------------------------

/// Conversation session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of trailing turns checked for an identical user turn before a
    /// quick-action query is appended.
    pub dedup_window: usize,
    /// Number of remote conversation-history lines shown under a reply.
    pub history_display: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dedup_window: 5,
            history_display: 6,
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

/// Embedded dashboard server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Address the dashboard binds to.
    pub bind: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8501".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Activity log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append one JSONL line per remote call to `~/.portwatch/activity.jsonl`.
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl PortwatchConfig {
    /// The annotated default config written by `portwatch config init`.
    pub fn default_toml() -> String {
        r#"# portwatch Configuration
# Supply-chain risk dashboard for a remote AI agent service
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (PORTWATCH_*)
#   2. Project config (.portwatch.toml in current directory)
#   3. User global config (~/.portwatch/config.toml)
#   4. Built-in defaults

[agent]
base_url = "http://127.0.0.1:8000"   # or PORTWATCH_API_URL

[agent.timeouts]                      # seconds
health = 5
chat = 45
route = 30
report = 60
history = 10
ports = 10
pdf = 30

[session]
dedup_window = 5                      # trailing turns checked before a quick action re-fires
history_display = 6                   # remote history lines shown under a reply

[web]
bind = "127.0.0.1:8501"
open_browser = true

[logging]
enabled = true                        # ~/.portwatch/activity.jsonl
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = PortwatchConfig::default();
        assert_eq!(config.agent.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.agent.timeouts.health, 5);
        assert_eq!(config.agent.timeouts.chat, 45);
        assert_eq!(config.agent.timeouts.route, 30);
        assert_eq!(config.agent.timeouts.report, 60);
        assert_eq!(config.agent.timeouts.history, 10);
        assert_eq!(config.session.dedup_window, 5);
        assert_eq!(config.web.bind, "127.0.0.1:8501");
        assert!(config.logging.enabled);
    }

    #[test]
    fn deserialize_minimal_toml() {
        let toml_str = r#"
[agent]
base_url = "http://agent.internal:9000"
"#;
        let config: PortwatchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.agent.base_url, "http://agent.internal:9000");
        // Nested table still falls back to defaults
        assert_eq!(config.agent.timeouts, TimeoutsConfig::default());
        assert_eq!(config.session.dedup_window, 5);
    }

    #[test]
    fn deserialize_partial_timeouts() {
        let toml_str = r#"
[agent.timeouts]
chat = 90
"#;
        let config: PortwatchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.agent.timeouts.chat, 90);
        assert_eq!(config.agent.timeouts.report, 60);
        assert_eq!(config.agent.timeouts.chat(), Duration::from_secs(90));
    }

    #[test]
    fn empty_toml_produces_defaults() {
        let config: PortwatchConfig = toml::from_str("").unwrap();
        assert_eq!(config.agent.base_url, "http://127.0.0.1:8000");
        assert!(config.web.open_browser);
    }

    #[test]
    fn default_toml_parses_back() {
        let config: PortwatchConfig = toml::from_str(&PortwatchConfig::default_toml()).unwrap();
        assert_eq!(config.agent.timeouts, TimeoutsConfig::default());
        assert_eq!(config.session.history_display, 6);
        assert!(config.logging.enabled);
    }
}
