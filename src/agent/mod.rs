//! HTTP client for the remote AI agent service.
//!
//! The client is the only component that talks to the service. Every
//! endpoint has two layers:
//!
//! - `try_*` methods return `Result<T, NetworkError>` so callers and tests
//!   can see exactly why a call failed.
//! - The contract methods (`send_message`, `analyze_route`, ...) wrap them
//!   and always return something renderable: a failed chat carries an error
//!   text, route and report calls return `None`, port risks fall back to a
//!   built-in set.
//!
//! Requests are blocking (`ureq`) with a per-endpoint timeout from
//! `[agent.timeouts]`. There is no retry: one failure is reported as-is.

pub mod error;
pub mod types;

use std::io::Read;
use std::time::{Duration, Instant};

use chrono::Local;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::analytics::logger;
use crate::config::PortwatchConfig;
use crate::config::schema::TimeoutsConfig;

pub use error::NetworkError;
pub use types::{
    AnalysisResult, ChatOutcome, ChatReply, HealthResponse, HealthStatus, PortRiskRecord,
    ReportResult, RiskLevel, RouteAnalysis, fallback_port_risks,
};
use types::{ChatRequest, PortRisksResponse, ReportRequest, RouteRequest};

/// Upper bound on a downloaded PDF body.
const MAX_PDF_BYTES: u64 = 50 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// Remote endpoints consumed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Health,
    Chat,
    AnalyzeRoute,
    GenerateReport,
    ClearHistory,
    PortRisks,
    PdfReport,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Health => "/api/health",
            Self::Chat => "/api/chat",
            Self::AnalyzeRoute => "/api/analyze_route",
            Self::GenerateReport => "/api/generate_report",
            Self::ClearHistory => "/api/clear_history",
            Self::PortRisks => "/api/port_risks",
            Self::PdfReport => "/api/generate_pdf_report",
        }
    }

    pub fn timeout(self, timeouts: &TimeoutsConfig) -> Duration {
        match self {
            Self::Health => timeouts.health(),
            Self::Chat => timeouts.chat(),
            Self::AnalyzeRoute => timeouts.route(),
            Self::GenerateReport => timeouts.report(),
            Self::ClearHistory => timeouts.history(),
            Self::PortRisks => timeouts.ports(),
            Self::PdfReport => timeouts.pdf(),
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Blocking client bound to one conversation.
///
/// The conversation identifier is derived from the creation time
/// (`conv_YYYYMMDD_HHMMSS`) and never changes for the client's lifetime.
#[derive(Debug, Clone)]
pub struct AgentClient {
    base_url: String,
    conversation_id: String,
    timeouts: TimeoutsConfig,
    log_activity: bool,
}

impl AgentClient {
    /// Client with default timeouts and the activity log disabled.
    pub fn new(base_url: &str) -> Self {
        Self {
            // "localhost" may resolve to ::1 first and stall when the
            // service only listens on IPv4.
            base_url: base_url
                .trim_end_matches('/')
                .replace("://localhost", "://127.0.0.1"),
            conversation_id: new_conversation_id(),
            timeouts: TimeoutsConfig::default(),
            log_activity: false,
        }
    }

    /// Build a client from the resolved config.
    pub fn from_config(config: &PortwatchConfig) -> Self {
        Self::new(&config.agent.base_url)
            .with_timeouts(config.agent.timeouts.clone())
            .with_activity_log(config.logging.enabled)
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutsConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Replace the generated conversation id.
    pub fn with_conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = id.into();
        self
    }

    pub fn with_activity_log(mut self, enabled: bool) -> Self {
        self.log_activity = enabled;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    // -- Typed calls --

    /// `POST /api/chat`
    pub fn try_send_message(&self, text: &str) -> Result<ChatReply, NetworkError> {
        self.call(Endpoint::Chat, || {
            let resp = self.post_json(Endpoint::Chat, &ChatRequest { message: text })?;
            decode(resp)
        })
    }

    /// `POST /api/analyze_route`
    pub fn try_analyze_route(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<RouteAnalysis, NetworkError> {
        self.call(Endpoint::AnalyzeRoute, || {
            let body = RouteRequest {
                origin,
                destination,
            };
            let resp = self.post_json(Endpoint::AnalyzeRoute, &body)?;
            decode(resp)
        })
    }

    /// `POST /api/generate_report`
    pub fn try_generate_report(&self, report_type: &str) -> Result<ReportResult, NetworkError> {
        self.call(Endpoint::GenerateReport, || {
            let resp = self.post_json(Endpoint::GenerateReport, &ReportRequest { report_type })?;
            decode(resp)
        })
    }

    /// `POST /api/clear_history`
    pub fn try_clear_history(&self) -> Result<(), NetworkError> {
        self.call(Endpoint::ClearHistory, || {
            let resp = ureq::post(&self.url(Endpoint::ClearHistory))
                .timeout(Endpoint::ClearHistory.timeout(&self.timeouts))
                .call()?;
            expect_ok(resp).map(|_| ())
        })
    }

    /// `GET /api/port_risks`
    pub fn try_fetch_port_risks(&self) -> Result<Vec<PortRiskRecord>, NetworkError> {
        self.call(Endpoint::PortRisks, || {
            let resp = self.get(Endpoint::PortRisks)?;
            decode::<PortRisksResponse>(resp).map(|r| r.data)
        })
    }

    /// `GET /api/health`
    pub fn try_check_health(&self) -> Result<HealthResponse, NetworkError> {
        self.call(Endpoint::Health, || {
            let resp = self.get(Endpoint::Health)?;
            decode(resp)
        })
    }

    /// `GET /api/generate_pdf_report`: the raw PDF bytes.
    pub fn try_fetch_pdf_report(&self) -> Result<Vec<u8>, NetworkError> {
        self.call(Endpoint::PdfReport, || {
            let resp = self.get(Endpoint::PdfReport)?;
            read_limited(resp.into_reader(), MAX_PDF_BYTES)
        })
    }

    // -- Degrading contract --

    /// Send a chat message. Failures become an unsuccessful outcome whose
    /// response text describes the problem.
    pub fn send_message(&self, text: &str) -> ChatOutcome {
        match self.try_send_message(text) {
            Ok(reply) => reply.into(),
            Err(e) => ChatOutcome {
                response: e.user_message(),
                history: Vec::new(),
                agent_used: false,
                success: false,
            },
        }
    }

    /// Analyze a route, or `None` when no analysis is available.
    pub fn analyze_route(&self, origin: &str, destination: &str) -> Option<RouteAnalysis> {
        self.try_analyze_route(origin, destination).ok()
    }

    /// Generate a report, or `None` when the service could not.
    pub fn generate_report(&self, report_type: &str) -> Option<ReportResult> {
        self.try_generate_report(report_type).ok()
    }

    /// Ask the service to forget the conversation. `true` only on a 200.
    pub fn clear_history(&self) -> bool {
        self.try_clear_history().is_ok()
    }

    /// Port risk records; the built-in fallback set on any failure or when
    /// the service has no records.
    pub fn fetch_port_risks(&self) -> Vec<PortRiskRecord> {
        match self.try_fetch_port_risks() {
            Ok(records) if !records.is_empty() => records,
            _ => fallback_port_risks(),
        }
    }

    /// Connection status for UI annotation.
    pub fn check_health(&self) -> HealthStatus {
        match self.try_check_health() {
            Ok(health) => HealthStatus {
                connected: true,
                agent_initialized: health.agent_initialized,
            },
            Err(_) => HealthStatus::default(),
        }
    }

    /// The PDF report, or `None` unless the service answered 200.
    pub fn fetch_pdf_report(&self) -> Option<Vec<u8>> {
        self.try_fetch_pdf_report().ok()
    }

    // -- Internal --

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    fn get(&self, endpoint: Endpoint) -> Result<ureq::Response, NetworkError> {
        let resp = ureq::get(&self.url(endpoint))
            .timeout(endpoint.timeout(&self.timeouts))
            .call()?;
        expect_ok(resp)
    }

    fn post_json<T: Serialize>(
        &self,
        endpoint: Endpoint,
        body: &T,
    ) -> Result<ureq::Response, NetworkError> {
        let resp = ureq::post(&self.url(endpoint))
            .timeout(endpoint.timeout(&self.timeouts))
            .send_json(body)?;
        expect_ok(resp)
    }

    /// Run one call, recording its outcome in the activity log.
    fn call<T>(
        &self,
        endpoint: Endpoint,
        f: impl FnOnce() -> Result<T, NetworkError>,
    ) -> Result<T, NetworkError> {
        let start = Instant::now();
        let result = f();

        if self.log_activity {
            let latency_ms = start.elapsed().as_millis() as u64;
            let failure = result.as_ref().err().map(|e| (e.kind(), e.to_string()));
            logger::log_call(&self.conversation_id, endpoint.path(), latency_ms, failure);
        }

        result
    }
}

/// `ureq` only errors on 4xx/5xx; anything else that isn't 200 is still a
/// protocol failure here.
fn expect_ok(resp: ureq::Response) -> Result<ureq::Response, NetworkError> {
    if resp.status() == 200 {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.into_string().unwrap_or_default();
    Err(NetworkError::Status { status, body })
}

fn decode<T: DeserializeOwned>(resp: ureq::Response) -> Result<T, NetworkError> {
    resp.into_json::<T>()
        .map_err(|e| NetworkError::decode(e.to_string()))
}

/// Read a whole body of at most `limit` bytes. A longer body is a decode
/// error rather than a truncated result.
fn read_limited(reader: impl Read, limit: u64) -> Result<Vec<u8>, NetworkError> {
    let mut bytes = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| NetworkError::transport(format!("failed reading body: {e}")))?;
    if bytes.len() as u64 > limit {
        return Err(NetworkError::decode(format!("body exceeds {limit} bytes")));
    }
    Ok(bytes)
}

/// Timestamp-derived conversation token, e.g. `conv_20250301_093012`.
pub fn new_conversation_id() -> String {
    format!("conv_{}", Local::now().format("%Y%m%d_%H%M%S"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
