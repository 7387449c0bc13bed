//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint, borrows the caller's
//! [`UserSession`], and returns a `Response<Cursor<Vec<u8>>>`.

use std::io::Cursor;

use anyhow::{Context, Result};
use chrono::Local;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use crate::agent::HealthStatus;
use crate::session::QuickAction;
use crate::session::store::UserSession;
use crate::views::assistant::{self, AssistantView, ChatView};
use crate::views::dashboard::DashboardSummary;
use crate::views::reports::{self, PDF_UNAVAILABLE, ReportType, ReportView};
use crate::views::routes::{self, RouteForm, RouteView};

use super::{BadRequest, content_type_json, header};

type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatBody {
    message: String,
}

#[derive(Deserialize)]
struct QuickActionBody {
    action: String,
}

#[derive(Debug, Deserialize)]
struct RouteBody {
    origin: String,
    destination: String,
}

#[derive(Deserialize)]
struct FollowUpBody {
    origin: String,
    destination: String,
    question: String,
}

#[derive(Deserialize)]
struct ReportBody {
    report_type: String,
}

#[derive(Deserialize)]
struct CustomReportBody {
    focus: String,
}

#[derive(Serialize)]
struct StatusResponse<'a> {
    #[serde(flatten)]
    health: HealthStatus,
    base_url: &'a str,
    conversation_id: &'a str,
}

/// Chat-like interactions return the outcome plus the refreshed transcript.
#[derive(Serialize)]
struct ChatResponse {
    /// `None` when nothing was sent (suppressed quick action).
    chat: Option<ChatView>,
    view: AssistantView,
}

#[derive(Serialize)]
struct ClearResponse {
    cleared: bool,
    view: AssistantView,
}

#[derive(Serialize)]
struct RouteResponse {
    result: Option<RouteView>,
}

#[derive(Serialize)]
struct ReportResponse {
    report: Option<ReportView>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
pub(crate) fn json_response<T: Serialize>(data: &T) -> Result<HttpResponse> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// Parse a JSON request body; malformed bodies are the client's fault.
fn parse_body<T: DeserializeOwned>(body: Option<&str>) -> Result<T> {
    let body = body.unwrap_or("");
    serde_json::from_str(body)
        .map_err(|e| BadRequest(format!("invalid request body: {e}")).into())
}

fn attachment(data: Vec<u8>, mime: &str, filename: &str) -> HttpResponse {
    Response::from_data(data)
        .with_header(header("Content-Type", mime))
        .with_header(header(
            "Content-Disposition",
            &format!("attachment; filename=\"{filename}\""),
        ))
        .with_status_code(StatusCode(200))
}

fn chat_response(session: &UserSession, chat: Option<ChatView>) -> Result<HttpResponse> {
    json_response(&ChatResponse {
        chat,
        view: assistant::render(session.conversation_id(), &session.conversation),
    })
}

// ---------------------------------------------------------------------------
// Assistant
// ---------------------------------------------------------------------------

/// `GET /api/status`: remote service health for the header badges.
pub fn get_status(session: &UserSession) -> Result<HttpResponse> {
    json_response(&StatusResponse {
        health: session.client.check_health(),
        base_url: session.client.base_url(),
        conversation_id: session.conversation_id(),
    })
}

/// `GET /api/session`: the current transcript.
pub fn get_session(session: &UserSession) -> Result<HttpResponse> {
    chat_response(session, None)
}

/// `POST /api/chat`: `{ "message": "..." }`
pub fn post_chat(
    session: &mut UserSession,
    body: Option<&str>,
    history_display: usize,
) -> Result<HttpResponse> {
    let req: ChatBody = parse_body(body)?;
    let outcome = assistant::submit_message(&session.client, &mut session.conversation, &req.message)
        .ok_or_else(|| BadRequest("message must not be empty".to_string()))?;

    let chat = ChatView::from_outcome(&outcome, history_display);
    chat_response(session, Some(chat))
}

/// `POST /api/quick_action`: `{ "action": "shanghai" }`
pub fn post_quick_action(
    session: &mut UserSession,
    body: Option<&str>,
    history_display: usize,
) -> Result<HttpResponse> {
    let req: QuickActionBody = parse_body(body)?;
    let action: QuickAction = req
        .action
        .parse()
        .map_err(|e: anyhow::Error| BadRequest(e.to_string()))?;

    let chat = assistant::trigger_quick_action(&session.client, &mut session.conversation, action)
        .map(|outcome| ChatView::from_outcome(&outcome, history_display));
    chat_response(session, chat)
}

/// `POST /api/clear`: clear remote and local history.
pub fn post_clear(session: &mut UserSession) -> Result<HttpResponse> {
    let cleared = assistant::clear_conversation(&session.client, &mut session.conversation);
    json_response(&ClearResponse {
        cleared,
        view: assistant::render(session.conversation_id(), &session.conversation),
    })
}

// ---------------------------------------------------------------------------
// Dashboard and routes
// ---------------------------------------------------------------------------

/// `GET /api/dashboard`: KPIs, distribution, top ports, map points.
pub fn get_dashboard(session: &UserSession) -> Result<HttpResponse> {
    let records = session.client.fetch_port_risks();
    json_response(&DashboardSummary::from_records(&records))
}

/// `GET /api/ports`: origin/destination choices.
pub fn get_ports(session: &UserSession) -> Result<HttpResponse> {
    let records = session.client.fetch_port_risks();
    json_response(&RouteForm::from_records(&records))
}

/// `POST /api/route`: `{ "origin": "...", "destination": "..." }`
pub fn post_route(session: &UserSession, body: Option<&str>) -> Result<HttpResponse> {
    let req: RouteBody = parse_body(body)?;
    let result = routes::analyze(&session.client, &req.origin, &req.destination);
    json_response(&RouteResponse { result })
}

/// `POST /api/route/follow_up`: `{ "origin", "destination", "question" }`
pub fn post_route_follow_up(
    session: &UserSession,
    body: Option<&str>,
    history_display: usize,
) -> Result<HttpResponse> {
    let req: FollowUpBody = parse_body(body)?;
    if req.question.trim().is_empty() {
        return Err(BadRequest("question must not be empty".to_string()).into());
    }
    let outcome = routes::follow_up(
        &session.client,
        &req.origin,
        &req.destination,
        req.question.trim(),
    );
    json_response(&ChatView::from_outcome(&outcome, history_display))
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// `GET /api/report_types`
pub fn get_report_types() -> Result<HttpResponse> {
    json_response(&reports::report_types())
}

/// `POST /api/report`: `{ "report_type": "Executive Summary" }`
pub fn post_report(session: &mut UserSession, body: Option<&str>) -> Result<HttpResponse> {
    let req: ReportBody = parse_body(body)?;
    let report_type: ReportType = req
        .report_type
        .parse()
        .map_err(|e: anyhow::Error| BadRequest(e.to_string()))?;

    // A failed generation leaves the previous report downloadable.
    let stored = reports::generate(&session.client, report_type);
    let report = stored.as_ref().map(ReportView::from_stored);
    if stored.is_some() {
        session.last_report = stored;
    }
    json_response(&ReportResponse { report })
}

/// `GET /api/report/text`: download the last report as text.
pub fn get_report_text(session: &UserSession) -> Result<HttpResponse> {
    let Some(stored) = &session.last_report else {
        return Err(BadRequest("no report has been generated yet".to_string()).into());
    };
    let filename = reports::report_filename(stored.generated_at, "txt");
    Ok(attachment(
        stored.text.clone().into_bytes(),
        "text/plain; charset=utf-8",
        &filename,
    ))
}

/// `GET /api/report/pdf`: proxy the PDF from the service.
pub fn get_report_pdf(session: &UserSession) -> Result<HttpResponse> {
    let at = session
        .last_report
        .as_ref()
        .map_or_else(Local::now, |r| r.generated_at);

    match session.client.fetch_pdf_report() {
        Some(bytes) => Ok(attachment(
            bytes,
            "application/pdf",
            &reports::report_filename(at, "pdf"),
        )),
        None => {
            let body = serde_json::json!({ "error": PDF_UNAVAILABLE }).to_string();
            Ok(Response::from_data(body.into_bytes())
                .with_header(content_type_json())
                .with_status_code(StatusCode(503)))
        }
    }
}

/// `POST /api/custom_report`: `{ "focus": "..." }`
pub fn post_custom_report(
    session: &UserSession,
    body: Option<&str>,
    history_display: usize,
) -> Result<HttpResponse> {
    let req: CustomReportBody = parse_body(body)?;
    let outcome = reports::custom_report(&session.client, &req.focus);
    json_response(&ChatView::from_outcome(&outcome, history_display))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
