/// Agent client tests against an in-process mock service.
///
/// Covers the degrading contract for every endpoint: successful decoding,
/// transport failures (closed local port), non-200 statuses, and malformed
/// bodies.
mod common;

use common::{MockAgent, Reply, closed_port_url, port_risks_json};
use serde_json::json;

use portwatch::agent::{AgentClient, AnalysisResult, NetworkError, RiskLevel, fallback_port_risks};
use portwatch::session::{ConversationSession, QuickAction, Role};
use portwatch::views::assistant;
use portwatch::views::routes::RouteForm;

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[test]
fn check_shanghai_risk_end_to_end() {
    let mock = MockAgent::always(
        200,
        json!({
            "response": "Shanghai risk is LOW",
            "conversation_history": ["User: Check Shanghai risk", "Assistant: Shanghai risk is LOW"],
            "agent_used": true,
        }),
    );
    let client = AgentClient::new(&mock.base_url);
    let mut session = ConversationSession::default();

    let outcome = assistant::submit_message(&client, &mut session, "Check Shanghai risk").unwrap();

    assert!(outcome.success);
    assert!(outcome.agent_used);
    assert_eq!(outcome.history.len(), 2);

    let turns = session.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[0].content, "Check Shanghai risk");
    assert_eq!(turns[1].role, Role::Assistant);
    assert_eq!(turns[1].content, "Shanghai risk is LOW");

    let sent = mock.requests_to("/api/chat");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, "POST");
    assert_eq!(sent[0].json(), json!({ "message": "Check Shanghai risk" }));
}

#[test]
fn chat_transport_failure_keeps_only_user_turn() {
    let client = AgentClient::new(&closed_port_url());
    let mut session = ConversationSession::default();

    let outcome = assistant::submit_message(&client, &mut session, "hello").unwrap();

    assert!(!outcome.success);
    assert!(!outcome.agent_used);
    assert!(outcome.response.starts_with("Connection error: "));
    assert_eq!(session.len(), 1);
    assert_eq!(session.turns()[0].role, Role::User);
}

#[test]
fn chat_status_failure_reports_api_error() {
    let mock = MockAgent::start(|_| Reply::text(500, "agent exploded"));
    let client = AgentClient::new(&mock.base_url);

    let outcome = client.send_message("hello");
    assert!(!outcome.success);
    assert_eq!(outcome.response, "API Error: agent exploded");

    match client.try_send_message("hello") {
        Err(NetworkError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "agent exploded");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn chat_malformed_body_is_decode_error() {
    let mock = MockAgent::start(|_| Reply::text(200, "not json at all"));
    let client = AgentClient::new(&mock.base_url);

    let err = client.try_send_message("hello").unwrap_err();
    assert_eq!(err.kind(), "decode");

    let outcome = client.send_message("hello");
    assert!(!outcome.success);
    assert!(outcome.response.starts_with("API Error: malformed response"));
}

#[test]
fn quick_action_sends_query_once_within_window() {
    let mock = MockAgent::always(
        200,
        json!({ "response": "Shanghai is calm", "conversation_history": [], "agent_used": true }),
    );
    let client = AgentClient::new(&mock.base_url);
    let mut session = ConversationSession::default();

    let first = assistant::trigger_quick_action(&client, &mut session, QuickAction::Shanghai);
    assert!(first.is_some_and(|o| o.success));
    let second = assistant::trigger_quick_action(&client, &mut session, QuickAction::Shanghai);
    assert!(second.is_none());

    let user_turns: Vec<_> = session
        .turns()
        .iter()
        .filter(|t| t.role == Role::User)
        .collect();
    assert_eq!(user_turns.len(), 1);
    assert_eq!(user_turns[0].content, QuickAction::Shanghai.query());

    let sent = mock.requests_to("/api/chat");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].json()["message"], QuickAction::Shanghai.query());
}

// ---------------------------------------------------------------------------
// Clear history
// ---------------------------------------------------------------------------

#[test]
fn clear_history_true_only_on_200() {
    let ok = MockAgent::always(200, json!({ "status": "cleared" }));
    assert!(AgentClient::new(&ok.base_url).clear_history());
    assert_eq!(ok.requests()[0].method, "POST");
    assert_eq!(ok.requests()[0].path, "/api/clear_history");

    let failing = MockAgent::always(500, json!({ "error": "nope" }));
    assert!(!AgentClient::new(&failing.base_url).clear_history());

    assert!(!AgentClient::new(&closed_port_url()).clear_history());
}

#[test]
fn failed_clear_keeps_transcript() {
    let client = AgentClient::new(&closed_port_url());
    let mut session = ConversationSession::default();
    session.append_user_turn("keep me");

    assert!(!assistant::clear_conversation(&client, &mut session));
    assert_eq!(session.len(), 1);
}

#[test]
fn successful_clear_empties_transcript() {
    let mock = MockAgent::always(200, json!({}));
    let client = AgentClient::new(&mock.base_url);
    let mut session = ConversationSession::default();
    session.append_user_turn("forget me");

    assert!(assistant::clear_conversation(&client, &mut session));
    assert!(session.is_empty());
}

// ---------------------------------------------------------------------------
// Port risks
// ---------------------------------------------------------------------------

#[test]
fn port_risks_decode_records() {
    let mock = MockAgent::always(
        200,
        port_risks_json(&[("Busan", 0.45, "HIGH", 3), ("Hamburg", 0.12, "LOW", 0)]),
    );
    let records = AgentClient::new(&mock.base_url).fetch_port_risks();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].port_name, "Busan");
    assert_eq!(records[0].risk_level, RiskLevel::High);
    assert_eq!(records[0].news_mentions, 3);
    assert_eq!(mock.requests()[0].method, "GET");
}

#[test]
fn port_risks_fall_back_on_transport_failure() {
    let client = AgentClient::new(&closed_port_url());
    assert_eq!(client.fetch_port_risks(), fallback_port_risks());
    assert!(client.try_fetch_port_risks().unwrap_err().is_transport());
}

#[test]
fn port_risks_fall_back_on_error_status_and_bad_body() {
    let failing = MockAgent::always(503, json!({ "error": "down" }));
    assert_eq!(
        AgentClient::new(&failing.base_url).fetch_port_risks(),
        fallback_port_risks()
    );

    let malformed = MockAgent::always(200, json!({ "rows": [] }));
    assert_eq!(
        AgentClient::new(&malformed.base_url).fetch_port_risks(),
        fallback_port_risks()
    );
}

#[test]
fn port_risks_fall_back_on_empty_data() {
    let mock = MockAgent::always(200, json!({ "data": [] }));
    let client = AgentClient::new(&mock.base_url);

    let records = client.fetch_port_risks();
    assert_eq!(records, fallback_port_risks());
    assert!(client.try_fetch_port_risks().unwrap().is_empty());

    let form = RouteForm::from_records(&records);
    assert_eq!(form.default_origin.as_deref(), Some("Shanghai"));
    assert_eq!(form.default_destination.as_deref(), Some("Los Angeles"));
}

// ---------------------------------------------------------------------------
// Route analysis and reports
// ---------------------------------------------------------------------------

#[test]
fn analyze_route_sends_ports_and_decodes_structured() {
    let mock = MockAgent::always(
        200,
        json!({
            "success": true,
            "analysis": { "overall_risk": 0.33, "risk_level": "MEDIUM", "factors": ["weather"] },
            "agent_used": true,
        }),
    );
    let client = AgentClient::new(&mock.base_url);

    let route = client.analyze_route("Shanghai", "Los Angeles").unwrap();
    assert!(route.success);
    assert!(matches!(route.analysis, AnalysisResult::Structured(_)));
    assert!((route.analysis.overall_risk() - 0.33).abs() < 1e-9);

    let sent = mock.requests_to("/api/analyze_route");
    assert_eq!(
        sent[0].json(),
        json!({ "origin": "Shanghai", "destination": "Los Angeles" })
    );
}

#[test]
fn analyze_route_and_report_are_none_on_non_200() {
    let mock = MockAgent::always(500, json!({ "error": "boom" }));
    let client = AgentClient::new(&mock.base_url);

    assert!(client.analyze_route("Shanghai", "Busan").is_none());
    assert!(client.generate_report("executive summary").is_none());
}

#[test]
fn analyze_route_and_report_are_none_on_transport_failure() {
    let client = AgentClient::new(&closed_port_url());
    assert!(client.analyze_route("Shanghai", "Busan").is_none());
    assert!(client.generate_report("executive summary").is_none());
}

#[test]
fn generate_report_sends_lowercased_type() {
    let mock = MockAgent::always(200, json!({ "success": true, "report": "All quiet." }));
    let client = AgentClient::new(&mock.base_url);

    let report = client.generate_report("regional focus - asia").unwrap();
    assert!(report.success);
    assert_eq!(report.report, "All quiet.");
    assert_eq!(
        mock.requests_to("/api/generate_report")[0].json(),
        json!({ "report_type": "regional focus - asia" })
    );
}

// ---------------------------------------------------------------------------
// Health and PDF
// ---------------------------------------------------------------------------

#[test]
fn health_reports_connection_and_agent_state() {
    let mock = MockAgent::always(200, json!({ "agent_initialized": true }));
    let status = AgentClient::new(&mock.base_url).check_health();
    assert!(status.connected);
    assert!(status.agent_initialized);

    let offline = AgentClient::new(&closed_port_url()).check_health();
    assert!(!offline.connected);
    assert!(!offline.agent_initialized);
}

#[test]
fn pdf_report_bytes_only_on_200() {
    let pdf = b"%PDF-1.4 fake";
    let mock = MockAgent::start(move |_| Reply::bytes(pdf, "application/pdf"));
    let bytes = AgentClient::new(&mock.base_url).fetch_pdf_report().unwrap();
    assert_eq!(bytes, pdf);
    assert_eq!(mock.requests()[0].path, "/api/generate_pdf_report");

    let missing = MockAgent::start(|_| Reply::text(404, "no pdf"));
    assert!(AgentClient::new(&missing.base_url).fetch_pdf_report().is_none());
}
