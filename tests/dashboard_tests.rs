/// Dashboard, route, and report views built from live client results.
mod common;

use common::{MockAgent, Reply, closed_port_url, port_risks_json};
use serde_json::json;

use portwatch::agent::{AgentClient, RiskLevel};
use portwatch::views::dashboard::{Badge, DashboardSummary};
use portwatch::views::reports::{self, ReportType};
use portwatch::views::routes::{self, AnalysisView, RouteForm};

#[test]
fn kpis_from_mock_records() {
    let mock = MockAgent::always(
        200,
        port_risks_json(&[
            ("Shanghai", 0.52, "HIGH", 10),
            ("Rotterdam", 0.31, "MEDIUM", 4),
            ("Atlantis", 0.18, "LOW", 1),
            ("Busan", 0.44, "HIGH", 0),
        ]),
    );
    let records = AgentClient::new(&mock.base_url).fetch_port_risks();
    let summary = DashboardSummary::from_records(&records);

    assert_eq!(summary.ports_monitored, 4);
    assert_eq!(summary.high_risk_count, 2);
    assert_eq!(summary.total_news_mentions, 15);
    assert!((summary.avg_risk - (0.52 + 0.31 + 0.18 + 0.44) / 4.0).abs() < 1e-9);

    // Unknown port counted above but not mapped
    let mapped: Vec<&str> = summary.map_points.iter().map(|p| p.port_name.as_str()).collect();
    assert_eq!(mapped, ["Shanghai", "Rotterdam", "Busan"]);

    let top: Vec<(&str, Badge)> = summary
        .top_risky
        .iter()
        .map(|p| (p.port_name.as_str(), p.badge))
        .collect();
    assert_eq!(
        top,
        [
            ("Shanghai", Badge::High),
            ("Busan", Badge::High),
            ("Rotterdam", Badge::Medium),
            ("Atlantis", Badge::Low),
        ]
    );
}

#[test]
fn fallback_dashboard_when_service_down() {
    let records = AgentClient::new(&closed_port_url()).fetch_port_risks();
    let summary = DashboardSummary::from_records(&records);

    assert_eq!(summary.ports_monitored, 3);
    assert_eq!(summary.high_risk_count, 0);
    assert_eq!(summary.distribution.len(), 1);
    assert_eq!(summary.distribution[0].level, RiskLevel::Low);
    assert_eq!(summary.map_points.len(), 3);
}

#[test]
fn route_form_and_text_analysis() {
    let mock = MockAgent::start(|req| match req.path.as_str() {
        "/api/port_risks" => Reply::json(
            200,
            port_risks_json(&[("Singapore", 0.2, "LOW", 0), ("Hamburg", 0.1, "LOW", 0)]),
        ),
        "/api/analyze_route" => Reply::json(
            200,
            json!({ "success": true, "analysis": "TOOL: weather\nCalm seas", "agent_used": false }),
        ),
        _ => Reply::text(404, "not found"),
    });
    let client = AgentClient::new(&mock.base_url);

    let form = RouteForm::from_records(&client.fetch_port_risks());
    assert_eq!(form.default_origin.as_deref(), Some("Singapore"));
    assert_eq!(form.default_destination.as_deref(), Some("Hamburg"));

    let view = routes::analyze(&client, "Singapore", "Hamburg").unwrap();
    assert_eq!(view.route_risk, 0.25);
    assert_eq!(view.risk_level, "MEDIUM");
    assert_eq!(view.analysis_type, "Standard");
    assert!(matches!(view.analysis, AnalysisView::Text { uses_tools: true, .. }));
}

#[test]
fn route_follow_up_goes_through_chat() {
    let mock = MockAgent::always(
        200,
        json!({ "response": "No typhoons expected", "conversation_history": [], "agent_used": true }),
    );
    let client = AgentClient::new(&mock.base_url);

    let outcome = routes::follow_up(&client, "Shanghai", "Busan", "Any typhoons?");
    assert!(outcome.success);
    assert_eq!(
        mock.requests_to("/api/chat")[0].json()["message"],
        "Regarding the route Shanghai to Busan: Any typhoons?"
    );
}

#[test]
fn unsuccessful_route_or_report_renders_nothing() {
    let mock = MockAgent::start(|req| match req.path.as_str() {
        "/api/analyze_route" => Reply::json(200, json!({ "success": false, "analysis": "" })),
        _ => Reply::json(200, json!({ "success": false, "report": "" })),
    });
    let client = AgentClient::new(&mock.base_url);

    assert!(routes::analyze(&client, "A", "B").is_none());
    assert!(reports::generate(&client, ReportType::PortPerformance).is_none());
}

#[test]
fn report_generation_stores_text_and_type() {
    let mock = MockAgent::always(200, json!({ "success": true, "report": "Executive view" }));
    let client = AgentClient::new(&mock.base_url);

    let stored = reports::generate(&client, ReportType::ExecutiveSummary).unwrap();
    assert_eq!(stored.report_type, "Executive Summary");
    assert_eq!(stored.text, "Executive view");
    assert_eq!(
        mock.requests_to("/api/generate_report")[0].json()["report_type"],
        "executive summary"
    );
}

#[test]
fn custom_report_uses_chat_prompt() {
    let mock = MockAgent::always(
        200,
        json!({ "response": "Climate report", "conversation_history": [], "agent_used": true }),
    );
    let client = AgentClient::new(&mock.base_url);

    let outcome = reports::custom_report(&client, "climate risks");
    assert!(outcome.success);
    assert_eq!(
        mock.requests_to("/api/chat")[0].json()["message"],
        "Generate a custom risk intelligence report focusing on: climate risks"
    );
}
