//! Embedded web dashboard for portwatch.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page dashboard with assistant chat, risk dashboard, route
//!   analysis, and reports
//! - JSON API endpoints backed by the remote agent service
//!
//! Launched via `portwatch web` (default: `http://127.0.0.1:8501`).

mod api;
mod frontend;

use std::io::Cursor;

use anyhow::{Context, Result};
use thiserror::Error;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::config::PortwatchConfig;
use crate::session::store::{SessionStore, UserSession};

/// Cookie carrying the conversation id of a browser session.
pub const SESSION_COOKIE: &str = "portwatch_session";

/// Handler error for malformed client input, answered with 400.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct BadRequest(pub String);

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server on the given address.
///
/// Blocks the current thread. Handles requests sequentially; each handler
/// runs to completion against its own session before the next request is
/// read.
pub fn serve(config: PortwatchConfig, addr: &str, open: bool) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("portwatch dashboard running at http://{addr}");
    println!("Agent service: {}", config.agent.base_url);
    println!("Press Ctrl+C to stop.\n");

    if open {
        // Best-effort
        let _ = open_browser(&format!("http://{addr}"));
    }

    run(server, config);
    Ok(())
}

/// Serve requests from an already bound server until it shuts down.
pub fn run(server: Server, config: PortwatchConfig) {
    let history_display = config.session.history_display;
    let mut store = SessionStore::new(config);

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        // Read body up-front for methods that carry one
        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let cookie = session_cookie(&request);
        let (session, created) = store.get_or_create(cookie.as_deref());

        let result = dispatch(&method, &url, body.as_deref(), session, history_display);

        let mut resp = match result {
            Ok(resp) => resp,
            Err(e) => error_response(&e),
        };
        if created {
            resp.add_header(header(
                "Set-Cookie",
                &format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Strict", session.id()),
            ));
        }
        let _ = request.respond(resp);

        // Brief access log
        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(
    method: &Method,
    url: &str,
    body: Option<&str>,
    session: &mut UserSession,
    history_display: usize,
) -> Result<Response<Cursor<Vec<u8>>>> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        // API: Assistant
        (&Method::Get, "/api/status") => api::get_status(session),
        (&Method::Get, "/api/session") => api::get_session(session),
        (&Method::Post, "/api/chat") => api::post_chat(session, body, history_display),
        (&Method::Post, "/api/quick_action") => {
            api::post_quick_action(session, body, history_display)
        }
        (&Method::Post, "/api/clear") => api::post_clear(session),

        // API: Dashboard and routes
        (&Method::Get, "/api/dashboard") => api::get_dashboard(session),
        (&Method::Get, "/api/ports") => api::get_ports(session),
        (&Method::Post, "/api/route") => api::post_route(session, body),
        (&Method::Post, "/api/route/follow_up") => {
            api::post_route_follow_up(session, body, history_display)
        }

        // API: Reports
        (&Method::Get, "/api/report_types") => api::get_report_types(),
        (&Method::Post, "/api/report") => api::post_report(session, body),
        (&Method::Get, "/api/report/text") => api::get_report_text(session),
        (&Method::Get, "/api/report/pdf") => api::get_report_pdf(session),
        (&Method::Post, "/api/custom_report") => {
            api::post_custom_report(session, body, history_display)
        }

        // 404
        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Serve the embedded single-page frontend.
fn serve_frontend() -> Response<Cursor<Vec<u8>>> {
    let html = frontend::INDEX_HTML;
    Response::from_data(html.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// 404 response.
fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = r#"{"error": "not found"}"#;
    Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type_json())
        .with_status_code(StatusCode(404))
}

/// 400 for [`BadRequest`], 500 for everything else.
fn error_response(e: &anyhow::Error) -> Response<Cursor<Vec<u8>>> {
    let status = if e.downcast_ref::<BadRequest>().is_some() {
        400
    } else {
        500
    };
    let body = serde_json::json!({ "error": format!("{e:#}") }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status))
}

/// Build a header from a name and value known to be ASCII.
pub(crate) fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).expect("header must be ASCII")
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    header("Content-Type", "application/json; charset=utf-8")
}

/// HTML content type header.
fn content_type_html() -> Header {
    header("Content-Type", "text/html; charset=utf-8")
}

/// Value of the session cookie, if the browser sent one.
fn session_cookie(request: &Request) -> Option<String> {
    request
        .headers()
        .iter()
        .filter(|h| h.field.equiv("Cookie"))
        .find_map(|h| cookie_value(h.value.as_str(), SESSION_COOKIE))
}

fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name && !v.is_empty()).then(|| v.to_string())
    })
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
