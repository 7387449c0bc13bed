//! In-process mock of the remote agent service.
//!
//! Binds a `tiny_http` server on an ephemeral port and answers every request
//! through a handler closure. Requests are recorded for assertions.
#![allow(dead_code)]

use std::io::Read;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

use tiny_http::{Header, Response, Server, StatusCode};

/// A request as seen by the mock.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// What the mock answers with.
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
    pub content_type: &'static str,
}

impl Reply {
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        Self {
            status,
            body: value.to_string().into_bytes(),
            content_type: "application/json",
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.as_bytes().to_vec(),
            content_type: "text/plain",
        }
    }

    pub fn bytes(body: &[u8], content_type: &'static str) -> Self {
        Self {
            status: 200,
            body: body.to_vec(),
            content_type,
        }
    }
}

pub struct MockAgent {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockAgent {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&Recorded) -> Reply + Send + 'static,
    {
        let server = Server::http("127.0.0.1:0").expect("bind mock agent");
        let addr = server
            .server_addr()
            .to_ip()
            .expect("mock agent listens on TCP");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            for mut request in server.incoming_requests() {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let recorded = Recorded {
                    method: request.method().to_string(),
                    path: request.url().to_string(),
                    body,
                };
                let reply = handler(&recorded);
                seen.lock().unwrap().push(recorded);

                let header = Header::from_bytes("Content-Type", reply.content_type).unwrap();
                let resp = Response::from_data(reply.body)
                    .with_header(header)
                    .with_status_code(StatusCode(reply.status));
                let _ = request.respond(resp);
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Mock that answers every request with the same status and JSON body.
    pub fn always(status: u16, value: serde_json::Value) -> Self {
        let body = value.to_string();
        Self::start(move |_| Reply {
            status,
            body: body.clone().into_bytes(),
            content_type: "application/json",
        })
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

/// Base URL of a local port nobody listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// A `/api/port_risks` payload with the given `(name, risk, level, news)`.
pub fn port_risks_json(ports: &[(&str, f64, &str, u32)]) -> serde_json::Value {
    let data: Vec<serde_json::Value> = ports
        .iter()
        .map(|(name, risk, level, news)| {
            serde_json::json!({
                "port_name": name,
                "country": "Somewhere",
                "overall_risk": risk,
                "risk_level": level,
                "nearby_disasters_count": 1,
                "news_mentions": news,
            })
        })
        .collect();
    serde_json::json!({ "data": data })
}
