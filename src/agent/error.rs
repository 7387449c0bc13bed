//! Typed failures at the agent client boundary.

use thiserror::Error;

/// Why a remote call did not produce a usable response.
///
/// Transport failures (refused connection, DNS, timeout) and protocol
/// failures (non-200 status, malformed body) stay distinguishable here even
/// though the contract methods on [`AgentClient`](super::AgentClient)
/// collapse them into one degraded outcome.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The request never produced an HTTP response.
    #[error("{message}")]
    Transport { message: String },

    /// The service answered with something other than 200.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A 200 response whose body did not match the expected shape.
    #[error("malformed response: {message}")]
    Decode { message: String },
}

impl NetworkError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Short machine-readable kind, used in the activity log.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Status { .. } => "status",
            Self::Decode { .. } => "decode",
        }
    }

    /// Whether the remote service was reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Text shown in place of an assistant reply when a chat call fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { message } => format!("Connection error: {message}"),
            Self::Status { body, .. } => format!("API Error: {body}"),
            Self::Decode { message } => format!("API Error: malformed response: {message}"),
        }
    }
}

impl From<ureq::Error> for NetworkError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => Self::Status {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => Self::transport(transport.to_string()),
        }
    }
}
