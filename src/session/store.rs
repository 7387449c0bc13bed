//! Per-connection sessions for the web dashboard.
//!
//! Each browser gets its own [`UserSession`], keyed by a random token
//! carried in the `portwatch_session` cookie. The timestamp conversation id
//! is only sent to the agent service and the activity log. The store is
//! owned by the server loop; handlers borrow one session at a time.

use std::collections::HashMap;
use std::time::Instant;

use uuid::Uuid;

use crate::agent::{AgentClient, new_conversation_id};
use crate::config::PortwatchConfig;

use super::ConversationSession;

/// Sessions kept before the least recently used one is dropped.
const MAX_SESSIONS: usize = 64;

/// The last generated report, kept for the download buttons.
#[derive(Debug, Clone)]
pub struct StoredReport {
    pub report_type: String,
    pub text: String,
    /// Local time the report was generated, used for download filenames.
    pub generated_at: chrono::DateTime<chrono::Local>,
}

/// Everything one user session owns.
#[derive(Debug)]
pub struct UserSession {
    token: String,
    pub client: AgentClient,
    pub conversation: ConversationSession,
    pub last_report: Option<StoredReport>,
    last_seen: Instant,
}

impl UserSession {
    pub fn new(token: String, client: AgentClient, dedup_window: usize) -> Self {
        Self {
            token,
            client,
            conversation: ConversationSession::new(dedup_window),
            last_report: None,
            last_seen: Instant::now(),
        }
    }

    /// Session token, the value of the session cookie.
    pub fn id(&self) -> &str {
        &self.token
    }

    pub fn conversation_id(&self) -> &str {
        self.client.conversation_id()
    }
}

fn new_session_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// All live sessions of one server process.
#[derive(Debug)]
pub struct SessionStore {
    config: PortwatchConfig,
    sessions: HashMap<String, UserSession>,
}

impl SessionStore {
    pub fn new(config: PortwatchConfig) -> Self {
        Self {
            config,
            sessions: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Return the session for `id`, creating a fresh one when the id is
    /// missing or unknown. The flag is `true` for a newly created session.
    pub fn get_or_create(&mut self, id: Option<&str>) -> (&mut UserSession, bool) {
        let known = id
            .filter(|id| self.sessions.contains_key(*id))
            .map(str::to_string);
        let created = known.is_none();

        let (key, conversation_id) = match known {
            Some(key) => (key, None),
            None => {
                self.evict_if_full();
                (new_session_token(), Some(self.unused_conversation_id()))
            }
        };

        let config = &self.config;
        let session = self.sessions.entry(key.clone()).or_insert_with(|| {
            let conversation_id = conversation_id.unwrap_or_else(new_conversation_id);
            let client = AgentClient::from_config(config).with_conversation_id(conversation_id);
            UserSession::new(key, client, config.session.dedup_window)
        });
        session.last_seen = Instant::now();
        (session, created)
    }

    /// Timestamp ids collide when two browsers connect within one second.
    fn unused_conversation_id(&self) -> String {
        let base = new_conversation_id();
        let mut id = base.clone();
        let mut n = 1;
        while self
            .sessions
            .values()
            .any(|s| s.conversation_id() == id)
        {
            n += 1;
            id = format!("{base}_{n}");
        }
        id
    }

    fn evict_if_full(&mut self) {
        if self.sessions.len() < MAX_SESSIONS {
            return;
        }
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|(_, s)| s.last_seen)
            .map(|(k, _)| k.clone());
        if let Some(key) = oldest {
            self.sessions.remove(&key);
        }
    }
}
