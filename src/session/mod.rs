//! Conversation state for one user session.
//!
//! A [`ConversationSession`] is an explicit value owned by whoever drives the
//! interaction (the web server's [`store::SessionStore`] or the interactive
//! CLI loop) and passed by `&mut` into every handler. Nothing here is global.

pub mod store;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Default number of trailing turns checked before a quick action re-fires.
pub const DEFAULT_DEDUP_WINDOW: usize = 5;

// ---------------------------------------------------------------------------
// Turns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the transcript. Display order is insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Quick actions
// ---------------------------------------------------------------------------

/// Canned queries that can be fired from a single control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickAction {
    Shanghai,
    Route,
    Disasters,
    Report,
}

impl QuickAction {
    pub const ALL: [QuickAction; 4] = [
        QuickAction::Shanghai,
        QuickAction::Route,
        QuickAction::Disasters,
        QuickAction::Report,
    ];

    /// The user turn appended when the action fires.
    pub fn query(self) -> &'static str {
        match self {
            Self::Shanghai => {
                "What's the current risk situation for Shanghai port with detailed analysis?"
            }
            Self::Route => {
                "Analyze the shipping route from Shanghai to Los Angeles with all risk factors"
            }
            Self::Disasters => {
                "Show me recent natural disasters in Asia that could affect supply chains"
            }
            Self::Report => {
                "Generate a comprehensive risk intelligence report for our global supply chain"
            }
        }
    }

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Shanghai => "Check Shanghai Risk",
            Self::Route => "Analyze Route",
            Self::Disasters => "Recent Disasters",
            Self::Report => "Full Report",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shanghai => "shanghai",
            Self::Route => "route",
            Self::Disasters => "disasters",
            Self::Report => "report",
        }
    }
}

impl fmt::Display for QuickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuickAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shanghai" => Ok(Self::Shanghai),
            "route" => Ok(Self::Route),
            "disasters" => Ok(Self::Disasters),
            "report" => Ok(Self::Report),
            other => anyhow::bail!(
                "unknown quick action '{other}' (expected shanghai, route, disasters, or report)"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Ordered transcript plus the pending quick-action marker.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    turns: Vec<ConversationTurn>,
    pending_action: Option<QuickAction>,
    dedup_window: usize,
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_WINDOW)
    }
}

impl ConversationSession {
    pub fn new(dedup_window: usize) -> Self {
        Self {
            turns: Vec::new(),
            pending_action: None,
            dedup_window,
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn dedup_window(&self) -> usize {
        self.dedup_window
    }

    pub fn append_user_turn(&mut self, text: impl Into<String>) {
        self.push(Role::User, text.into());
    }

    pub fn append_assistant_turn(&mut self, text: impl Into<String>) {
        self.push(Role::Assistant, text.into());
    }

    fn push(&mut self, role: Role, content: String) {
        self.turns.push(ConversationTurn { role, content });
    }

    // -- Quick actions --

    pub fn set_pending_action(&mut self, action: QuickAction) {
        self.pending_action = Some(action);
    }

    pub fn pending_action(&self) -> Option<QuickAction> {
        self.pending_action
    }

    /// Read and clear the marker. A second call returns `None`.
    pub fn consume_pending_action(&mut self) -> Option<QuickAction> {
        self.pending_action.take()
    }

    /// Whether a user turn with exactly `content` is among the last
    /// `dedup_window` entries.
    pub fn has_recent_user_turn(&self, content: &str) -> bool {
        let start = self.turns.len().saturating_sub(self.dedup_window);
        self.turns[start..]
            .iter()
            .any(|t| t.role == Role::User && t.content == content)
    }

    /// Consume the pending marker and append its query as a user turn unless
    /// the same turn is already recent.
    ///
    /// Returns the action only when a new turn was appended; `None` means no
    /// action was pending or it was suppressed as a duplicate.
    pub fn apply_pending_action(&mut self) -> Option<QuickAction> {
        let action = self.consume_pending_action()?;
        if self.has_recent_user_turn(action.query()) {
            return None;
        }
        self.append_user_turn(action.query());
        Some(action)
    }

    /// Drop the transcript and the pending marker.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.pending_action = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
