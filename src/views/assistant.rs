//! Assistant chat view: transcript rendering and the chat handlers.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::agent::{AgentClient, ChatOutcome};
use crate::session::{ConversationSession, ConversationTurn, QuickAction, Role};

/// Marker the agent leaves in replies produced through tool calls.
const TOOL_MARKER: &str = "TOOL:";

/// `User: ...` / `Assistant: ...` lines of the remote transcript.
static HISTORY_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(User|Assistant): ?(.*)$").expect("valid history line regex")
});

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TurnView {
    pub role: Role,
    pub content: String,
    /// Assistant reply that reports tool usage.
    pub uses_tools: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuickActionView {
    pub id: &'static str,
    pub label: &'static str,
    pub query: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantView {
    pub conversation_id: String,
    pub turns: Vec<TurnView>,
    pub quick_actions: Vec<QuickActionView>,
}

/// How a chat round-trip went, for the status line under the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatStatus {
    AgentUsed,
    Basic,
    Failed,
}

impl ChatStatus {
    pub fn of(outcome: &ChatOutcome) -> Self {
        match (outcome.success, outcome.agent_used) {
            (false, _) => Self::Failed,
            (true, true) => Self::AgentUsed,
            (true, false) => Self::Basic,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::AgentUsed => "Enhanced agent used tools for comprehensive analysis",
            Self::Basic => "Basic response - configure the agent service for full capabilities",
            Self::Failed => "Failed to get response from AI agent",
        }
    }
}

/// Result of one chat interaction as shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct ChatView {
    pub status: ChatStatus,
    pub status_message: &'static str,
    pub response: String,
    pub uses_tools: bool,
    /// Tail of the remote transcript.
    pub history: Vec<ConversationTurn>,
}

impl ChatView {
    pub fn from_outcome(outcome: &ChatOutcome, history_display: usize) -> Self {
        let status = ChatStatus::of(outcome);
        Self {
            status,
            status_message: status.message(),
            response: outcome.response.clone(),
            uses_tools: uses_tools(&outcome.response),
            history: parse_history(&outcome.history, history_display),
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Build the assistant page from the current session.
pub fn render(conversation_id: &str, session: &ConversationSession) -> AssistantView {
    AssistantView {
        conversation_id: conversation_id.to_string(),
        turns: session
            .turns()
            .iter()
            .map(|turn| TurnView {
                role: turn.role,
                content: turn.content.clone(),
                uses_tools: turn.role == Role::Assistant && uses_tools(&turn.content),
            })
            .collect(),
        quick_actions: QuickAction::ALL
            .iter()
            .map(|&action| QuickActionView {
                id: action.as_str(),
                label: action.label(),
                query: action.query(),
            })
            .collect(),
    }
}

pub fn uses_tools(text: &str) -> bool {
    text.contains(TOOL_MARKER)
}

/// Parse the last `limit` lines of a remote transcript into turns.
///
/// Lines without a `User:` or `Assistant:` prefix are skipped.
pub fn parse_history(lines: &[String], limit: usize) -> Vec<ConversationTurn> {
    let start = lines.len().saturating_sub(limit);
    lines[start..]
        .iter()
        .filter_map(|line| {
            let caps = HISTORY_LINE_RE.captures(line)?;
            let role = match &caps[1] {
                "User" => Role::User,
                _ => Role::Assistant,
            };
            Some(ConversationTurn {
                role,
                content: caps[2].to_string(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Append the user's message, ask the agent, and append the reply when the
/// call succeeded. Blank input is ignored.
pub fn submit_message(
    client: &AgentClient,
    session: &mut ConversationSession,
    text: &str,
) -> Option<ChatOutcome> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    session.append_user_turn(text);
    let outcome = client.send_message(text);
    if outcome.success {
        session.append_assistant_turn(outcome.response.clone());
    }
    Some(outcome)
}

/// Fire a quick action within one interaction cycle: the marker is set and
/// consumed here, and the canned query is only sent when it was not
/// suppressed as a recent duplicate.
pub fn trigger_quick_action(
    client: &AgentClient,
    session: &mut ConversationSession,
    action: QuickAction,
) -> Option<ChatOutcome> {
    session.set_pending_action(action);
    let fired = session.apply_pending_action()?;

    let outcome = client.send_message(fired.query());
    if outcome.success {
        session.append_assistant_turn(outcome.response.clone());
    }
    Some(outcome)
}

/// Clear the remote history, and the local transcript only if the service
/// acknowledged. On failure the transcript stays readable.
pub fn clear_conversation(client: &AgentClient, session: &mut ConversationSession) -> bool {
    let cleared = client.clear_history();
    if cleared {
        session.reset();
    }
    cleared
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(success: bool, agent_used: bool) -> ChatOutcome {
        ChatOutcome {
            response: "TOOL: port_lookup\nShanghai is calm".to_string(),
            history: vec![
                "User: one".to_string(),
                "Assistant: two".to_string(),
                "System: ignored".to_string(),
                "User: three".to_string(),
            ],
            agent_used,
            success,
        }
    }

    #[test]
    fn chat_status_from_outcome() {
        assert_eq!(ChatStatus::of(&outcome(true, true)), ChatStatus::AgentUsed);
        assert_eq!(ChatStatus::of(&outcome(true, false)), ChatStatus::Basic);
        assert_eq!(ChatStatus::of(&outcome(false, true)), ChatStatus::Failed);
    }

    #[test]
    fn parse_history_strips_prefixes_and_skips_unknown() {
        let turns = parse_history(&outcome(true, true).history, 6);
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].content, "one");
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].content, "two");
        assert_eq!(turns[2].content, "three");
    }

    #[test]
    fn parse_history_keeps_only_tail() {
        let lines: Vec<String> = (0..10).map(|i| format!("User: q{i}")).collect();
        let turns = parse_history(&lines, 6);
        assert_eq!(turns.len(), 6);
        assert_eq!(turns[0].content, "q4");
        assert_eq!(turns[5].content, "q9");
    }

    #[test]
    fn parse_history_keeps_multiline_content() {
        let lines = vec!["Assistant: line one\nline two".to_string()];
        let turns = parse_history(&lines, 6);
        assert_eq!(turns[0].content, "line one\nline two");
    }

    #[test]
    fn chat_view_flags_tool_usage() {
        let view = ChatView::from_outcome(&outcome(true, true), 6);
        assert!(view.uses_tools);
        assert_eq!(view.status, ChatStatus::AgentUsed);
        assert_eq!(view.history.len(), 3);
    }

    #[test]
    fn render_marks_only_assistant_tool_turns() {
        let mut session = ConversationSession::default();
        session.append_user_turn("TOOL: please");
        session.append_assistant_turn("TOOL: weather_api\nStorm warning");

        let view = render("conv_20250301_090000", &session);
        assert_eq!(view.turns.len(), 2);
        assert!(!view.turns[0].uses_tools);
        assert!(view.turns[1].uses_tools);
        assert_eq!(view.quick_actions.len(), 4);
        assert_eq!(view.quick_actions[0].id, "shanghai");
    }
}
