//! Session and turn types.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    /// Role string used in audit rows and model messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// One utterance or reply within a session. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced the turn.
    pub role: TurnRole,
    /// Turn text.
    pub text: String,
    /// When the turn was appended.
    pub timestamp: DateTime<Utc>,
    /// Optional metadata (confidence score, tool-call records, token usage).
    pub metadata: Option<Value>,
}

/// Lifecycle status of a session. Transitions only Active -> Ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Ended,
}

/// The live state of one voice call.
///
/// Sessions are exclusively owned by the [`SessionManager`] for their
/// lifetime; callers receive clones, never the live record.
///
/// [`SessionManager`]: crate::SessionManager
#[derive(Debug, Clone)]
pub struct Session {
    /// Telephony call identifier.
    pub call_id: String,
    /// Caller endpoint.
    pub from: String,
    /// Callee endpoint.
    pub to: String,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Ordered turn list; insertion order, no reordering or deletion.
    pub turns: Vec<Turn>,
    /// Invariant: always equals `turns.len()`.
    pub turn_count: usize,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Why the session ended, once it has.
    pub end_reason: Option<String>,
    /// Computed duration, set when the session ends.
    pub duration: Option<Duration>,
    /// Last mutation time, used for idle eviction.
    pub(crate) last_activity: Instant,
}

impl Session {
    /// Create a new active session.
    pub(crate) fn new(call_id: &str, from: &str, to: &str) -> Self {
        Self {
            call_id: call_id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            created_at: Utc::now(),
            turns: Vec::new(),
            turn_count: 0,
            status: SessionStatus::Active,
            end_reason: None,
            duration: None,
            last_activity: Instant::now(),
        }
    }

    /// Append a turn and bump the counter.
    pub(crate) fn push_turn(&mut self, role: TurnRole, text: &str, metadata: Option<Value>) {
        self.turns.push(Turn {
            role,
            text: text.to_string(),
            timestamp: Utc::now(),
            metadata,
        });
        self.turn_count += 1;
        self.last_activity = Instant::now();
    }

    /// Mark the session ended and compute its duration.
    pub(crate) fn mark_ended(&mut self, reason: &str) {
        self.status = SessionStatus::Ended;
        self.end_reason = Some(reason.to_string());
        let elapsed = Utc::now().signed_duration_since(self.created_at);
        self.duration = Some(elapsed.to_std().unwrap_or(Duration::ZERO));
    }

    /// Whether the session has been idle longer than the given timeout.
    pub(crate) fn is_idle(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }
}
