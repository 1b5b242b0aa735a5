//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Audit record for one completed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CallRecord {
    /// Telephony call identifier.
    pub call_id: String,
    /// Caller endpoint.
    pub from_endpoint: String,
    /// Callee endpoint.
    pub to_endpoint: String,
    /// Call start timestamp (RFC 3339).
    pub started_at: String,
    /// Call end timestamp (RFC 3339).
    pub ended_at: String,
    /// Why the call ended.
    pub end_reason: String,
    /// Call duration in seconds.
    pub duration_secs: i64,
    /// Number of turns in the call.
    pub turn_count: i64,
}

/// Audit record for one conversational turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TurnRecord {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Telephony call identifier.
    pub call_id: String,
    /// Role: "user" or "assistant".
    pub role: String,
    /// Turn text.
    pub text: String,
    /// Optional JSON metadata.
    pub metadata: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// One completed briefing, keyed by (user, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BriefingCompletion {
    /// Auto-incrementing ID.
    pub id: i64,
    /// User the briefing was generated for.
    pub user_id: String,
    /// Calendar date of the briefing (YYYY-MM-DD).
    pub briefing_date: String,
    /// Completion flag.
    pub is_completed: bool,
    /// Completion timestamp.
    pub completed_at: String,
    /// Number of calendar events included.
    pub event_count: i64,
    /// Number of emails included.
    pub email_count: i64,
    /// Number of bills included.
    pub bill_count: i64,
    /// Snapshot of the delivered content.
    pub content: String,
    /// Delivery channel ("voice" or "dashboard").
    pub channel: String,
}

/// Per-user briefing preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BriefingPreferences {
    /// User these preferences belong to.
    pub user_id: String,
    /// Include the calendar section.
    pub include_calendar: bool,
    /// Include the email section.
    pub include_emails: bool,
    /// Include the bills section.
    pub include_bills: bool,
    /// Cap on calendar events.
    pub max_events: i64,
    /// Cap on emails.
    pub max_emails: i64,
    /// Only include important emails.
    pub important_only: bool,
    /// Last update timestamp.
    pub updated_at: String,
}
