//! Data-source provider traits and domain types.
//!
//! The calendar, email, and bill-ledger providers are black boxes to the
//! core: thin clients elsewhere implement these traits, and the tools and
//! the briefing aggregator consume them. All methods are keyed by a user
//! identifier so a single adapter instance serves every session.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// A calendar event as returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Provider-native event id.
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

/// Fields for creating a calendar event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCalendarEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

/// Partial update for an existing event. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Calendar provider operations.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// List events overlapping the given time range.
    async fn events_between(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, ProviderError>;

    /// Create an event and return it with its provider-assigned id.
    async fn create_event(
        &self,
        user_id: &str,
        event: NewCalendarEvent,
    ) -> Result<CalendarEvent, ProviderError>;

    /// Apply a partial update to an event.
    async fn update_event(
        &self,
        user_id: &str,
        event_id: &str,
        patch: EventPatch,
    ) -> Result<CalendarEvent, ProviderError>;

    /// Delete an event.
    async fn delete_event(&self, user_id: &str, event_id: &str) -> Result<(), ProviderError>;
}

/// Query parameters for listing email messages.
#[derive(Debug, Clone)]
pub struct EmailQuery {
    /// Maximum number of messages to return.
    pub max_results: usize,
    /// Only return unread messages.
    pub unread_only: bool,
}

impl Default for EmailQuery {
    fn default() -> Self {
        Self {
            max_results: 20,
            unread_only: false,
        }
    }
}

/// An email message summary as returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Provider-native message id.
    pub id: String,
    pub sender: String,
    pub subject: String,
    /// Short body excerpt.
    pub snippet: String,
    pub received_at: DateTime<Utc>,
    pub unread: bool,
    pub starred: bool,
    /// Provider-flagged importance (e.g. Gmail's "important" label).
    pub important: bool,
}

/// A flag change applied via `modify_flags`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailFlag {
    Read,
    Unread,
    Starred,
    Archived,
    Deleted,
}

/// Email provider operations.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// List recent messages matching the query, newest first.
    async fn list_messages(
        &self,
        user_id: &str,
        query: &EmailQuery,
    ) -> Result<Vec<EmailMessage>, ProviderError>;

    /// Fetch the full body of one message.
    async fn get_message(&self, user_id: &str, message_id: &str)
        -> Result<String, ProviderError>;

    /// Send a reply in the thread of the given message.
    async fn send_reply(
        &self,
        user_id: &str,
        message_id: &str,
        body: &str,
    ) -> Result<(), ProviderError>;

    /// Apply a flag change to a message.
    async fn modify_flags(
        &self,
        user_id: &str,
        message_id: &str,
        flag: EmailFlag,
    ) -> Result<(), ProviderError>;
}

/// A bill record with its per-bill reminder window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    /// Recurrence rule, e.g. "monthly"; None for one-off bills.
    pub recurrence: Option<String>,
    /// Days before the due date to start reminding. 0 means never remind.
    pub reminder_days_before: i64,
}

/// Fields for creating a bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBill {
    pub name: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub recurrence: Option<String>,
    pub reminder_days_before: i64,
}

/// Bill ledger operations.
#[async_trait]
pub trait BillLedger: Send + Sync {
    /// List all bills for a user.
    async fn list_bills(&self, user_id: &str) -> Result<Vec<Bill>, ProviderError>;

    /// Create a bill and return it with its assigned id.
    async fn create_bill(&self, user_id: &str, bill: NewBill) -> Result<Bill, ProviderError>;

    /// Replace a bill record.
    async fn update_bill(&self, user_id: &str, bill: Bill) -> Result<Bill, ProviderError>;

    /// Delete a bill.
    async fn delete_bill(&self, user_id: &str, bill_id: &str) -> Result<(), ProviderError>;
}
