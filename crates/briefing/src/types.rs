//! Briefing data types.

use assistant_core::{Bill, CalendarEvent, EmailMessage};
use serde::{Deserialize, Serialize};

/// Where the briefing will be delivered, which selects the prompt style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BriefingChannel {
    /// Spoken on a call: short, conversational.
    Voice,
    /// Rendered on a dashboard: longer, structured.
    Dashboard,
}

impl BriefingChannel {
    /// Channel string used in persistence rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            BriefingChannel::Voice => "voice",
            BriefingChannel::Dashboard => "dashboard",
        }
    }
}

/// A data source feeding the briefing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BriefingSource {
    Calendar,
    Emails,
    Bills,
}

impl BriefingSource {
    /// Source name recorded in the outcome's error list.
    pub fn as_str(&self) -> &'static str {
        match self {
            BriefingSource::Calendar => "calendar",
            BriefingSource::Emails => "emails",
            BriefingSource::Bills => "bills",
        }
    }
}

/// The raw items assembled for one briefing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BriefingData {
    pub events: Vec<CalendarEvent>,
    pub emails: Vec<EmailMessage>,
    pub bills: Vec<Bill>,
}

/// The result of one `generate` call.
///
/// Downstream consumers receive this copy; the completion record itself is
/// owned by the aggregator's datastore.
#[derive(Debug, Clone)]
pub struct BriefingOutcome {
    /// The narrative text to deliver.
    pub text: String,
    /// The assembled source data.
    pub data: BriefingData,
    /// True when a briefing was already delivered today and no fetches ran.
    pub already_completed: bool,
    /// Names of sources whose fetch failed (section omitted, not fatal).
    pub errors: Vec<String>,
}

impl BriefingOutcome {
    /// Outcome for the already-delivered short circuit.
    pub(crate) fn already_completed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: BriefingData::default(),
            already_completed: true,
            errors: Vec::new(),
        }
    }
}

/// Per-user briefing preferences with their defaults.
#[derive(Debug, Clone)]
pub struct BriefingPrefs {
    pub include_calendar: bool,
    pub include_emails: bool,
    pub include_bills: bool,
    pub max_events: usize,
    pub max_emails: usize,
    pub important_only: bool,
}

impl Default for BriefingPrefs {
    fn default() -> Self {
        Self {
            include_calendar: true,
            include_emails: true,
            include_bills: true,
            max_events: 10,
            max_emails: 5,
            important_only: true,
        }
    }
}

impl From<database::BriefingPreferences> for BriefingPrefs {
    fn from(row: database::BriefingPreferences) -> Self {
        Self {
            include_calendar: row.include_calendar,
            include_emails: row.include_emails,
            include_bills: row.include_bills,
            max_events: row.max_events.max(0) as usize,
            max_emails: row.max_emails.max(0) as usize,
            important_only: row.important_only,
        }
    }
}
