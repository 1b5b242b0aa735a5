//! The briefing aggregator: idempotency check, concurrent fan-out, and
//! narrative composition.

use std::sync::Arc;

use assistant_core::{
    Bill, BillLedger, CalendarEvent, CalendarProvider, ChatMessage, CompletionRequest,
    EmailMessage, EmailProvider, EmailQuery, LanguageModel, ModelError, ProviderError,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use database::{briefing as briefing_db, preference, Database, DatabaseError};
use tracing::{debug, info, warn};

use crate::email_filter;
use crate::prompts;
use crate::types::{BriefingChannel, BriefingData, BriefingOutcome, BriefingPrefs, BriefingSource};

/// How much wider than the email cap to fetch before importance filtering.
const EMAIL_FETCH_MULTIPLIER: usize = 4;

/// Where the calendar day rolls over for the one-briefing-per-day check.
///
/// UTC matches the reference behavior; a fixed offset lets deployments pin
/// the boundary to the user's local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBoundary {
    Utc,
    /// Offset from UTC in minutes (e.g. -300 for UTC-5).
    FixedOffsetMinutes(i32),
}

impl Default for DayBoundary {
    fn default() -> Self {
        DayBoundary::Utc
    }
}

impl DayBoundary {
    /// Today's date under this boundary.
    pub fn today(&self) -> NaiveDate {
        match self {
            DayBoundary::Utc => Utc::now().date_naive(),
            DayBoundary::FixedOffsetMinutes(minutes) => {
                (Utc::now() + Duration::minutes(*minutes as i64)).date_naive()
            }
        }
    }

    /// The UTC instants bounding the given local calendar day.
    pub fn day_bounds_utc(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let offset_minutes = match self {
            DayBoundary::Utc => 0i64,
            DayBoundary::FixedOffsetMinutes(minutes) => *minutes as i64,
        };
        let local_midnight = date.and_hms_opt(0, 0, 0).expect("midnight is valid");
        let start = local_midnight.and_utc() - Duration::minutes(offset_minutes);
        (start, start + Duration::days(1))
    }
}

/// Aggregates calendar, email, and bill data into one daily briefing.
///
/// The aggregator owns the briefing completion records; callers receive
/// copies of the assembled data, never the live record. All collaborators
/// are injected at construction and shared read-only across requests.
pub struct BriefingAggregator {
    calendar: Arc<dyn CalendarProvider>,
    email: Arc<dyn EmailProvider>,
    bills: Arc<dyn BillLedger>,
    model: Arc<dyn LanguageModel>,
    database: Option<Database>,
    day_boundary: DayBoundary,
}

impl BriefingAggregator {
    /// Create a new aggregator over the given collaborators.
    pub fn new(
        calendar: Arc<dyn CalendarProvider>,
        email: Arc<dyn EmailProvider>,
        bills: Arc<dyn BillLedger>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            calendar,
            email,
            bills,
            model,
            database: None,
            day_boundary: DayBoundary::default(),
        }
    }

    /// Attach the completion/preference store.
    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    /// Set the day boundary for the idempotency check.
    pub fn with_day_boundary(mut self, day_boundary: DayBoundary) -> Self {
        self.day_boundary = day_boundary;
        self
    }

    /// Whether a briefing was already completed for this user today.
    ///
    /// An infrastructure failure (missing table, connection error) reports
    /// **not completed**: availability wins over strict idempotency here.
    pub async fn is_completed_today(&self, user_id: &str) -> bool {
        let Some(database) = &self.database else {
            return false;
        };

        let today = self.day_boundary.today().to_string();
        match briefing_db::get_completion(database.pool(), user_id, &today).await {
            Ok(Some(record)) => record.is_completed,
            Ok(None) => false,
            Err(e) => {
                warn!("Briefing completion check failed, treating as not completed: {}", e);
                false
            }
        }
    }

    /// Generate the daily briefing for a user.
    ///
    /// Short-circuits if today's briefing was already delivered. Otherwise
    /// fans out to the three sources concurrently, composes the narrative,
    /// and records the completion. Source failures degrade their section
    /// and are listed in the outcome's `errors`; they are never fatal.
    pub async fn generate(&self, user_id: &str, channel: BriefingChannel) -> BriefingOutcome {
        if self.is_completed_today(user_id).await {
            info!("Briefing already completed today for user {}", user_id);
            return BriefingOutcome::already_completed(prompts::already_delivered_text());
        }

        let prefs = self.load_prefs(user_id).await;
        let today = self.day_boundary.today();

        let (events_result, emails_result, bills_result) = tokio::join!(
            self.fetch_events(user_id, &prefs, today),
            self.fetch_emails(user_id, &prefs),
            self.fetch_bills(user_id, &prefs, today),
        );

        let mut errors = Vec::new();
        let data = BriefingData {
            events: settle(events_result, BriefingSource::Calendar, &mut errors),
            emails: settle(emails_result, BriefingSource::Emails, &mut errors),
            bills: settle(bills_result, BriefingSource::Bills, &mut errors),
        };

        info!(
            "Briefing for {}: {} events, {} emails, {} bills, {} source errors",
            user_id,
            data.events.len(),
            data.emails.len(),
            data.bills.len(),
            errors.len()
        );

        let text = match self.compose(today, &data, channel).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Narrative composition failed ({}), using deterministic text", e);
                prompts::fallback_text(&data, &errors)
            }
        };

        self.record_completion(user_id, today, &data, &text, channel)
            .await;

        BriefingOutcome {
            text,
            data,
            already_completed: false,
            errors,
        }
    }

    /// Load the user's briefing preferences, defaulting on any failure.
    async fn load_prefs(&self, user_id: &str) -> BriefingPrefs {
        let Some(database) = &self.database else {
            return BriefingPrefs::default();
        };

        match preference::get_preferences(database.pool(), user_id).await {
            Ok(Some(row)) => row.into(),
            Ok(None) => BriefingPrefs::default(),
            Err(e) => {
                warn!("Failed to load briefing preferences, using defaults: {}", e);
                BriefingPrefs::default()
            }
        }
    }

    async fn fetch_events(
        &self,
        user_id: &str,
        prefs: &BriefingPrefs,
        today: NaiveDate,
    ) -> Result<Vec<CalendarEvent>, ProviderError> {
        if !prefs.include_calendar {
            return Ok(Vec::new());
        }

        let (start, end) = self.day_boundary.day_bounds_utc(today);
        let mut events = self.calendar.events_between(user_id, start, end).await?;
        events.sort_by_key(|e| e.start);
        events.truncate(prefs.max_events);
        Ok(events)
    }

    async fn fetch_emails(
        &self,
        user_id: &str,
        prefs: &BriefingPrefs,
    ) -> Result<Vec<EmailMessage>, ProviderError> {
        if !prefs.include_emails {
            return Ok(Vec::new());
        }

        let query = EmailQuery {
            max_results: prefs.max_emails * EMAIL_FETCH_MULTIPLIER,
            unread_only: false,
        };
        let emails = self.email.list_messages(user_id, &query).await?;
        debug!("Fetched {} candidate emails", emails.len());

        if prefs.important_only {
            Ok(email_filter::filter_important(self.model.as_ref(), emails, prefs.max_emails).await)
        } else {
            let mut emails = emails;
            emails.truncate(prefs.max_emails);
            Ok(emails)
        }
    }

    async fn fetch_bills(
        &self,
        user_id: &str,
        prefs: &BriefingPrefs,
        today: NaiveDate,
    ) -> Result<Vec<Bill>, ProviderError> {
        if !prefs.include_bills {
            return Ok(Vec::new());
        }

        let bills = self.bills.list_bills(user_id).await?;
        Ok(crate::bills::due_within_window(bills, today))
    }

    /// Compose the narrative text via the model.
    async fn compose(
        &self,
        date: NaiveDate,
        data: &BriefingData,
        channel: BriefingChannel,
    ) -> Result<String, ModelError> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(prompts::system_prompt(channel)),
            ChatMessage::user(prompts::data_prompt(date, data)),
        ]);

        let response = self.model.complete(request).await?;
        response
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ModelError::InvalidResponse("empty narrative".to_string()))
    }

    /// Record the completion row — the idempotency commit point.
    ///
    /// A failed write is logged as a duplicate-briefing risk; the briefing
    /// has already been assembled and is still returned to the caller.
    async fn record_completion(
        &self,
        user_id: &str,
        date: NaiveDate,
        data: &BriefingData,
        text: &str,
        channel: BriefingChannel,
    ) {
        let Some(database) = &self.database else {
            return;
        };

        let result = briefing_db::insert_completion(
            database.pool(),
            user_id,
            &date.to_string(),
            data.events.len() as i64,
            data.emails.len() as i64,
            data.bills.len() as i64,
            text,
            channel.as_str(),
        )
        .await;

        match result {
            Ok(()) => {}
            Err(DatabaseError::AlreadyExists { .. }) => {
                warn!("Briefing completion already recorded for {} on {}", user_id, date);
            }
            Err(e) => {
                warn!(
                    "Failed to record briefing completion for {} (duplicate risk today): {}",
                    user_id, e
                );
            }
        }
    }
}

/// Fold one fan-out branch into the briefing, recording its failure.
fn settle<T>(
    result: Result<Vec<T>, ProviderError>,
    source: BriefingSource,
    errors: &mut Vec<String>,
) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!("{} fetch failed: {}", source.as_str(), e);
            errors.push(source.as_str().to_string());
            Vec::new()
        }
    }
}
