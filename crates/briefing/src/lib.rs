//! Daily briefing aggregator.
//!
//! Combines calendar events, important emails, and bills due soon into a
//! single daily summary, with an idempotency guarantee of one briefing per
//! user per day. The three source fetches run concurrently with settle-all
//! semantics: a failed branch degrades its section to empty and is recorded
//! in the outcome's error list, never aborting the other branches.

mod aggregator;
mod bills;
mod email_filter;
mod prompts;
mod types;

pub use aggregator::{BriefingAggregator, DayBoundary};
pub use bills::due_within_window;
pub use types::{BriefingChannel, BriefingData, BriefingOutcome, BriefingPrefs, BriefingSource};
