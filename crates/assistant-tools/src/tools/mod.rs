//! Built-in tool implementations.

mod bills_due;
mod calendar_events;
mod create_event;
mod daily_briefing;
mod emails;

pub use bills_due::GetBillsDue;
pub use calendar_events::GetCalendarEvents;
pub use create_event::CreateCalendarEvent;
pub use daily_briefing::GetDailyBriefing;
pub use emails::GetEmails;
