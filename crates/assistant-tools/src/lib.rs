//! Tool registry and implementations for the voice assistant.
//!
//! This crate provides a `ToolRegistry` for registering, validating, and
//! executing the tools the orchestrator can dispatch. Each tool declares a
//! JSON Schema for its parameters; the registry exports those schemas for
//! the model request and checks model-supplied arguments against them
//! before dispatch.
//!
//! # Built-in Tools
//!
//! - [`GetCalendarEvents`] - List events for a day or date range.
//! - [`CreateCalendarEvent`] - Schedule an event.
//! - [`GetEmails`] - List recent emails, optionally unread only.
//! - [`GetBillsDue`] - List bills due within a lookahead window.
//! - [`GetDailyBriefing`] - Deliver the daily briefing via the aggregator.
//!
//! # Example
//!
//! ```rust,ignore
//! use assistant_tools::{standard_registry, ToolRegistry};
//! use std::collections::HashMap;
//! use serde_json::{json, Value};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = standard_registry(calendar, email, bills, aggregator);
//!
//!     let mut params = HashMap::new();
//!     params.insert("within_days".to_string(), json!(7));
//!
//!     let result = registry.execute("get_bills_due", params, "user-1").await.unwrap();
//!     println!("{}", result.content);
//! }
//! ```

mod error;
mod registry;
mod tool;
pub mod tools;

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolArgs, ToolOutput};
pub use tools::{
    CreateCalendarEvent, GetBillsDue, GetCalendarEvents, GetDailyBriefing, GetEmails,
};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

use std::sync::Arc;

use assistant_core::{BillLedger, CalendarProvider, EmailProvider};
use briefing::BriefingAggregator;

/// Create a registry with the standard assistant tools registered.
pub fn standard_registry(
    calendar: Arc<dyn CalendarProvider>,
    email: Arc<dyn EmailProvider>,
    bills: Arc<dyn BillLedger>,
    aggregator: Arc<BriefingAggregator>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(GetCalendarEvents::new(calendar.clone()));
    registry.register(CreateCalendarEvent::new(calendar));
    registry.register(GetEmails::new(email));
    registry.register(GetBillsDue::new(bills));
    registry.register(GetDailyBriefing::new(aggregator));

    registry
}
