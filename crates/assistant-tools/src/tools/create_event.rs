//! Calendar event creation tool.

use std::sync::Arc;

use assistant_core::{CalendarProvider, NewCalendarEvent};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Creates a calendar event.
///
/// # Parameters
///
/// - `title` (required): Event title.
/// - `start` (required): Start time, RFC 3339 (e.g. 2026-08-29T15:00:00Z).
/// - `end` (optional): End time, RFC 3339.
/// - `description` (optional): Free-form details.
pub struct CreateCalendarEvent {
    calendar: Arc<dyn CalendarProvider>,
}

impl CreateCalendarEvent {
    pub fn new(calendar: Arc<dyn CalendarProvider>) -> Self {
        Self { calendar }
    }
}

fn parse_timestamp(name: &str, value: &str) -> Result<DateTime<Utc>, ToolError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ToolError::InvalidParameter {
            name: name.to_string(),
            reason: "expected an RFC 3339 timestamp".to_string(),
        })
}

#[async_trait]
impl Tool for CreateCalendarEvent {
    fn name(&self) -> &str {
        "create_calendar_event"
    }

    fn description(&self) -> &str {
        "Creates a calendar event for the user. Use only when the user \
         explicitly asks to schedule something."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Event title."
                },
                "start": {
                    "type": "string",
                    "description": "Start time, RFC 3339."
                },
                "end": {
                    "type": "string",
                    "description": "End time, RFC 3339."
                },
                "description": {
                    "type": "string",
                    "description": "Free-form event details."
                }
            },
            "required": ["title", "start"]
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let title = args.get_string("title")?;
        let start = parse_timestamp("start", &args.get_string("start")?)?;
        let end = args
            .get_string_opt("end")
            .map(|e| parse_timestamp("end", &e))
            .transpose()?;

        if let Some(end) = end {
            if end <= start {
                return Err(ToolError::InvalidParameter {
                    name: "end".to_string(),
                    reason: "must be after start".to_string(),
                });
            }
        }

        debug!("Creating event '{}' for {}", title, args.user_id);

        let created = self
            .calendar
            .create_event(
                &args.user_id,
                NewCalendarEvent {
                    title,
                    description: args.get_string_opt("description"),
                    location: None,
                    start,
                    end,
                },
            )
            .await?;

        Ok(ToolOutput::success(format!(
            "Created \"{}\" on {}.",
            created.title,
            created.start.format("%Y-%m-%d at %H:%M")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::{CalendarEvent, EventPatch, ProviderError};
    use std::collections::HashMap;

    struct FakeCalendar;

    #[async_trait]
    impl CalendarProvider for FakeCalendar {
        async fn events_between(
            &self,
            _user_id: &str,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Vec<CalendarEvent>, ProviderError> {
            unimplemented!()
        }

        async fn create_event(
            &self,
            _user_id: &str,
            event: NewCalendarEvent,
        ) -> Result<CalendarEvent, ProviderError> {
            Ok(CalendarEvent {
                id: "evt-1".to_string(),
                title: event.title,
                description: event.description,
                location: event.location,
                start: event.start,
                end: event.end,
            })
        }

        async fn update_event(
            &self,
            _user_id: &str,
            _event_id: &str,
            _patch: EventPatch,
        ) -> Result<CalendarEvent, ProviderError> {
            unimplemented!()
        }

        async fn delete_event(&self, _user_id: &str, _event_id: &str) -> Result<(), ProviderError> {
            unimplemented!()
        }
    }

    fn args(params: Value) -> ToolArgs {
        let map: HashMap<String, Value> = params
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        ToolArgs::new(map, "user-1")
    }

    #[tokio::test]
    async fn test_create_event() {
        let tool = CreateCalendarEvent::new(Arc::new(FakeCalendar));

        let result = tool
            .execute(args(
                json!({"title": "Dentist", "start": "2026-09-01T15:00:00Z"}),
            ))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.content.contains("Dentist"));
        assert!(result.content.contains("2026-09-01"));
    }

    #[tokio::test]
    async fn test_bad_start_timestamp() {
        let tool = CreateCalendarEvent::new(Arc::new(FakeCalendar));

        let result = tool
            .execute(args(json!({"title": "Dentist", "start": "3pm tomorrow"})))
            .await;
        assert!(matches!(result, Err(ToolError::InvalidParameter { .. })));
    }

    #[tokio::test]
    async fn test_end_before_start() {
        let tool = CreateCalendarEvent::new(Arc::new(FakeCalendar));

        let result = tool
            .execute(args(json!({
                "title": "Dentist",
                "start": "2026-09-01T15:00:00Z",
                "end": "2026-09-01T14:00:00Z"
            })))
            .await;
        assert!(matches!(result, Err(ToolError::InvalidParameter { .. })));
    }

    #[tokio::test]
    async fn test_missing_title() {
        let tool = CreateCalendarEvent::new(Arc::new(FakeCalendar));

        let result = tool.execute(args(json!({"start": "2026-09-01T15:00:00Z"}))).await;
        assert!(matches!(result, Err(ToolError::MissingParameter(_))));
    }
}
