//! Calendar lookup tool.

use std::sync::Arc;

use assistant_core::{CalendarEvent, CalendarProvider};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Lists calendar events for a date or date range.
///
/// # Parameters
///
/// - `date` (optional): A single day, YYYY-MM-DD. Defaults to today.
/// - `start_date` / `end_date` (optional): An inclusive range of days.
///   Ignored when `date` is given.
pub struct GetCalendarEvents {
    calendar: Arc<dyn CalendarProvider>,
}

impl GetCalendarEvents {
    pub fn new(calendar: Arc<dyn CalendarProvider>) -> Self {
        Self { calendar }
    }

    fn resolve_range(&self, args: &ToolArgs) -> Result<(NaiveDate, NaiveDate), ToolError> {
        if let Some(date) = args.get_string_opt("date") {
            let day = parse_date("date", &date)?;
            return Ok((day, day));
        }

        match (args.get_string_opt("start_date"), args.get_string_opt("end_date")) {
            (Some(start), Some(end)) => {
                let start = parse_date("start_date", &start)?;
                let end = parse_date("end_date", &end)?;
                if end < start {
                    return Err(ToolError::InvalidParameter {
                        name: "end_date".to_string(),
                        reason: "before start_date".to_string(),
                    });
                }
                Ok((start, end))
            }
            (None, None) => {
                let today = Utc::now().date_naive();
                Ok((today, today))
            }
            (Some(_), None) => Err(ToolError::MissingParameter("end_date".to_string())),
            (None, Some(_)) => Err(ToolError::MissingParameter("start_date".to_string())),
        }
    }
}

fn parse_date(name: &str, value: &str) -> Result<NaiveDate, ToolError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ToolError::InvalidParameter {
        name: name.to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })
}

fn render(events: &[CalendarEvent], start: NaiveDate, end: NaiveDate) -> String {
    let span = if start == end {
        start.to_string()
    } else {
        format!("{} to {}", start, end)
    };

    if events.is_empty() {
        return format!("No calendar events for {}.", span);
    }

    let mut out = format!("{} event(s) for {}:\n", events.len(), span);
    for event in events {
        out.push_str(&format!(
            "- {} at {}{}\n",
            event.title,
            event.start.format("%Y-%m-%d %H:%M"),
            event
                .location
                .as_deref()
                .map(|l| format!(" ({})", l))
                .unwrap_or_default()
        ));
    }
    out
}

#[async_trait]
impl Tool for GetCalendarEvents {
    fn name(&self) -> &str {
        "get_calendar_events"
    }

    fn description(&self) -> &str {
        "Lists the user's calendar events for a day or a date range. \
         Defaults to today when no date is given."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "date": {
                    "type": "string",
                    "description": "Single day to list, YYYY-MM-DD. Defaults to today."
                },
                "start_date": {
                    "type": "string",
                    "description": "Range start, YYYY-MM-DD (inclusive)."
                },
                "end_date": {
                    "type": "string",
                    "description": "Range end, YYYY-MM-DD (inclusive)."
                }
            },
            "required": []
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let (start, end) = self.resolve_range(&args)?;
        debug!("Listing events {} to {} for {}", start, end, args.user_id);

        let range_start = start.and_hms_opt(0, 0, 0).expect("midnight is valid").and_utc();
        let range_end = (end + Duration::days(1))
            .and_hms_opt(0, 0, 0)
            .expect("midnight is valid")
            .and_utc();

        let mut events = self
            .calendar
            .events_between(&args.user_id, range_start, range_end)
            .await?;
        events.sort_by_key(|e| e.start);

        Ok(ToolOutput::success(render(&events, start, end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::{EventPatch, NewCalendarEvent, ProviderError};
    use chrono::{DateTime, TimeZone};
    use std::collections::HashMap;

    struct FakeCalendar {
        events: Vec<CalendarEvent>,
    }

    #[async_trait]
    impl CalendarProvider for FakeCalendar {
        async fn events_between(
            &self,
            _user_id: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Vec<CalendarEvent>, ProviderError> {
            Ok(self
                .events
                .iter()
                .filter(|e| e.start >= start && e.start < end)
                .cloned()
                .collect())
        }

        async fn create_event(
            &self,
            _user_id: &str,
            _event: NewCalendarEvent,
        ) -> Result<CalendarEvent, ProviderError> {
            unimplemented!()
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

    fn event(title: &str, y: i32, m: u32, d: u32) -> CalendarEvent {
        CalendarEvent {
            id: format!("evt-{}", title),
            title: title.to_string(),
            description: None,
            location: None,
            start: Utc.with_ymd_and_hms(y, m, d, 14, 0, 0).unwrap(),
            end: None,
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
    async fn test_single_day() {
        let tool = GetCalendarEvents::new(Arc::new(FakeCalendar {
            events: vec![event("Dentist", 2026, 8, 29), event("Flight", 2026, 8, 30)],
        }));

        let result = tool.execute(args(json!({"date": "2026-08-29"}))).await.unwrap();
        assert!(result.content.contains("Dentist"));
        assert!(!result.content.contains("Flight"));
    }

    #[tokio::test]
    async fn test_range() {
        let tool = GetCalendarEvents::new(Arc::new(FakeCalendar {
            events: vec![event("Dentist", 2026, 8, 29), event("Flight", 2026, 8, 30)],
        }));

        let result = tool
            .execute(args(
                json!({"start_date": "2026-08-29", "end_date": "2026-08-30"}),
            ))
            .await
            .unwrap();
        assert!(result.content.contains("Dentist"));
        assert!(result.content.contains("Flight"));
    }

    #[tokio::test]
    async fn test_bad_date() {
        let tool = GetCalendarEvents::new(Arc::new(FakeCalendar { events: vec![] }));

        let result = tool.execute(args(json!({"date": "tomorrow"}))).await;
        assert!(matches!(result, Err(ToolError::InvalidParameter { .. })));
    }

    #[tokio::test]
    async fn test_half_open_range_rejected() {
        let tool = GetCalendarEvents::new(Arc::new(FakeCalendar { events: vec![] }));

        let result = tool.execute(args(json!({"start_date": "2026-08-29"}))).await;
        assert!(matches!(result, Err(ToolError::MissingParameter(_))));
    }

    #[tokio::test]
    async fn test_empty_day_message() {
        let tool = GetCalendarEvents::new(Arc::new(FakeCalendar { events: vec![] }));

        let result = tool.execute(args(json!({"date": "2026-08-29"}))).await.unwrap();
        assert!(result.content.contains("No calendar events"));
    }
}
