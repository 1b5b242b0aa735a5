//! Briefing narrative prompts and the deterministic fallback text.

use chrono::NaiveDate;

use crate::types::{BriefingChannel, BriefingData};

/// System prompt for composing the briefing narrative.
pub fn system_prompt(channel: BriefingChannel) -> &'static str {
    match channel {
        BriefingChannel::Voice => {
            "You are a personal assistant delivering a spoken morning briefing \
             on a phone call. Be warm and concise: a few short sentences that \
             flow naturally when read aloud. Mention calendar events with their \
             times, the important emails, and any bills due soon. Do not use \
             lists, markdown, or headers."
        }
        BriefingChannel::Dashboard => {
            "You are a personal assistant writing a daily briefing for a \
             dashboard. Use short sections titled Calendar, Emails, and Bills, \
             each with a one-line summary followed by the items. Be complete \
             but scannable."
        }
    }
}

/// Render the assembled data as the user message for the narrative call.
pub fn data_prompt(date: NaiveDate, data: &BriefingData) -> String {
    let mut prompt = format!("Briefing data for {}:\n\n", date);

    prompt.push_str(&format!("Calendar events ({}):\n", data.events.len()));
    for event in &data.events {
        prompt.push_str(&format!(
            "- {} at {}{}\n",
            event.title,
            event.start.format("%H:%M"),
            event
                .location
                .as_deref()
                .map(|l| format!(" ({})", l))
                .unwrap_or_default()
        ));
    }

    prompt.push_str(&format!("\nImportant emails ({}):\n", data.emails.len()));
    for email in &data.emails {
        prompt.push_str(&format!("- from {}: {}\n", email.sender, email.subject));
    }

    prompt.push_str(&format!("\nBills due soon ({}):\n", data.bills.len()));
    for bill in &data.bills {
        prompt.push_str(&format!(
            "- {} (${:.2}) due {}\n",
            bill.name, bill.amount, bill.due_date
        ));
    }

    prompt
}

/// Deterministic narrative used when the model call fails.
///
/// Built section by section from whatever data survived the fan-out, so a
/// degraded briefing still reads sensibly.
pub fn fallback_text(data: &BriefingData, errors: &[String]) -> String {
    let mut parts = vec!["Here's your briefing for today.".to_string()];

    if data.events.is_empty() {
        parts.push("Your calendar is clear.".to_string());
    } else {
        let titles: Vec<String> = data
            .events
            .iter()
            .map(|e| format!("{} at {}", e.title, e.start.format("%H:%M")))
            .collect();
        parts.push(format!(
            "You have {} calendar event{}: {}.",
            data.events.len(),
            if data.events.len() == 1 { "" } else { "s" },
            titles.join(", ")
        ));
    }

    if !data.emails.is_empty() {
        parts.push(format!(
            "You have {} important email{}, including one from {} about {}.",
            data.emails.len(),
            if data.emails.len() == 1 { "" } else { "s" },
            data.emails[0].sender,
            data.emails[0].subject
        ));
    }

    if !data.bills.is_empty() {
        let names: Vec<String> = data
            .bills
            .iter()
            .map(|b| format!("{} (${:.2}) on {}", b.name, b.amount, b.due_date))
            .collect();
        parts.push(format!("Bills due soon: {}.", names.join(", ")));
    }

    if !errors.is_empty() {
        parts.push(format!(
            "I couldn't reach your {} right now.",
            errors.join(" or ")
        ));
    }

    parts.join(" ")
}

/// Friendly message for the already-delivered short circuit.
pub fn already_delivered_text() -> &'static str {
    "You've already received your briefing today. Is there anything else I can help you with?"
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::CalendarEvent;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_fallback_text_empty_data() {
        let text = fallback_text(&BriefingData::default(), &[]);
        assert!(text.contains("calendar is clear"));
    }

    #[test]
    fn test_fallback_text_mentions_failed_sources() {
        let errors = vec!["emails".to_string()];
        let text = fallback_text(&BriefingData::default(), &errors);
        assert!(text.contains("couldn't reach your emails"));
    }

    #[test]
    fn test_fallback_text_counts_events() {
        let data = BriefingData {
            events: vec![CalendarEvent {
                id: "e1".to_string(),
                title: "Standup".to_string(),
                description: None,
                location: None,
                start: Utc.with_ymd_and_hms(2026, 8, 29, 9, 30, 0).unwrap(),
                end: None,
            }],
            ..Default::default()
        };

        let text = fallback_text(&data, &[]);
        assert!(text.contains("1 calendar event"));
        assert!(text.contains("Standup at 09:30"));
    }
}
