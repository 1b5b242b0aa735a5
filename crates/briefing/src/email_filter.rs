//! Two-tier email importance filtering.
//!
//! Importance is content-dependent, so the model classifier runs first.
//! When the classifier fails for any reason (network, quota, unparseable
//! output) the deterministic rule-based filter takes over. The fallback is
//! invisible to the caller; it only changes which emails survive.

use assistant_core::{ChatMessage, CompletionRequest, EmailMessage, LanguageModel, ModelError};
use tracing::{debug, warn};

/// Subject keywords that mark an email as likely important.
const IMPORTANT_KEYWORDS: [&str; 7] = [
    "urgent",
    "action required",
    "invoice",
    "payment",
    "deadline",
    "reminder",
    "confirm",
];

/// Sender patterns that mark an email as bulk mail.
const BULK_SENDER_PATTERNS: [&str; 4] = ["no-reply", "noreply", "newsletter", "notifications@"];

/// Filter the given emails down to at most `max_results` important ones.
///
/// Tries the model classifier first and falls back to [`rule_based_filter`]
/// on any failure.
pub async fn filter_important(
    model: &dyn LanguageModel,
    emails: Vec<EmailMessage>,
    max_results: usize,
) -> Vec<EmailMessage> {
    if emails.is_empty() {
        return emails;
    }

    match classify_with_model(model, &emails).await {
        Ok(indices) => {
            debug!(
                "Model classified {}/{} emails as important",
                indices.len(),
                emails.len()
            );
            let mut selected: Vec<EmailMessage> = indices
                .into_iter()
                .filter_map(|i| emails.get(i).cloned())
                .collect();
            selected.truncate(max_results);
            selected
        }
        Err(e) => {
            warn!("Email classifier unavailable ({}), using rule-based filter", e);
            rule_based_filter(emails, max_results)
        }
    }
}

/// Ask the model which emails are important.
///
/// The model sees one numbered line per email and must answer with a JSON
/// array of indices. Anything else is treated as a classifier failure.
async fn classify_with_model(
    model: &dyn LanguageModel,
    emails: &[EmailMessage],
) -> Result<Vec<usize>, ModelError> {
    let mut listing = String::new();
    for (i, email) in emails.iter().enumerate() {
        listing.push_str(&format!(
            "{}. from: {} | subject: {} | {}\n",
            i, email.sender, email.subject, email.snippet
        ));
    }

    let request = CompletionRequest::new(vec![
        ChatMessage::system(
            "You classify emails by importance for a spoken daily briefing. \
             Important emails need the user's attention today: personal \
             correspondence, bills, deadlines, confirmations, anything \
             time-sensitive. Bulk mail, newsletters, and promotions are not \
             important. Reply with ONLY a JSON array of the indices of the \
             important emails, most important first, e.g. [2, 0].",
        ),
        ChatMessage::user(listing),
    ])
    .with_temperature(0.0);

    let response = model.complete(request).await?;
    let text = response
        .text
        .ok_or_else(|| ModelError::InvalidResponse("classifier returned no text".to_string()))?;

    parse_indices(&text, emails.len())
        .ok_or_else(|| ModelError::InvalidResponse(format!("unparseable classifier output: {}", text)))
}

/// Extract a JSON index array from the model's reply, tolerating prose
/// around it. Out-of-range indices invalidate the whole reply.
fn parse_indices(text: &str, len: usize) -> Option<Vec<usize>> {
    let start = text.find('[')?;
    let end = text[start..].find(']')? + start;
    let indices: Vec<usize> = serde_json::from_str(&text[start..=end]).ok()?;

    if indices.iter().any(|&i| i >= len) {
        return None;
    }
    Some(indices)
}

/// Deterministic fallback filter.
///
/// Scores each email from sender patterns, subject keywords, and the
/// starred/important flags, keeps positive scores, and sorts by
/// (importance, unread, recency).
pub fn rule_based_filter(emails: Vec<EmailMessage>, max_results: usize) -> Vec<EmailMessage> {
    let mut scored: Vec<(i32, EmailMessage)> = emails
        .into_iter()
        .map(|email| (importance_score(&email), email))
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .cmp(score_a)
            .then(b.unread.cmp(&a.unread))
            .then(b.received_at.cmp(&a.received_at))
    });

    scored
        .into_iter()
        .take(max_results)
        .map(|(_, email)| email)
        .collect()
}

fn importance_score(email: &EmailMessage) -> i32 {
    let mut score = 0;

    if email.important {
        score += 3;
    }
    if email.starred {
        score += 2;
    }

    let subject = email.subject.to_lowercase();
    if IMPORTANT_KEYWORDS.iter().any(|kw| subject.contains(kw)) {
        score += 2;
    }

    let sender = email.sender.to_lowercase();
    if BULK_SENDER_PATTERNS.iter().any(|p| sender.contains(p)) {
        score -= 3;
    }

    if email.unread {
        score += 1;
    }

    score
}
