//! Briefing completion persistence.
//!
//! The `briefing_completion` table is the idempotency key for "one briefing
//! per user per day": UNIQUE(user_id, briefing_date). Callers are expected
//! to check-then-act defensively; a second insert for the same day fails
//! with an `AlreadyExists` error.

use sqlx::SqlitePool;

use crate::models::BriefingCompletion;
use crate::{DatabaseError, Result};

/// Get the completion record for a (user, date), if any.
pub async fn get_completion(
    pool: &SqlitePool,
    user_id: &str,
    briefing_date: &str,
) -> Result<Option<BriefingCompletion>> {
    let record = sqlx::query_as::<_, BriefingCompletion>(
        r#"
        SELECT id, user_id, briefing_date, is_completed, completed_at,
               event_count, email_count, bill_count, content, channel
        FROM briefing_completion
        WHERE user_id = ? AND briefing_date = ?
        "#,
    )
    .bind(user_id)
    .bind(briefing_date)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Record a completed briefing for a (user, date).
pub async fn insert_completion(
    pool: &SqlitePool,
    user_id: &str,
    briefing_date: &str,
    event_count: i64,
    email_count: i64,
    bill_count: i64,
    content: &str,
    channel: &str,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO briefing_completion (user_id, briefing_date, is_completed, event_count, email_count, bill_count, content, channel)
        VALUES (?, ?, 1, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(briefing_date)
    .bind(event_count)
    .bind(email_count)
    .bind(bill_count)
    .bind(content)
    .bind(channel)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(DatabaseError::AlreadyExists {
                entity: "briefing_completion",
                id: format!("{}:{}", user_id, briefing_date),
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// List completions for a user, newest date first.
pub async fn list_completions(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<BriefingCompletion>> {
    let rows = sqlx::query_as::<_, BriefingCompletion>(
        r#"
        SELECT id, user_id, briefing_date, is_completed, completed_at,
               event_count, email_count, bill_count, content, channel
        FROM briefing_completion
        WHERE user_id = ?
        ORDER BY briefing_date DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
