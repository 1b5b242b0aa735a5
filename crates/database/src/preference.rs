//! Per-user briefing preference storage.

use sqlx::SqlitePool;

use crate::models::BriefingPreferences;
use crate::Result;

/// Get the briefing preferences for a user, if stored.
pub async fn get_preferences(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<BriefingPreferences>> {
    let record = sqlx::query_as::<_, BriefingPreferences>(
        r#"
        SELECT user_id, include_calendar, include_emails, include_bills,
               max_events, max_emails, important_only, updated_at
        FROM briefing_preferences
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Create or update the briefing preferences for a user.
pub async fn upsert_preferences(pool: &SqlitePool, prefs: &BriefingPreferences) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO briefing_preferences (user_id, include_calendar, include_emails, include_bills, max_events, max_emails, important_only)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            include_calendar = excluded.include_calendar,
            include_emails = excluded.include_emails,
            include_bills = excluded.include_bills,
            max_events = excluded.max_events,
            max_emails = excluded.max_emails,
            important_only = excluded.important_only,
            updated_at = datetime('now')
        "#,
    )
    .bind(&prefs.user_id)
    .bind(prefs.include_calendar)
    .bind(prefs.include_emails)
    .bind(prefs.include_bills)
    .bind(prefs.max_events)
    .bind(prefs.max_emails)
    .bind(prefs.important_only)
    .execute(pool)
    .await?;

    Ok(())
}

/// Clear the stored preferences for a user.
pub async fn clear_preferences(pool: &SqlitePool, user_id: &str) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM briefing_preferences
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}
