//! Call and turn audit log persistence.

use sqlx::SqlitePool;

use crate::models::{CallRecord, TurnRecord};
use crate::Result;

/// Insert the audit record for an ended call.
pub async fn insert_call(pool: &SqlitePool, record: &CallRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO call_log (call_id, from_endpoint, to_endpoint, started_at, ended_at, end_reason, duration_secs, turn_count)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.call_id)
    .bind(&record.from_endpoint)
    .bind(&record.to_endpoint)
    .bind(&record.started_at)
    .bind(&record.ended_at)
    .bind(&record.end_reason)
    .bind(record.duration_secs)
    .bind(record.turn_count)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the audit record for a call.
pub async fn get_call(pool: &SqlitePool, call_id: &str) -> Result<Option<CallRecord>> {
    let record = sqlx::query_as::<_, CallRecord>(
        r#"
        SELECT call_id, from_endpoint, to_endpoint, started_at, ended_at, end_reason, duration_secs, turn_count
        FROM call_log
        WHERE call_id = ?
        "#,
    )
    .bind(call_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Append one turn to the turn log.
pub async fn insert_turn(
    pool: &SqlitePool,
    call_id: &str,
    role: &str,
    text: &str,
    metadata: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO turn_log (call_id, role, text, metadata)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(call_id)
    .bind(role)
    .bind(text)
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// List the turns of a call in append order.
pub async fn list_turns(pool: &SqlitePool, call_id: &str) -> Result<Vec<TurnRecord>> {
    let rows = sqlx::query_as::<_, TurnRecord>(
        r#"
        SELECT id, call_id, role, text, metadata, created_at
        FROM turn_log
        WHERE call_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(call_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
