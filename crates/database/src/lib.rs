//! SQLite audit and preference store for the voice assistant backend.
//!
//! This crate provides async database operations for call/turn audit logs,
//! briefing completion records, and briefing preferences using SQLx with
//! SQLite. All writes from the core components are best-effort: callers
//! log failures and continue rather than aborting a live call.
//!
//! # Example
//!
//! ```no_run
//! use database::{call_log, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:assistant.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Append a turn to the audit log
//!     call_log::insert_turn(db.pool(), "CA123", "user", "What's on my calendar?", None).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod briefing;
pub mod call_log;
pub mod error;
pub mod models;
pub mod preference;

pub use error::{DatabaseError, Result};
pub use models::{BriefingCompletion, BriefingPreferences, CallRecord, TurnRecord};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Set high enough to handle concurrent sessions with audit writes.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/assistant.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database: {} (pool size: {})", url, pool_size);

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_call_audit_roundtrip() {
        let db = test_db().await;

        call_log::insert_turn(db.pool(), "CA1", "user", "hello", None)
            .await
            .unwrap();
        call_log::insert_turn(db.pool(), "CA1", "assistant", "hi there", Some("{}"))
            .await
            .unwrap();

        let record = CallRecord {
            call_id: "CA1".to_string(),
            from_endpoint: "+15551230001".to_string(),
            to_endpoint: "+15551230002".to_string(),
            started_at: "2026-08-29T12:00:00Z".to_string(),
            ended_at: "2026-08-29T12:03:00Z".to_string(),
            end_reason: "completed".to_string(),
            duration_secs: 180,
            turn_count: 2,
        };
        call_log::insert_call(db.pool(), &record).await.unwrap();

        let fetched = call_log::get_call(db.pool(), "CA1").await.unwrap().unwrap();
        assert_eq!(fetched, record);

        let turns = call_log::list_turns(db.pool(), "CA1").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, "user");
        assert_eq!(turns[1].role, "assistant");
    }

    #[tokio::test]
    async fn test_briefing_completion_unique_per_day() {
        let db = test_db().await;

        briefing::insert_completion(db.pool(), "user-1", "2026-08-29", 3, 2, 1, "text", "voice")
            .await
            .unwrap();

        let record = briefing::get_completion(db.pool(), "user-1", "2026-08-29")
            .await
            .unwrap()
            .unwrap();
        assert!(record.is_completed);
        assert_eq!(record.event_count, 3);

        // Second insert for the same day violates the idempotency key
        let result = briefing::insert_completion(
            db.pool(),
            "user-1",
            "2026-08-29",
            0,
            0,
            0,
            "again",
            "voice",
        )
        .await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));

        // A different day is fine
        briefing::insert_completion(db.pool(), "user-1", "2026-08-30", 1, 1, 1, "next", "voice")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_preferences_upsert() {
        let db = test_db().await;

        assert!(preference::get_preferences(db.pool(), "user-1")
            .await
            .unwrap()
            .is_none());

        let prefs = BriefingPreferences {
            user_id: "user-1".to_string(),
            include_calendar: true,
            include_emails: false,
            include_bills: true,
            max_events: 5,
            max_emails: 3,
            important_only: true,
            updated_at: String::new(),
        };
        preference::upsert_preferences(db.pool(), &prefs).await.unwrap();

        let fetched = preference::get_preferences(db.pool(), "user-1")
            .await
            .unwrap()
            .unwrap();
        assert!(!fetched.include_emails);
        assert_eq!(fetched.max_events, 5);

        let updated = BriefingPreferences {
            include_emails: true,
            ..prefs
        };
        preference::upsert_preferences(db.pool(), &updated)
            .await
            .unwrap();
        let fetched = preference::get_preferences(db.pool(), "user-1")
            .await
            .unwrap()
            .unwrap();
        assert!(fetched.include_emails);
    }
}
