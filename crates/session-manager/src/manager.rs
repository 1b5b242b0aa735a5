//! Session manager: keyed session cache with idle-timeout eviction.

use std::env;
use std::time::Duration;

use chrono::Utc;
use database::{call_log, CallRecord, Database};
use indexmap::IndexMap;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::session::{Session, SessionStatus, TurnRole};

/// Default idle timeout before a session is evicted (30 minutes).
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 30 * 60;

/// Default maximum number of turns before a call is wound down.
const DEFAULT_MAX_TURNS: usize = 20;

/// Configuration for the session manager.
#[derive(Debug, Clone)]
pub struct SessionManagerConfig {
    /// Idle time after which a session becomes unreachable.
    pub idle_timeout: Duration,
    /// Turn ceiling; `should_continue` returns false at this count.
    pub max_turns: usize,
}

impl Default for SessionManagerConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl SessionManagerConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `SESSION_IDLE_TIMEOUT_SECS` - Idle timeout in seconds (default: 1800)
    /// - `SESSION_MAX_TURNS` - Turn ceiling per call (default: 20)
    pub fn from_env() -> Self {
        let idle_timeout = env::var("SESSION_IDLE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS));

        let max_turns = env::var("SESSION_MAX_TURNS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_TURNS);

        Self {
            idle_timeout,
            max_turns,
        }
    }
}

/// Owns per-call session state for the lifetime of each call.
///
/// The session cache is the only shared mutable structure in the backend;
/// it is keyed by call id so no state crosses session boundaries. Sessions
/// are evicted explicitly by [`end`](SessionManager::end) or lazily once
/// they exceed the idle timeout, whichever comes first.
///
/// All audit writes are fire-and-forget: a persistence failure is logged
/// and never aborts the live conversation.
pub struct SessionManager {
    /// Live sessions by call id, in insertion order.
    sessions: RwLock<IndexMap<String, Session>>,
    config: SessionManagerConfig,
    /// Optional audit store for call and turn records.
    database: Option<Database>,
}

impl SessionManager {
    /// Create a new session manager.
    pub fn new(config: SessionManagerConfig) -> Self {
        Self {
            sessions: RwLock::new(IndexMap::new()),
            config,
            database: None,
        }
    }

    /// Create a session manager that audits calls and turns to the database.
    pub fn with_database(config: SessionManagerConfig, database: Database) -> Self {
        Self {
            sessions: RwLock::new(IndexMap::new()),
            config,
            database: Some(database),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SessionManagerConfig {
        &self.config
    }

    /// Start a session for a call.
    ///
    /// Fails with [`SessionError::DuplicateSession`] if an active session
    /// already exists for `call_id`.
    pub async fn start(&self, call_id: &str, from: &str, to: &str) -> Result<Session, SessionError> {
        let mut sessions = self.sessions.write().await;

        match sessions.get(call_id) {
            Some(existing) if !existing.is_idle(self.config.idle_timeout) => {
                return Err(SessionError::DuplicateSession(call_id.to_string()));
            }
            Some(_) => {
                // Stale entry from an expired call; replace it
                sessions.shift_remove(call_id);
            }
            None => {}
        }

        info!("Starting session for call {} ({} -> {})", call_id, from, to);

        let session = Session::new(call_id, from, to);
        sessions.insert(call_id.to_string(), session.clone());
        Ok(session)
    }

    /// Append a turn to an active session. This is the only mutation path.
    ///
    /// Fails with [`SessionError::SessionNotFound`] if no active session
    /// exists for `call_id` (unknown, ended, or idle-expired).
    pub async fn append_turn(
        &self,
        call_id: &str,
        role: TurnRole,
        text: &str,
        metadata: Option<Value>,
    ) -> Result<Session, SessionError> {
        let mut sessions = self.sessions.write().await;

        let expired = sessions
            .get(call_id)
            .map(|s| s.is_idle(self.config.idle_timeout))
            .unwrap_or(false);
        if expired {
            debug!("Evicting idle session for call {}", call_id);
            sessions.shift_remove(call_id);
        }

        let session = sessions
            .get_mut(call_id)
            .ok_or_else(|| SessionError::SessionNotFound(call_id.to_string()))?;

        session.push_turn(role, text, metadata.clone());
        let snapshot = session.clone();
        drop(sessions);

        self.audit_turn(call_id, role, text, metadata);

        Ok(snapshot)
    }

    /// Build model context from the most recent turns of a session.
    ///
    /// Works backward from the newest turn, including turns while they fit
    /// in the character budget, and returns them in chronological order.
    /// Never errors; returns an empty list if no active session exists.
    pub async fn build_context(&self, call_id: &str, max_chars: usize) -> Vec<(TurnRole, String)> {
        let sessions = self.sessions.read().await;

        let session = match sessions.get(call_id) {
            Some(s) if !s.is_idle(self.config.idle_timeout) => s,
            _ => return Vec::new(),
        };

        let mut context = Vec::new();
        let mut used = 0usize;
        for turn in session.turns.iter().rev() {
            let chars = turn.text.chars().count();
            if used + chars > max_chars {
                break;
            }
            used += chars;
            context.push((turn.role, turn.text.clone()));
        }

        context.reverse();
        context
    }

    /// Whether the call should continue.
    ///
    /// False once the turn counter reaches the configured maximum, and
    /// false for unknown or expired call ids.
    pub async fn should_continue(&self, call_id: &str) -> bool {
        let sessions = self.sessions.read().await;

        match sessions.get(call_id) {
            Some(s) if !s.is_idle(self.config.idle_timeout) => {
                s.turn_count < self.config.max_turns
            }
            _ => false,
        }
    }

    /// End a session and evict it from the cache.
    ///
    /// Idempotent by design: telephony status callbacks can race or
    /// duplicate, so ending an unknown or already-ended call logs and
    /// returns `None` instead of failing.
    pub async fn end(&self, call_id: &str, reason: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;

        let mut session = match sessions.shift_remove(call_id) {
            Some(session) => session,
            None => {
                debug!("end() for unknown or already-ended call {}", call_id);
                return None;
            }
        };
        drop(sessions);

        session.mark_ended(reason);
        info!(
            "Ended session for call {} (reason: {}, turns: {}, duration: {:?})",
            call_id, reason, session.turn_count, session.duration
        );

        self.audit_call(&session);

        Some(session)
    }

    /// Number of live (non-ended) sessions in the cache.
    pub async fn active_sessions(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .filter(|s| s.status == SessionStatus::Active && !s.is_idle(self.config.idle_timeout))
            .count()
    }

    /// Drop every session that has exceeded the idle timeout.
    ///
    /// Eviction is otherwise lazy (checked on access); a periodic sweep
    /// keeps the cache from accumulating abandoned calls.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_idle(self.config.idle_timeout));
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {} idle sessions", evicted);
        }
        evicted
    }

    /// Fire-and-forget audit write for one turn.
    fn audit_turn(&self, call_id: &str, role: TurnRole, text: &str, metadata: Option<Value>) {
        let Some(database) = self.database.clone() else {
            return;
        };
        let call_id = call_id.to_string();
        let text = text.to_string();
        let metadata = metadata.map(|v| v.to_string());

        tokio::spawn(async move {
            if let Err(e) = call_log::insert_turn(
                database.pool(),
                &call_id,
                role.as_str(),
                &text,
                metadata.as_deref(),
            )
            .await
            {
                warn!("Failed to persist turn for call {}: {}", call_id, e);
            }
        });
    }

    /// Fire-and-forget audit write for an ended call.
    fn audit_call(&self, session: &Session) {
        let Some(database) = self.database.clone() else {
            return;
        };

        let record = CallRecord {
            call_id: session.call_id.clone(),
            from_endpoint: session.from.clone(),
            to_endpoint: session.to.clone(),
            started_at: session.created_at.to_rfc3339(),
            ended_at: Utc::now().to_rfc3339(),
            end_reason: session
                .end_reason
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            duration_secs: session
                .duration
                .map(|d| d.as_secs() as i64)
                .unwrap_or_default(),
            turn_count: session.turn_count as i64,
        };

        tokio::spawn(async move {
            if let Err(e) = call_log::insert_call(database.pool(), &record).await {
                warn!("Failed to persist call record {}: {}", record.call_id, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new(SessionManagerConfig::default())
    }

    fn short_idle_manager(idle: Duration) -> SessionManager {
        SessionManager::new(SessionManagerConfig {
            idle_timeout: idle,
            max_turns: DEFAULT_MAX_TURNS,
        })
    }

    #[tokio::test]
    async fn test_start_and_duplicate() {
        let manager = manager();

        let session = manager.start("CA1", "+1000", "+2000").await.unwrap();
        assert_eq!(session.call_id, "CA1");
        assert_eq!(session.status, SessionStatus::Active);

        let result = manager.start("CA1", "+1000", "+2000").await;
        assert!(matches!(result, Err(SessionError::DuplicateSession(_))));
    }

    #[tokio::test]
    async fn test_append_turn_counter_and_order() {
        let manager = manager();
        manager.start("CA1", "+1000", "+2000").await.unwrap();

        manager
            .append_turn("CA1", TurnRole::User, "first", None)
            .await
            .unwrap();
        manager
            .append_turn("CA1", TurnRole::Assistant, "second", None)
            .await
            .unwrap();
        let session = manager
            .append_turn("CA1", TurnRole::User, "third", None)
            .await
            .unwrap();

        assert_eq!(session.turn_count, 3);
        assert_eq!(session.turn_count, session.turns.len());
        let texts: Vec<&str> = session.turns.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_append_turn_unknown_session() {
        let manager = manager();
        let result = manager
            .append_turn("CA404", TurnRole::User, "hello", None)
            .await;
        assert!(matches!(result, Err(SessionError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_build_context_respects_budget() {
        let manager = manager();
        manager.start("CA1", "+1000", "+2000").await.unwrap();

        manager
            .append_turn("CA1", TurnRole::User, "one", None)
            .await
            .unwrap();
        manager
            .append_turn("CA1", TurnRole::Assistant, "two", None)
            .await
            .unwrap();
        manager
            .append_turn("CA1", TurnRole::User, "three", None)
            .await
            .unwrap();

        // "three" (5) + "two" (3) fit in 8; "one" would exceed the budget
        let context = manager.build_context("CA1", 8).await;
        assert_eq!(context.len(), 2);
        assert_eq!(context[0].1, "two");
        assert_eq!(context[1].1, "three");

        let total: usize = context.iter().map(|(_, t)| t.chars().count()).sum();
        assert!(total <= 8);
    }

    #[tokio::test]
    async fn test_build_context_unknown_session_is_empty() {
        let manager = manager();
        assert!(manager.build_context("CA404", 1000).await.is_empty());
    }

    #[tokio::test]
    async fn test_should_continue_boundary() {
        let manager = SessionManager::new(SessionManagerConfig {
            idle_timeout: Duration::from_secs(1800),
            max_turns: 3,
        });
        manager.start("CA1", "+1000", "+2000").await.unwrap();

        manager
            .append_turn("CA1", TurnRole::User, "a", None)
            .await
            .unwrap();
        manager
            .append_turn("CA1", TurnRole::Assistant, "b", None)
            .await
            .unwrap();
        // max - 1 turns: keep going
        assert!(manager.should_continue("CA1").await);

        manager
            .append_turn("CA1", TurnRole::User, "c", None)
            .await
            .unwrap();
        // at max: stop
        assert!(!manager.should_continue("CA1").await);
    }

    #[tokio::test]
    async fn test_should_continue_unknown_session() {
        let manager = manager();
        assert!(!manager.should_continue("CA404").await);
    }

    #[tokio::test]
    async fn test_end_is_idempotent() {
        let manager = manager();
        manager.start("CA1", "+1000", "+2000").await.unwrap();

        let ended = manager.end("CA1", "completed").await.unwrap();
        assert_eq!(ended.status, SessionStatus::Ended);
        assert_eq!(ended.end_reason.as_deref(), Some("completed"));
        assert!(ended.duration.is_some());

        // Second end on the same call logs and returns None
        assert!(manager.end("CA1", "completed").await.is_none());

        // The ended session is unreachable
        let result = manager.append_turn("CA1", TurnRole::User, "x", None).await;
        assert!(matches!(result, Err(SessionError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_idle_session_is_unreachable() {
        let manager = short_idle_manager(Duration::from_millis(20));
        manager.start("CA1", "+1000", "+2000").await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        let result = manager.append_turn("CA1", TurnRole::User, "hello", None).await;
        assert!(matches!(result, Err(SessionError::SessionNotFound(_))));
        assert!(manager.build_context("CA1", 1000).await.is_empty());
        assert!(!manager.should_continue("CA1").await);
    }

    #[tokio::test]
    async fn test_start_replaces_expired_session() {
        let manager = short_idle_manager(Duration::from_millis(20));
        manager.start("CA1", "+1000", "+2000").await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        // The stale entry is replaced, not treated as a duplicate
        let session = manager.start("CA1", "+1000", "+2000").await.unwrap();
        assert_eq!(session.turn_count, 0);
    }

    #[tokio::test]
    async fn test_evict_idle_sweep() {
        let manager = short_idle_manager(Duration::from_millis(20));
        manager.start("CA1", "+1000", "+2000").await.unwrap();
        manager.start("CA2", "+3000", "+4000").await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        manager.start("CA3", "+5000", "+6000").await.unwrap();

        assert_eq!(manager.evict_idle().await, 2);
        assert_eq!(manager.active_sessions().await, 1);
    }
}
