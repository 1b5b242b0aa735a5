//! Error types for session lifecycle operations.

use thiserror::Error;

/// Errors that can occur during session lifecycle operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An active session already exists for this call id.
    #[error("session already exists for call: {0}")]
    DuplicateSession(String),

    /// No active session exists for this call id (unknown, ended, or expired).
    #[error("no active session for call: {0}")]
    SessionNotFound(String),
}
