//! Per-call conversational session state.
//!
//! This crate owns the live state of ongoing voice calls:
//!
//! - [`SessionManager`] - keyed session cache with idle-timeout eviction
//! - [`Session`] / [`Turn`] - per-call state and its ordered turn list
//! - [`SessionError`] - lifecycle errors (`DuplicateSession`, `SessionNotFound`)
//!
//! The in-memory session is the source of truth for the duration of a call;
//! the durable audit log is advisory. Persistence failures are logged and
//! never abort a live conversation.

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::{SessionManager, SessionManagerConfig};
pub use session::{Session, SessionStatus, Turn, TurnRole};
