//! Tool-calling orchestrator for the voice assistant backend.
//!
//! The orchestrator takes one transcribed utterance plus the session's
//! recent context and produces one reply. It drives the model with the
//! registry's tool schemas, validates and dispatches requested tool calls
//! concurrently, and folds the outcomes back into a spoken answer.
//!
//! Failure handling is layered so the caller always gets something
//! speakable: tool failures become outcome payloads, a failed fold-back
//! call degrades to a templated summary of the successes, and with nothing
//! to summarize a fixed apology is returned.

mod error;
mod orchestrator;
mod outcome;
mod prompt;

pub use error::OrchestratorError;
pub use orchestrator::Orchestrator;
pub use outcome::{OrchestratorReply, ToolOutcome, ToolPayload};
pub use prompt::APOLOGY;
