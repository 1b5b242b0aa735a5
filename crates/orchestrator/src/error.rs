//! Error types for orchestrator operations.

use assistant_core::ModelError;
use thiserror::Error;

/// Errors that can occur during orchestration.
///
/// Tool failures never appear here: they are contained as outcome payloads
/// and folded back into the conversation. Only a failure of the initial
/// model call, where there is nothing to reply with at all, surfaces.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The initial model call failed.
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}
