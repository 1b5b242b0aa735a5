//! Error types for tool operations.

use thiserror::Error;

/// Errors that can occur during tool validation and execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool not found in registry.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Missing required parameter.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// Invalid parameter value.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Upstream provider call failed.
    #[error("Provider error: {0}")]
    Provider(#[from] assistant_core::ProviderError),

    /// General execution error.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}
