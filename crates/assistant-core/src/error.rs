//! Error types for model and provider adapters.

use thiserror::Error;

/// Errors from language model adapters.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Adapter configuration problem (missing key, bad URL, etc.)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network-level failure (connect, timeout, etc.)
    #[error("network error: {0}")]
    Network(String),

    /// The API returned an error response.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API response could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors from calendar, email, and bill-ledger providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider could not be reached or timed out.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The provider rejected the request (auth, validation, quota).
    #[error("request rejected: {0}")]
    Rejected(String),
}
