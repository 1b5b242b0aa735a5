//! Core traits and types for the voice assistant backend.
//!
//! This crate provides the shared interface between the session manager,
//! the tool-calling orchestrator, and the daily briefing aggregator:
//!
//! - [`LanguageModel`] - The trait every model adapter implements
//! - [`ChatMessage`] / [`CompletionRequest`] / [`CompletionResponse`] - Model I/O
//! - [`CalendarProvider`] / [`EmailProvider`] / [`BillLedger`] - Data-source traits
//! - [`ModelError`] / [`ProviderError`] - Error types for adapter operations
//!
//! # Example
//!
//! ```rust
//! use assistant_core::{
//!     async_trait, CompletionRequest, CompletionResponse, LanguageModel, ModelError,
//! };
//!
//! struct CannedModel;
//!
//! #[async_trait]
//! impl LanguageModel for CannedModel {
//!     async fn complete(
//!         &self,
//!         _request: CompletionRequest,
//!     ) -> Result<CompletionResponse, ModelError> {
//!         Ok(CompletionResponse::text("Hello!"))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "CannedModel"
//!     }
//! }
//! ```

mod chat;
mod error;
mod model;
mod providers;

pub use chat::ChatMessage;
pub use error::{ModelError, ProviderError};
pub use model::{
    CompletionRequest, CompletionResponse, LanguageModel, ToolCallRequest, ToolSchema, Usage,
};
pub use providers::{
    Bill, BillLedger, CalendarEvent, CalendarProvider, EmailFlag, EmailMessage, EmailProvider,
    EmailQuery, EventPatch, NewBill, NewCalendarEvent,
};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
