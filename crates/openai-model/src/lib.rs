//! OpenAI-compatible language model adapter.
//!
//! Provides [`OpenAiModel`], an implementation of the
//! [`assistant_core::LanguageModel`] trait over any OpenAI-compatible
//! chat-completions endpoint, with an optional fallback model tier that is
//! attempted only when the primary call errors outright.

mod api_types;
mod config;
mod model;

pub use config::{OpenAiModelConfig, OpenAiModelConfigBuilder};
pub use model::OpenAiModel;
