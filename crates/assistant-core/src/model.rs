//! Language model trait and request/response types.
//!
//! A [`LanguageModel`] takes an ordered message list plus an optional set of
//! tool schemas, and returns reply text and/or a list of tool call requests.
//! Adapters are expected to be stateless and safely shared behind an `Arc`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chat::ChatMessage;
use crate::error::ModelError;

/// Declared schema for one callable tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name (used for dispatch).
    pub name: String,
    /// Human-readable description shown to the model.
    pub description: String,
    /// JSON Schema object describing the parameters.
    pub parameters: Value,
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Correlation id assigned by the model.
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// Raw JSON argument payload.
    pub arguments: String,
}

/// Token usage reported by the model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A completion request: ordered messages plus optional tool schemas.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Messages in conversation order.
    pub messages: Vec<ChatMessage>,
    /// Tools the model may call. Empty means plain text completion.
    pub tools: Vec<ToolSchema>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// Create a plain completion request with no tools.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            tools: Vec::new(),
            max_tokens: None,
            temperature: None,
        }
    }

    /// Attach tool schemas to the request.
    pub fn with_tools(mut self, tools: Vec<ToolSchema>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A completion response: reply text and/or tool call requests.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Reply text, if the model produced any.
    pub text: Option<String>,
    /// Tool calls the model wants executed.
    pub tool_calls: Vec<ToolCallRequest>,
    /// Token usage, if reported.
    pub usage: Option<Usage>,
}

impl CompletionResponse {
    /// Create a text-only response (useful for tests and fakes).
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            text: Some(content.into()),
            tool_calls: Vec::new(),
            usage: None,
        }
    }

    /// Whether the model requested any tool calls.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Trait for language model adapters.
///
/// Implementations wrap a concrete provider API. They must not retain
/// conversational state between calls; the caller owns the message list.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Run one completion request.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ModelError>;

    /// The adapter's name, for logging.
    fn name(&self) -> &str;
}
