//! Tool dispatch outcome types.

use assistant_core::ToolCallRequest;
use serde::{Deserialize, Serialize};

/// What happened to one dispatched tool call.
///
/// Every requested call produces exactly one outcome; failures are payloads
/// here, never errors that cross the dispatch boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolPayload {
    /// The tool ran and returned content.
    Success { content: String },
    /// The model asked for a tool that is not registered.
    UnknownTool,
    /// The arguments were not valid JSON or failed schema validation.
    InvalidArguments { reason: String },
    /// The tool was dispatched but its handler failed.
    ToolExecutionFailed { reason: String },
}

impl ToolPayload {
    /// Whether this outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, ToolPayload::Success { .. })
    }

    /// Render the payload as the tool-role message content for the model.
    pub fn as_model_content(&self) -> String {
        match self {
            ToolPayload::Success { content } => content.clone(),
            ToolPayload::UnknownTool => "Error: no such tool is available.".to_string(),
            ToolPayload::InvalidArguments { reason } => {
                format!("Error: invalid arguments: {}", reason)
            }
            ToolPayload::ToolExecutionFailed { reason } => {
                format!("Error: the tool could not complete: {}", reason)
            }
        }
    }
}

/// One tool call and what became of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// The call as the model requested it.
    pub call: ToolCallRequest,
    /// The contained result.
    pub payload: ToolPayload,
}

/// The orchestrator's answer for one utterance.
#[derive(Debug, Clone)]
pub struct OrchestratorReply {
    /// Final user-visible text.
    pub text: String,
    /// Tool calls the model requested (empty for plain replies).
    pub tool_calls: Vec<ToolCallRequest>,
    /// One outcome per requested call, in request order.
    pub outcomes: Vec<ToolOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_success_flag() {
        assert!(ToolPayload::Success {
            content: "ok".to_string()
        }
        .is_success());
        assert!(!ToolPayload::UnknownTool.is_success());
    }

    #[test]
    fn test_model_content_contains_reason() {
        let payload = ToolPayload::InvalidArguments {
            reason: "missing title".to_string(),
        };
        assert!(payload.as_model_content().contains("missing title"));
    }
}
