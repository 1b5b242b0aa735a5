//! Main orchestrator that turns one utterance into one reply.

use std::collections::HashMap;
use std::sync::Arc;

use assistant_core::{
    ChatMessage, CompletionRequest, LanguageModel, ToolCallRequest,
};
use assistant_tools::{ToolError, ToolRegistry};
use futures::future::join_all;
use serde_json::Value;
use session_manager::TurnRole;
use tracing::{debug, info, warn};

use crate::error::OrchestratorError;
use crate::outcome::{OrchestratorReply, ToolOutcome, ToolPayload};
use crate::prompt::{self, APOLOGY};

/// Orchestrates the model conversation and tool dispatch for one utterance.
///
/// The flow per utterance:
/// 1. Build the message list: capability prompt, recent context turns, then
///    the utterance, sent with the registry's full tool schema list.
/// 2. Zero tool calls requested: the model text is the final reply.
/// 3. Otherwise validate and dispatch every requested call concurrently;
///    each produces exactly one outcome, failures contained as payloads.
/// 4. A second model call folds the results into a reply. If that call
///    fails, a templated summary of the successful outcomes stands in; if
///    nothing succeeded either, a fixed apology is returned.
pub struct Orchestrator {
    model: Arc<dyn LanguageModel>,
    registry: Arc<ToolRegistry>,
}

impl Orchestrator {
    /// Create an orchestrator over a model and a tool registry.
    pub fn new(model: Arc<dyn LanguageModel>, registry: Arc<ToolRegistry>) -> Self {
        Self { model, registry }
    }

    /// Process one user utterance into a reply.
    ///
    /// `context_turns` are the session's recent turns in chronological
    /// order, as produced by the session manager's context builder.
    pub async fn process(
        &self,
        utterance: &str,
        context_turns: &[(TurnRole, String)],
        call_id: &str,
        user_id: &str,
    ) -> Result<OrchestratorReply, OrchestratorError> {
        let mut messages = vec![ChatMessage::system(prompt::capability_prompt())];
        for (role, text) in context_turns {
            messages.push(match role {
                TurnRole::User => ChatMessage::user(text.clone()),
                TurnRole::Assistant => ChatMessage::assistant(text.clone()),
            });
        }
        messages.push(ChatMessage::user(utterance));

        let request =
            CompletionRequest::new(messages.clone()).with_tools(self.registry.schemas());
        let response = self.model.complete(request).await?;

        if !response.has_tool_calls() {
            debug!("Call {}: plain reply, no tools requested", call_id);
            let text = response
                .text
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| APOLOGY.to_string());
            return Ok(OrchestratorReply {
                text,
                tool_calls: Vec::new(),
                outcomes: Vec::new(),
            });
        }

        let tool_calls = response.tool_calls.clone();
        info!(
            "Call {}: model requested {} tool call(s): {:?}",
            call_id,
            tool_calls.len(),
            tool_calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );

        let outcomes = join_all(
            tool_calls
                .iter()
                .map(|call| self.dispatch_one(call, user_id)),
        )
        .await;

        let failures = outcomes.iter().filter(|o| !o.payload.is_success()).count();
        if failures > 0 {
            warn!(
                "Call {}: {}/{} tool call(s) failed",
                call_id,
                failures,
                outcomes.len()
            );
        }

        let text = self.fold(messages, &tool_calls, &outcomes).await;

        Ok(OrchestratorReply {
            text,
            tool_calls,
            outcomes,
        })
    }

    /// Validate and execute one tool call, containing every failure.
    async fn dispatch_one(&self, call: &ToolCallRequest, user_id: &str) -> ToolOutcome {
        let params = if call.arguments.trim().is_empty() {
            Ok(HashMap::new())
        } else {
            serde_json::from_str::<HashMap<String, Value>>(&call.arguments)
        };

        let payload = match params {
            Err(e) => ToolPayload::InvalidArguments {
                reason: e.to_string(),
            },
            Ok(params) => match self.registry.execute(&call.name, params, user_id).await {
                Ok(output) if output.success => ToolPayload::Success {
                    content: output.content,
                },
                Ok(output) => ToolPayload::ToolExecutionFailed {
                    reason: output.content,
                },
                Err(ToolError::NotFound(_)) => ToolPayload::UnknownTool,
                Err(
                    e @ (ToolError::MissingParameter(_)
                    | ToolError::InvalidParameter { .. }
                    | ToolError::JsonError(_)),
                ) => ToolPayload::InvalidArguments {
                    reason: e.to_string(),
                },
                Err(e) => ToolPayload::ToolExecutionFailed {
                    reason: e.to_string(),
                },
            },
        };

        ToolOutcome {
            call: call.clone(),
            payload,
        }
    }

    /// Fold tool outcomes back into the conversation for the final reply.
    async fn fold(
        &self,
        mut messages: Vec<ChatMessage>,
        tool_calls: &[ToolCallRequest],
        outcomes: &[ToolOutcome],
    ) -> String {
        messages.push(ChatMessage::assistant_tool_calls(tool_calls.to_vec()));
        for outcome in outcomes {
            messages.push(ChatMessage::tool(
                outcome.call.id.clone(),
                outcome.payload.as_model_content(),
            ));
        }

        match self.model.complete(CompletionRequest::new(messages)).await {
            Ok(response) => match response.text.filter(|t| !t.trim().is_empty()) {
                Some(text) => text,
                None => {
                    warn!("Fold-back call returned no text, using templated summary");
                    templated_summary(outcomes).unwrap_or_else(|| APOLOGY.to_string())
                }
            },
            Err(e) => {
                warn!("Fold-back call failed ({}), using templated summary", e);
                templated_summary(outcomes).unwrap_or_else(|| APOLOGY.to_string())
            }
        }
    }
}

/// Deterministic reply built from the successful outcomes only.
fn templated_summary(outcomes: &[ToolOutcome]) -> Option<String> {
    let successes: Vec<String> = outcomes
        .iter()
        .filter_map(|o| match &o.payload {
            ToolPayload::Success { content } => Some(content.trim().to_string()),
            _ => None,
        })
        .collect();

    if successes.is_empty() {
        return None;
    }
    Some(format!("Here's what I found. {}", successes.join(" ")))
}
