//! OpenAiModel implementation over a chat-completions API.

use std::time::Duration;

use assistant_core::{
    async_trait, ChatMessage, CompletionRequest, CompletionResponse, LanguageModel, ModelError,
    ToolCallRequest, Usage,
};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{
    ApiError, ChatCompletionRequest, ChatCompletionResponse, WireFunctionCall, WireMessage,
    WireTool, WireToolCall,
};
use crate::config::OpenAiModelConfig;

/// A language model adapter for OpenAI-compatible chat-completions APIs.
///
/// OpenAiModel is stateless: the caller supplies the full message list on
/// every request. It supports two model tiers; the fallback tier is
/// attempted only when the primary call errors outright, never on slow or
/// low-quality output.
pub struct OpenAiModel {
    client: Client,
    config: OpenAiModelConfig,
}

impl OpenAiModel {
    /// Create a new OpenAiModel with the given configuration.
    pub fn new(config: OpenAiModelConfig) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ModelError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!(
            "OpenAiModel initialized with model: {}, fallback: {:?}",
            config.model, config.fallback_model
        );

        Ok(Self { client, config })
    }

    /// Create an OpenAiModel from environment variables.
    ///
    /// See [`OpenAiModelConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, ModelError> {
        let config = OpenAiModelConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiModelConfig {
        &self.config
    }

    fn to_wire_message(message: &ChatMessage) -> WireMessage {
        let tool_calls = if message.tool_calls.is_empty() {
            None
        } else {
            Some(
                message
                    .tool_calls
                    .iter()
                    .map(|call| WireToolCall {
                        id: call.id.clone(),
                        call_type: "function".to_string(),
                        function: WireFunctionCall {
                            name: call.name.clone(),
                            arguments: call.arguments.clone(),
                        },
                    })
                    .collect(),
            )
        };

        WireMessage {
            role: message.role.clone(),
            content: if message.content.is_empty() && tool_calls.is_some() {
                None
            } else {
                Some(message.content.clone())
            },
            tool_call_id: message.tool_call_id.clone(),
            tool_calls,
        }
    }

    /// Make one chat completion request against a specific model tier.
    async fn chat_completion(
        &self,
        model: &str,
        request: &CompletionRequest,
    ) -> Result<ChatCompletionResponse, ModelError> {
        let url = format!("{}/v1/chat/completions", self.config.api_url);

        let tools = if request.tools.is_empty() {
            None
        } else {
            Some(
                request
                    .tools
                    .iter()
                    .map(|schema| {
                        WireTool::function(
                            schema.name.clone(),
                            schema.description.clone(),
                            schema.parameters.clone(),
                        )
                    })
                    .collect(),
            )
        };

        let wire_request = ChatCompletionRequest {
            model: model.to_string(),
            messages: request.messages.iter().map(Self::to_wire_message).collect(),
            tools,
            max_tokens: request.max_tokens.or(self.config.max_tokens),
            temperature: request.temperature.or(self.config.temperature),
        };

        debug!(
            "Sending completion request: model={}, messages={}, tools={}",
            model,
            wire_request.messages.len(),
            wire_request.tools.as_ref().map(|t| t.len()).unwrap_or(0)
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| ModelError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Try to parse as a structured API error
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(ModelError::Api {
                    status: status.as_u16(),
                    message: api_error.error.message,
                });
            }

            return Err(ModelError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(completion)
    }

    fn to_response(completion: ChatCompletionResponse) -> Result<CompletionResponse, ModelError> {
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::InvalidResponse("no choices in response".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCallRequest {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect();

        let usage = completion.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(CompletionResponse {
            text: choice.message.content,
            tool_calls,
            usage,
        })
    }
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ModelError> {
        let primary_error = match self.chat_completion(&self.config.model, &request).await {
            Ok(completion) => {
                if let Some(ref usage) = completion.usage {
                    debug!(
                        "Token usage - prompt: {}, completion: {}, total: {}",
                        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
                    );
                }
                return Self::to_response(completion);
            }
            Err(e) => e,
        };

        let fallback = match self.config.fallback_model.as_deref() {
            Some(fallback) => fallback,
            None => return Err(primary_error),
        };

        warn!(
            "Primary model {} failed ({}), trying fallback {}",
            self.config.model, primary_error, fallback
        );

        let completion = self.chat_completion(fallback, &request).await?;
        Self::to_response(completion)
    }

    fn name(&self) -> &str {
        "OpenAiModel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_types::{Choice, ResponseMessage, WireFunctionCall};

    fn completion_with(message: ResponseMessage) -> ChatCompletionResponse {
        ChatCompletionResponse {
            id: "resp-1".to_string(),
            model: "gpt-4o".to_string(),
            choices: vec![Choice {
                index: 0,
                message,
                finish_reason: Some("stop".to_string()),
            }],
            usage: None,
        }
    }

    #[test]
    fn test_model_name() {
        let config = OpenAiModelConfig::builder().api_key("test-key").build();
        let model = OpenAiModel::new(config).unwrap();
        assert_eq!(model.name(), "OpenAiModel");
    }

    #[test]
    fn test_to_response_text_only() {
        let completion = completion_with(ResponseMessage {
            role: "assistant".to_string(),
            content: Some("You have two meetings today.".to_string()),
            tool_calls: None,
        });

        let response = OpenAiModel::to_response(completion).unwrap();
        assert_eq!(response.text.as_deref(), Some("You have two meetings today."));
        assert!(!response.has_tool_calls());
    }

    #[test]
    fn test_to_response_tool_calls() {
        let completion = completion_with(ResponseMessage {
            role: "assistant".to_string(),
            content: None,
            tool_calls: Some(vec![WireToolCall {
                id: "call-1".to_string(),
                call_type: "function".to_string(),
                function: WireFunctionCall {
                    name: "get_bills_due".to_string(),
                    arguments: r#"{"within_days": 7}"#.to_string(),
                },
            }]),
        });

        let response = OpenAiModel::to_response(completion).unwrap();
        assert!(response.has_tool_calls());
        assert_eq!(response.tool_calls[0].name, "get_bills_due");
    }

    #[test]
    fn test_to_response_empty_choices() {
        let completion = ChatCompletionResponse {
            id: "resp-1".to_string(),
            model: "gpt-4o".to_string(),
            choices: vec![],
            usage: None,
        };

        assert!(matches!(
            OpenAiModel::to_response(completion),
            Err(ModelError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_wire_message_tool_call_roundtrip() {
        let message = ChatMessage::assistant_tool_calls(vec![ToolCallRequest {
            id: "call-1".to_string(),
            name: "get_emails".to_string(),
            arguments: "{}".to_string(),
        }]);

        let wire = OpenAiModel::to_wire_message(&message);
        assert!(wire.content.is_none());
        assert_eq!(wire.tool_calls.as_ref().unwrap().len(), 1);
    }
}
