//! Tool trait definition and types.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ToolError;

/// Arguments passed to a tool for execution.
///
/// The registry injects the acting user so that tools can scope provider
/// calls without the model ever seeing or choosing a user id.
#[derive(Clone)]
pub struct ToolArgs {
    /// Parameters as key-value pairs.
    pub params: HashMap<String, Value>,
    /// The user this execution acts for.
    pub user_id: String,
}

impl ToolArgs {
    /// Create tool arguments for a user.
    pub fn new(params: HashMap<String, Value>, user_id: impl Into<String>) -> Self {
        Self {
            params,
            user_id: user_id.into(),
        }
    }

    /// Get a string parameter, returning an error if missing or not a string.
    pub fn get_string(&self, key: &str) -> Result<String, ToolError> {
        self.params
            .get(key)
            .ok_or_else(|| ToolError::MissingParameter(key.to_string()))?
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| ToolError::InvalidParameter {
                name: key.to_string(),
                reason: "expected string".to_string(),
            })
    }

    /// Get an optional string parameter.
    pub fn get_string_opt(&self, key: &str) -> Option<String> {
        self.params.get(key)?.as_str().map(|s| s.to_string())
    }

    /// Get an optional boolean parameter with a default value.
    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.params
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }

    /// Get an optional integer parameter.
    pub fn get_i64_opt(&self, key: &str) -> Result<Option<i64>, ToolError> {
        match self.params.get(key) {
            Some(v) => {
                let n = v.as_i64().ok_or_else(|| ToolError::InvalidParameter {
                    name: key.to_string(),
                    reason: "expected integer".to_string(),
                })?;
                Ok(Some(n))
            }
            None => Ok(None),
        }
    }
}

/// Output from a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// The result content fed back to the model.
    pub content: String,
    /// Whether the execution was successful.
    pub success: bool,
}

impl ToolOutput {
    /// Create a successful output.
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            success: true,
        }
    }

    /// Create a failed output.
    pub fn failure(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            success: false,
        }
    }
}

/// Trait for tools the orchestrator can dispatch.
///
/// Tools are read-mostly actions over the user's calendar, email, and bills,
/// plus single-shot idempotent writes like creating an event. Each tool
/// declares its parameters as a JSON Schema object; the registry validates
/// model-supplied arguments against it before dispatch.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's unique name (used for dispatch).
    fn name(&self) -> &str;

    /// Human-readable description shown to the model.
    fn description(&self) -> &str;

    /// JSON Schema object describing the accepted parameters.
    fn parameters(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(params: Value) -> ToolArgs {
        let map = params
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        ToolArgs::new(map, "user-1")
    }

    #[test]
    fn test_get_string() {
        let args = args(json!({"title": "Dentist"}));
        assert_eq!(args.get_string("title").unwrap(), "Dentist");
        assert!(matches!(
            args.get_string("missing"),
            Err(ToolError::MissingParameter(_))
        ));
    }

    #[test]
    fn test_get_string_wrong_type() {
        let args = args(json!({"title": 7}));
        assert!(matches!(
            args.get_string("title"),
            Err(ToolError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_get_i64_opt() {
        let args = args(json!({"max_results": 3}));
        assert_eq!(args.get_i64_opt("max_results").unwrap(), Some(3));
        assert_eq!(args.get_i64_opt("missing").unwrap(), None);
    }

    #[test]
    fn test_get_bool_or_default() {
        let args = args(json!({}));
        assert!(!args.get_bool_or("unread_only", false));
    }
}
