//! Tool registry: registration, schema export, validation, and dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use assistant_core::ToolSchema;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Registry for managing tools.
///
/// The registry holds the tools, exports their declared schemas for the
/// model request, and validates model-supplied arguments against those
/// schemas before dispatching execution.
pub struct ToolRegistry {
    /// Registered tools by name.
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool.
    ///
    /// If a tool with the same name already exists, it will be replaced.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        info!("Registering tool: {}", name);
        self.tools.insert(name, Arc::new(tool));
    }

    /// Register a shared tool.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        info!("Registering tool: {}", name);
        self.tools.insert(name, tool);
    }

    /// Get a list of registered tool names.
    pub fn list_tools(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Check if a tool is registered.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Export the declared schemas of all registered tools.
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .values()
            .map(|t| ToolSchema {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters(),
            })
            .collect()
    }

    /// Validate arguments against a tool's declared schema.
    ///
    /// Checks that every `required` property is present and that present
    /// properties match their declared primitive type. Unknown properties
    /// pass through; the tool decides what to do with them.
    pub fn validate(&self, name: &str, params: &HashMap<String, Value>) -> Result<(), ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let schema = tool.parameters();

        if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
            for key in required.iter().filter_map(|k| k.as_str()) {
                if !params.contains_key(key) {
                    return Err(ToolError::MissingParameter(key.to_string()));
                }
            }
        }

        if let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) {
            for (key, value) in params {
                let Some(declared) = properties.get(key) else {
                    continue;
                };
                let Some(expected) = declared.get("type").and_then(|t| t.as_str()) else {
                    continue;
                };
                if !matches_type(value, expected) {
                    return Err(ToolError::InvalidParameter {
                        name: key.clone(),
                        reason: format!("expected {}", expected),
                    });
                }
            }
        }

        Ok(())
    }

    /// Validate and execute a tool by name for a user.
    pub async fn execute(
        &self,
        name: &str,
        params: HashMap<String, Value>,
        user_id: &str,
    ) -> Result<ToolOutput, ToolError> {
        self.validate(name, &params)?;

        // validate() established the tool exists
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        debug!("Executing tool '{}' with {} params", name, params.len());

        let result = tool.execute(ToolArgs::new(params, user_id)).await?;

        debug!(
            "Tool '{}' completed: success={}, content_len={}",
            name,
            result.success,
            result.content.len()
        );

        Ok(result)
    }

    /// Validate and execute a tool with a raw JSON arguments string.
    pub async fn execute_json(
        &self,
        name: &str,
        args_json: &str,
        user_id: &str,
    ) -> Result<ToolOutput, ToolError> {
        let params: HashMap<String, Value> = serde_json::from_str(args_json)?;
        self.execute(name, params, user_id).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check a value against a JSON Schema primitive type name.
fn matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes back the input"
        }

        fn parameters(&self) -> Value {
            json!({
                "type": "object",
                "properties": {
                    "message": {"type": "string"},
                    "repeat": {"type": "integer"}
                },
                "required": ["message"]
            })
        }

        async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
            let message = args.get_string("message")?;
            Ok(ToolOutput::success(message))
        }
    }

    fn params(value: Value) -> HashMap<String, Value> {
        value
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_registry_basic() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        assert!(registry.has_tool("echo"));
        assert!(!registry.has_tool("nonexistent"));
        assert_eq!(registry.list_tools(), vec!["echo"]);
    }

    #[test]
    fn test_schemas_export() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let schemas = registry.schemas();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].name, "echo");
        assert!(schemas[0].parameters.get("properties").is_some());
    }

    #[test]
    fn test_validate_missing_required() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let result = registry.validate("echo", &params(json!({})));
        assert!(matches!(result, Err(ToolError::MissingParameter(_))));
    }

    #[test]
    fn test_validate_wrong_type() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let result = registry.validate("echo", &params(json!({"message": "hi", "repeat": "three"})));
        assert!(matches!(result, Err(ToolError::InvalidParameter { .. })));
    }

    #[test]
    fn test_validate_unknown_property_passes() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        registry
            .validate("echo", &params(json!({"message": "hi", "extra": 1})))
            .unwrap();
    }

    #[tokio::test]
    async fn test_registry_execute() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let result = registry
            .execute("echo", params(json!({"message": "hello"})), "user-1")
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.content, "hello");
    }

    #[tokio::test]
    async fn test_registry_execute_json() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let result = registry
            .execute_json("echo", r#"{"message": "world"}"#, "user-1")
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.content, "world");
    }

    #[tokio::test]
    async fn test_registry_not_found() {
        let registry = ToolRegistry::new();
        let result = registry.execute("nonexistent", HashMap::new(), "user-1").await;
        assert!(matches!(result, Err(ToolError::NotFound(_))));
    }
}
