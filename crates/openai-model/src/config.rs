//! Configuration for OpenAiModel.

use assistant_core::ModelError;
use std::env;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for OpenAiModel.
#[derive(Debug, Clone)]
pub struct OpenAiModelConfig {
    /// API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Primary model name.
    pub model: String,

    /// Fallback model name, attempted only when the primary call errors.
    pub fallback_model: Option<String>,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OpenAiModelConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: "gpt-4o".to_string(),
            fallback_model: Some("gpt-4o-mini".to_string()),
            max_tokens: Some(1024),
            temperature: Some(0.7),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OpenAiModelConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `OPENAI_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `OPENAI_API_URL` - API base URL (default: https://api.openai.com)
    /// - `OPENAI_MODEL` - Primary model name (default: gpt-4o)
    /// - `OPENAI_FALLBACK_MODEL` - Fallback model ("none" disables; default: gpt-4o-mini)
    /// - `OPENAI_MAX_TOKENS` - Max tokens (default: 1024)
    /// - `OPENAI_TEMPERATURE` - Temperature (default: 0.7)
    /// - `OPENAI_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
    pub fn from_env() -> Result<Self, ModelError> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| ModelError::Configuration("OPENAI_API_KEY not set".to_string()))?;

        let api_url =
            env::var("OPENAI_API_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());

        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());

        let fallback_model = match env::var("OPENAI_FALLBACK_MODEL") {
            Ok(value) if value.eq_ignore_ascii_case("none") => None,
            Ok(value) => Some(value),
            Err(_) => Some("gpt-4o-mini".to_string()),
        };

        let max_tokens = env::var("OPENAI_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(Some(1024));

        let temperature = env::var("OPENAI_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(Some(0.7));

        let timeout_secs = env::var("OPENAI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_url,
            api_key,
            model,
            fallback_model,
            max_tokens,
            temperature,
            timeout_secs,
        })
    }

    /// Create a configuration builder.
    pub fn builder() -> OpenAiModelConfigBuilder {
        OpenAiModelConfigBuilder::default()
    }
}

/// Builder for OpenAiModelConfig.
#[derive(Debug, Default)]
pub struct OpenAiModelConfigBuilder {
    config: OpenAiModelConfig,
}

impl OpenAiModelConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = api_key.into();
        self
    }

    /// Set the API base URL.
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.config.api_url = api_url.into();
        self
    }

    /// Set the primary model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the fallback model. `None` disables the fallback tier.
    pub fn fallback_model(mut self, fallback: Option<String>) -> Self {
        self.config.fallback_model = fallback;
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.max_tokens = Some(max_tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OpenAiModelConfig {
        self.config
    }
}
