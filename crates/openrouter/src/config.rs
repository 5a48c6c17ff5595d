//! Configuration for the OpenRouter client.

use std::env;
use std::time::Duration;

use llm_core::LlmError;

/// Default gateway base URL.
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api";

/// Default model routed through the gateway.
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-20b:free";

/// Default application title sent as `X-Title`.
pub const DEFAULT_APP_TITLE: &str = "Relay AI Receptionist";

/// Configuration for [`crate::OpenRouterClient`].
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// Gateway base URL (without `/v1`).
    pub api_url: String,

    /// API key for bearer authentication.
    pub api_key: String,

    /// Model used when a request carries no override.
    pub model: String,

    /// Request deadline.
    pub timeout: Duration,

    /// Site URL sent as `HTTP-Referer` for gateway attribution.
    pub app_url: Option<String>,

    /// Application name sent as `X-Title`.
    pub app_title: Option<String>,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
            app_url: None,
            app_title: Some(DEFAULT_APP_TITLE.to_string()),
        }
    }
}

impl OpenRouterConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `OPENROUTER_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `OPENROUTER_API_URL` - API URL (default: https://openrouter.ai/api)
    /// - `OPENROUTER_MODEL` - Model name (default: openai/gpt-oss-20b:free)
    /// - `OPENROUTER_TIMEOUT_SECS` - Request timeout (default: 60)
    /// - `OPENROUTER_APP_URL` - Value of the `HTTP-Referer` header (default: unset)
    /// - `OPENROUTER_APP_TITLE` - Value of the `X-Title` header (default: Relay AI Receptionist)
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = env::var("OPENROUTER_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| LlmError::Configuration("OPENROUTER_API_KEY not set".to_string()))?;

        let api_url =
            env::var("OPENROUTER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let model = env::var("OPENROUTER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout = env::var("OPENROUTER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60));

        let app_url = env::var("OPENROUTER_APP_URL").ok().filter(|v| !v.is_empty());

        let app_title = env::var("OPENROUTER_APP_TITLE")
            .ok()
            .or_else(|| Some(DEFAULT_APP_TITLE.to_string()))
            .filter(|v| !v.is_empty());

        Ok(Self {
            api_url,
            api_key,
            model,
            timeout,
            app_url,
            app_title,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> OpenRouterConfigBuilder {
        OpenRouterConfigBuilder::default()
    }

    /// Full chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

/// Builder for OpenRouterConfig.
#[derive(Debug, Default)]
pub struct OpenRouterConfigBuilder {
    config: OpenRouterConfig,
}

impl OpenRouterConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the `HTTP-Referer` attribution URL.
    pub fn app_url(mut self, url: impl Into<String>) -> Self {
        self.config.app_url = Some(url.into());
        self
    }

    /// Set the `X-Title` attribution name.
    pub fn app_title(mut self, title: impl Into<String>) -> Self {
        self.config.app_title = Some(title.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OpenRouterConfig {
        self.config
    }
}
