//! OpenRouterClient implementation.

use llm_core::{async_trait, ChatModel, Completion, CompletionRequest, LlmError};
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse};
use crate::config::OpenRouterConfig;

/// A [`ChatModel`] backed by the OpenRouter gateway.
///
/// The client is stateless; every call sends the full conversation.
pub struct OpenRouterClient {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OpenRouterConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "OpenRouterClient initialized with model: {}, timeout: {:?}",
            config.model, config.timeout
        );

        Ok(Self { client, config })
    }

    /// Create a client from environment variables.
    ///
    /// See [`OpenRouterConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::new(OpenRouterConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    async fn chat_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let url = self.config.completions_url();
        let model = request.model.as_deref().unwrap_or(&self.config.model);

        let body = ChatCompletionRequest {
            model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let mut builder = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body);

        if let Some(ref app_url) = self.config.app_url {
            builder = builder.header("HTTP-Referer", app_url);
        }
        if let Some(ref title) = self.config.app_title {
            builder = builder.header("X-Title", title);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::Network(format!("Failed to send request: {}", e))
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Prefer the gateway's own message when the body is its error JSON
            let message = serde_json::from_str::<ApiError>(&error_text)
                .map(|api_error| api_error.error.message)
                .unwrap_or(error_text);

            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<ChatCompletionResponse>().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
            }
        })
    }
}

#[async_trait]
impl ChatModel for OpenRouterClient {
    #[instrument(skip_all, fields(turns = request.messages.len()))]
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        let response = self.chat_completion(&request).await?;

        if let Some(usage) = &response.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let content = response.choices.into_iter().next().and_then(|choice| {
            debug!("Finish reason: {:?}", choice.finish_reason);
            choice.message.content
        });

        if content.is_none() {
            warn!("No content in completion response");
        }

        Ok(Completion {
            content,
            model: response.model,
        })
    }

    fn name(&self) -> &str {
        "OpenRouter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_key() {
        let config = OpenRouterConfig::builder().api_key("  ").build();
        assert!(matches!(
            OpenRouterClient::new(config),
            Err(LlmError::Configuration(_))
        ));
    }

    #[test]
    fn test_client_name() {
        let config = OpenRouterConfig::builder().api_key("test-key").build();
        let client = OpenRouterClient::new(config).unwrap();
        assert_eq!(client.name(), "OpenRouter");
    }
}
