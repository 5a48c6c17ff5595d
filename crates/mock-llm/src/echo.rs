//! Echo model - replies with the last user message.

use llm_core::{async_trait, ChatModel, Completion, CompletionRequest, LlmError};

/// A model that echoes the last user turn back.
///
/// Useful for testing the request flow without any AI processing.
#[derive(Debug, Clone, Default)]
pub struct EchoModel {
    /// Optional prefix to add before the echo.
    prefix: Option<String>,
}

impl EchoModel {
    /// Create a new EchoModel with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new EchoModel with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

#[async_trait]
impl ChatModel for EchoModel {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        let input = request.last_user_message().unwrap_or_default();
        let text = match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, input),
            None => input.to_string(),
        };
        Ok(Completion::text(text))
    }

    fn name(&self) -> &str {
        "EchoModel"
    }
}
