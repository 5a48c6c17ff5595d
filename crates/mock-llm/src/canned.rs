//! Canned model - always the same answer.

use llm_core::{async_trait, ChatModel, Completion, CompletionRequest, LlmError};

/// A model that returns a fixed completion regardless of input.
#[derive(Debug, Clone)]
pub struct CannedModel {
    completion: Completion,
}

impl CannedModel {
    /// Always reply with `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            completion: Completion::text(text),
        }
    }

    /// Always reply with no content, like a gateway returning a null message.
    pub fn empty() -> Self {
        Self {
            completion: Completion::empty(),
        }
    }
}

#[async_trait]
impl ChatModel for CannedModel {
    async fn complete(&self, _request: CompletionRequest) -> Result<Completion, LlmError> {
        Ok(self.completion.clone())
    }

    fn name(&self) -> &str {
        "CannedModel"
    }
}
