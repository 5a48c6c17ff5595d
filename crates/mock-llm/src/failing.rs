//! Failing model - every call errors.

use llm_core::{async_trait, ChatModel, Completion, CompletionRequest, LlmError};

/// Which error a [`FailingModel`] produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Network,
    Timeout,
    Api { status: u16, message: String },
}

impl Failure {
    fn to_error(&self) -> LlmError {
        match self {
            Self::Network => LlmError::Network("connection refused".to_string()),
            Self::Timeout => LlmError::Timeout,
            Self::Api { status, message } => LlmError::Api {
                status: *status,
                message: message.clone(),
            },
        }
    }
}

/// A model whose every completion fails.
#[derive(Debug, Clone)]
pub struct FailingModel {
    failure: Failure,
}

impl FailingModel {
    /// Fail with the given error kind.
    pub fn new(failure: Failure) -> Self {
        Self { failure }
    }

    /// Fail as if the gateway were unreachable.
    pub fn network() -> Self {
        Self::new(Failure::Network)
    }

    /// Fail with an API error status.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::new(Failure::Api {
            status,
            message: message.into(),
        })
    }
}

#[async_trait]
impl ChatModel for FailingModel {
    async fn complete(&self, _request: CompletionRequest) -> Result<Completion, LlmError> {
        Err(self.failure.to_error())
    }

    fn name(&self) -> &str {
        "FailingModel"
    }
}
