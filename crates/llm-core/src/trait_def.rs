//! The ChatModel trait definition.

use async_trait::async_trait;

use crate::error::LlmError;
use crate::message::{Completion, CompletionRequest};

/// A chat-completion backend.
///
/// This trait is object-safe and can be used as `Arc<dyn ChatModel>`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Request one completion for the given conversation.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError>;

    /// Get a human-readable name for this implementation.
    fn name(&self) -> &str;
}
