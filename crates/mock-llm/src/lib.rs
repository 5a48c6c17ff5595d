//! Mock chat-model implementations for tests.
//!
//! - `EchoModel` - replies with the last user message
//! - `CannedModel` - always replies with the same text (or with no text)
//! - `FailingModel` - always fails with a chosen error
//! - `RecordingModel` - wraps another model and records every request
//! - `ScriptedModel` - picks a reply and delay by matching the user input
//!
//! For production completions use the `openrouter` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_llm::{CannedModel, ChatMessage, ChatModel, CompletionRequest};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), mock_llm::LlmError> {
//!     let model = CannedModel::new("## Business Overview");
//!     let request = CompletionRequest::new(vec![ChatMessage::user("We fix pipes")]);
//!
//!     let completion = model.complete(request).await?;
//!     assert_eq!(completion.content.as_deref(), Some("## Business Overview"));
//!     Ok(())
//! }
//! ```

mod canned;
mod echo;
mod failing;
mod recording;
mod scripted;

// Re-export llm-core types for convenience
pub use llm_core::{
    async_trait, ChatMessage, ChatModel, Completion, CompletionRequest, LlmError, Role,
};

pub use canned::CannedModel;
pub use echo::EchoModel;
pub use failing::{FailingModel, Failure};
pub use recording::RecordingModel;
pub use scripted::ScriptedModel;
