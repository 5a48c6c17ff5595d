//! Core trait and types for chat-completion models.
//!
//! - [`ChatModel`] - the trait every model backend implements
//! - [`ChatMessage`] / [`CompletionRequest`] / [`Completion`] - request and response types
//! - [`LlmError`] - error type for model calls
//! - [`hash_prompt`] - system prompt fingerprinting
//!
//! # Example
//!
//! ```rust
//! use llm_core::{async_trait, ChatModel, Completion, CompletionRequest, LlmError};
//!
//! struct Parrot;
//!
//! #[async_trait]
//! impl ChatModel for Parrot {
//!     async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
//!         Ok(Completion::text(request.last_user_message().unwrap_or_default()))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Parrot"
//!     }
//! }
//! ```

mod error;
mod message;
mod prompt;
mod trait_def;

pub use error::LlmError;
pub use message::{ChatMessage, Completion, CompletionRequest, Role};
pub use prompt::{hash_prompt, short_fingerprint};
pub use trait_def::ChatModel;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
