//! OpenRouter chat-completion client.
//!
//! Implements [`llm_core::ChatModel`] against the OpenAI-compatible
//! `/v1/chat/completions` endpoint of OpenRouter, including its attribution
//! headers (`HTTP-Referer`, `X-Title`).
//!
//! ```rust,no_run
//! use llm_core::{ChatMessage, ChatModel, CompletionRequest};
//! use openrouter::OpenRouterClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenRouterClient::from_env()?;
//!     let request = CompletionRequest::new(vec![ChatMessage::user("Hello")]);
//!     let completion = client.complete(request).await?;
//!     println!("{:?}", completion.content);
//!     Ok(())
//! }
//! ```

mod api_types;
mod client;
mod config;

pub use client::OpenRouterClient;
pub use config::{
    OpenRouterConfig, OpenRouterConfigBuilder, DEFAULT_API_URL, DEFAULT_APP_TITLE, DEFAULT_MODEL,
};
