//! Chat messages and completion request/response types.

use serde::{Deserialize, Serialize};

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A request for one completion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompletionRequest {
    /// Conversation so far, system turn first.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature; the model's default when unset.
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens.
    pub max_tokens: Option<u32>,
    /// Per-request model override.
    pub model: Option<String>,
}

impl CompletionRequest {
    /// Create a request from a list of messages.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the token limit.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Override the configured model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// The last user turn, if any.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// A model's answer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Completion {
    /// Generated text; `None` when the gateway returned no text.
    pub content: Option<String>,
    /// Model that produced the answer, as reported by the gateway.
    pub model: Option<String>,
}

impl Completion {
    /// A completion carrying text.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            model: None,
        }
    }

    /// A completion with no text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The content when it is present and not only whitespace.
    pub fn non_blank(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn test_last_user_message() {
        let request = CompletionRequest::new(vec![
            ChatMessage::system("sys"),
            ChatMessage::user("first"),
            ChatMessage::assistant("reply"),
            ChatMessage::user("second"),
        ]);
        assert_eq!(request.last_user_message(), Some("second"));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(Completion::text("ok").non_blank(), Some("ok"));
        assert!(Completion::text("  \n").non_blank().is_none());
        assert!(Completion::empty().non_blank().is_none());
    }
}
