//! Sales chat assistant behind the floating chat widget.

use std::sync::Arc;

use llm_core::{short_fingerprint, ChatMessage, ChatModel, CompletionRequest, Role};
use tracing::{debug, error, warn};

/// Sales persona and plan details sent as the system turn.
pub const CHAT_SYSTEM_PROMPT: &str = include_str!("../prompts/chat_system.md");

pub const CHAT_TEMPERATURE: f32 = 0.3;
pub const CHAT_MAX_TOKENS: u32 = 800;

/// Prior turns forwarded with each request.
pub const MAX_HISTORY_TURNS: usize = 20;

pub const NO_REPLY_MESSAGE: &str = "Sorry, I couldn't process that request.";
pub const CONNECTION_FAILED_MESSAGE: &str =
    "Sorry, I'm having trouble connecting right now. Please try again later.";

/// Answers visitor questions with the sales system prompt.
#[derive(Clone)]
pub struct ChatAssistant {
    model: Arc<dyn ChatModel>,
}

impl ChatAssistant {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Reply to `input` given the visible transcript.
    ///
    /// Returns `None` for blank input without contacting the model. Client
    /// supplied system turns are dropped.
    pub async fn reply(&self, history: &[ChatMessage], input: &str) -> Option<String> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let request = CompletionRequest::new(build_messages(history, input))
            .with_temperature(CHAT_TEMPERATURE)
            .with_max_tokens(CHAT_MAX_TOKENS);

        debug!(
            model = self.model.name(),
            turns = request.messages.len(),
            prompt = %short_fingerprint(CHAT_SYSTEM_PROMPT),
            "Sending chat turn"
        );

        let reply = match self.model.complete(request).await {
            Ok(completion) => match completion.non_blank() {
                Some(text) => text.to_string(),
                None => {
                    warn!("Chat model returned no text");
                    NO_REPLY_MESSAGE.to_string()
                }
            },
            Err(e) if e.is_transport() => {
                warn!(error = %e, "Chat model unreachable");
                CONNECTION_FAILED_MESSAGE.to_string()
            }
            Err(e) => {
                error!(error = %e, "Chat request failed");
                CONNECTION_FAILED_MESSAGE.to_string()
            }
        };

        Some(reply)
    }
}

fn build_messages(history: &[ChatMessage], input: &str) -> Vec<ChatMessage> {
    let turns: Vec<&ChatMessage> = history
        .iter()
        .filter(|message| message.role != Role::System)
        .collect();
    let skip = turns.len().saturating_sub(MAX_HISTORY_TURNS);

    let mut messages = Vec::with_capacity(turns.len() - skip + 2);
    messages.push(ChatMessage::system(CHAT_SYSTEM_PROMPT));
    messages.extend(turns.into_iter().skip(skip).cloned());
    messages.push(ChatMessage::user(input));
    messages
}
