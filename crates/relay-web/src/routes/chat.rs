//! Chat widget endpoint.

use axum::extract::State;
use axum::Json;
use llm_core::ChatMessage;
use serde::{Deserialize, Serialize};

use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Visible transcript, oldest first.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// `null` when the input was blank.
    pub reply: Option<String>,
}

/// Answer one chat turn. Model failures come back as a fixed apology, not
/// an error status.
pub async fn reply(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> Json<ChatResponse> {
    let reply = state.chat.reply(&request.messages, &request.input).await;
    Json(ChatResponse { reply })
}
