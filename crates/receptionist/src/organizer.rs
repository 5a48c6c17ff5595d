//! Business-info organizer.
//!
//! Turns a free-text business description into a headed Markdown profile
//! with the chat model, then stores the `(raw, organized)` pair for the
//! signed-in user. A failed save never hides the organized text from the
//! caller.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use database::{business_info, BusinessInfo, Database};
use llm_core::{short_fingerprint, ChatMessage, ChatModel, CompletionRequest};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::error::OrganizeError;

/// Formatting contract sent as the system turn.
pub const ORGANIZER_SYSTEM_PROMPT: &str = include_str!("../prompts/organizer_system.md");

/// Low temperature keeps the section layout stable between runs.
pub const ORGANIZE_TEMPERATURE: f32 = 0.2;

/// Shown when the model answered without usable text.
pub const UNORGANIZED_MESSAGE: &str = "Unable to organize business information.";

/// Shown when the model could not be reached or errored.
pub const ORGANIZE_FAILED_MESSAGE: &str =
    "An error occurred while organizing your business information. Please try again.";

/// Where the returned Markdown came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizedKind {
    /// Genuine model output.
    Generated,
    /// The model replied without text; the markdown is [`UNORGANIZED_MESSAGE`].
    Empty,
    /// The model call failed; the markdown is [`ORGANIZE_FAILED_MESSAGE`].
    Failed,
}

/// Result of one organize request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Organized {
    pub markdown: String,
    pub kind: OrganizedKind,
    /// Whether the pair was stored.
    pub saved: bool,
    /// A newer request for the same user started before this one finished.
    pub stale: bool,
}

impl Organized {
    fn unsaved(markdown: impl Into<String>, kind: OrganizedKind) -> Self {
        Self {
            markdown: markdown.into(),
            kind,
            saved: false,
            stale: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrganizeOutcome {
    /// Blank input; nothing was sent and nothing changed.
    Skipped,
    Organized(Organized),
}

/// Organizes and stores business profiles.
#[derive(Clone)]
pub struct BusinessInfoOrganizer {
    model: Arc<dyn ChatModel>,
    db: Database,
    /// Latest in-flight request generation per user. Entries are removed once
    /// that request finishes.
    generations: Arc<Mutex<HashMap<String, u64>>>,
    /// Source of generation numbers, never reused across users or over time.
    next_generation: Arc<AtomicU64>,
}

impl BusinessInfoOrganizer {
    pub fn new(model: Arc<dyn ChatModel>, db: Database) -> Self {
        info!(
            model = model.name(),
            prompt = %short_fingerprint(ORGANIZER_SYSTEM_PROMPT),
            "Business-info organizer ready"
        );
        Self {
            model,
            db,
            generations: Arc::new(Mutex::new(HashMap::new())),
            next_generation: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Organize `raw_text` without storing it.
    ///
    /// Blank input is skipped before the identity check; a missing identity
    /// is refused before any model call.
    pub async fn organize(
        &self,
        user_id: Option<&str>,
        raw_text: &str,
    ) -> Result<OrganizeOutcome, OrganizeError> {
        let trimmed = raw_text.trim();
        if trimmed.is_empty() {
            return Ok(OrganizeOutcome::Skipped);
        }
        let user_id = user_id.ok_or(OrganizeError::AuthenticationRequired)?;

        let (markdown, kind) = self.complete(user_id, trimmed).await;
        Ok(OrganizeOutcome::Organized(Organized::unsaved(markdown, kind)))
    }

    /// Store the pair. Failures are logged and reported as `None`.
    pub async fn persist(
        &self,
        user_id: &str,
        raw_text: &str,
        organized_markdown: &str,
    ) -> Option<BusinessInfo> {
        match business_info::upsert_business_info(
            self.db.pool(),
            user_id,
            raw_text,
            organized_markdown,
        )
        .await
        {
            Ok(record) => {
                info!(user_id = %user_id, "Saved business info");
                Some(record)
            }
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Failed to save business info");
                None
            }
        }
    }

    /// Most recent stored profile; `None` when the user has none yet.
    pub async fn load(&self, user_id: &str) -> Result<Option<BusinessInfo>, OrganizeError> {
        Ok(business_info::get_business_info(self.db.pool(), user_id).await?)
    }

    /// Remove the user's profile. Returns whether one existed.
    pub async fn delete(&self, user_id: &str) -> Result<bool, OrganizeError> {
        Ok(business_info::delete_business_info(self.db.pool(), user_id).await?)
    }

    /// Organize, then store genuine output unless a newer request for the
    /// same user has started meanwhile.
    pub async fn organize_and_persist(
        &self,
        user_id: Option<&str>,
        raw_text: &str,
    ) -> Result<OrganizeOutcome, OrganizeError> {
        let trimmed = raw_text.trim();
        if trimmed.is_empty() {
            return Ok(OrganizeOutcome::Skipped);
        }
        let user_id = user_id.ok_or(OrganizeError::AuthenticationRequired)?;

        let generation = self.begin(user_id).await;
        let (markdown, kind) = self.complete(user_id, trimmed).await;
        let mut organized = Organized::unsaved(markdown, kind);

        // Held through the save so a newer request cannot start persisting
        // between the currency check and the write.
        let mut generations = self.generations.lock().await;
        if generations.get(user_id).copied() != Some(generation) {
            warn!(user_id = %user_id, generation, "Discarding superseded organize result");
            organized.stale = true;
            return Ok(OrganizeOutcome::Organized(organized));
        }

        if kind == OrganizedKind::Generated {
            organized.saved = self
                .persist(user_id, trimmed, &organized.markdown)
                .await
                .is_some();
        }
        generations.remove(user_id);
        drop(generations);

        Ok(OrganizeOutcome::Organized(organized))
    }

    async fn begin(&self, user_id: &str) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        self.generations
            .lock()
            .await
            .insert(user_id.to_string(), generation);
        generation
    }

    async fn complete(&self, user_id: &str, trimmed: &str) -> (String, OrganizedKind) {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(ORGANIZER_SYSTEM_PROMPT),
            ChatMessage::user(trimmed),
        ])
        .with_temperature(ORGANIZE_TEMPERATURE);

        debug!(
            user_id = %user_id,
            model = self.model.name(),
            chars = trimmed.len(),
            "Organizing business info"
        );

        match self.model.complete(request).await {
            Ok(completion) => match completion.non_blank() {
                Some(text) => (text.to_string(), OrganizedKind::Generated),
                None => {
                    warn!(user_id = %user_id, "Model returned no organized text");
                    (UNORGANIZED_MESSAGE.to_string(), OrganizedKind::Empty)
                }
            },
            Err(e) if e.is_transport() => {
                warn!(user_id = %user_id, error = %e, "Organizer model unreachable");
                (ORGANIZE_FAILED_MESSAGE.to_string(), OrganizedKind::Failed)
            }
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Organize request failed");
                (ORGANIZE_FAILED_MESSAGE.to_string(), OrganizedKind::Failed)
            }
        }
    }
}
