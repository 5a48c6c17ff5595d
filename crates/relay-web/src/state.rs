//! Application state shared across handlers.

use std::sync::Arc;

use axum::http::HeaderName;
use database::Database;
use llm_core::ChatModel;
use mailer::Mailer;
use receptionist::{
    BusinessInfoOrganizer, ChatAssistant, ContactService, DashboardService, IdentityProvider,
};

use crate::config::DEFAULT_IDENTITY_HEADER;

/// Shared application state.
///
/// Built once at startup and cloned into every handler; the chat widget and
/// the pages that open it share this state instead of any global.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub dashboard: DashboardService,
    pub organizer: BusinessInfoOrganizer,
    pub contact: ContactService,
    pub chat: ChatAssistant,
    /// `None` disables `/api/users/sync`.
    pub identity: Option<Arc<dyn IdentityProvider>>,
    /// Header carrying the signed-in user id.
    pub identity_header: HeaderName,
    /// `None` disables the integration API.
    pub integration_token: Option<Arc<str>>,
}

impl AppState {
    /// Create application state around one model and one mailer.
    pub fn new(
        db: Database,
        model: Arc<dyn ChatModel>,
        mailer: Arc<dyn Mailer>,
        mail_from: impl Into<String>,
        contact_recipient: impl Into<String>,
    ) -> Self {
        Self {
            dashboard: DashboardService::new(db.clone()),
            organizer: BusinessInfoOrganizer::new(model.clone(), db.clone()),
            contact: ContactService::new(mailer, mail_from, contact_recipient),
            chat: ChatAssistant::new(model),
            identity: None,
            identity_header: HeaderName::from_static(DEFAULT_IDENTITY_HEADER),
            integration_token: None,
            db,
        }
    }

    pub fn with_identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(provider);
        self
    }

    pub fn with_identity_header(mut self, header: HeaderName) -> Self {
        self.identity_header = header;
        self
    }

    pub fn with_integration_token(mut self, token: impl Into<String>) -> Self {
        self.integration_token = Some(Arc::from(token.into()));
        self
    }
}
