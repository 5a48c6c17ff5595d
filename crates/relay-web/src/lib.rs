//! HTTP server for the Relay receptionist app.
//!
//! Exposes the contact form, the live dashboard, the business-info organizer,
//! the chat widget backend, identity sync and the call-integration ingest API
//! as JSON (and SSE for the live feed).

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::{Config, ConfigError};
pub use error::WebError;
pub use state::AppState;

/// Build the application with state and request tracing attached.
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
