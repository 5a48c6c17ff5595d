//! Route handlers for the Relay web server.

pub mod business_info;
pub mod chat;
pub mod contact;
pub mod dashboard;
pub mod health;
pub mod integrations;
pub mod users;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Contact form
        .route("/contact", post(contact::send_contact))
        .route("/api/contact", post(contact::send_contact))
        // Dashboard
        .route("/api/dashboard", get(dashboard::overview))
        .route("/api/dashboard/stats", get(dashboard::stats))
        .route("/api/dashboard/recent-calls", get(dashboard::recent_calls))
        .route("/api/dashboard/events", get(dashboard::events))
        // Business info
        .route(
            "/api/business-info",
            get(business_info::load).delete(business_info::delete),
        )
        .route("/api/business-info/organize", post(business_info::organize))
        // Chat widget
        .route("/api/chat", post(chat::reply))
        // Users
        .route("/api/users/sync", post(users::sync))
        .route("/api/users/me", get(users::me))
        // Call-handling integration
        .route("/api/integrations/calls", put(integrations::put_call))
        .route("/api/integrations/calls/:id", delete(integrations::delete_call))
        .route("/api/integrations/bookings", put(integrations::put_booking))
        .route(
            "/api/integrations/bookings/:id",
            delete(integrations::delete_booking),
        )
}
