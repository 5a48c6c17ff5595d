//! Dashboard routes.

use std::convert::Infallible;

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use database::CallSummary;
use receptionist::{
    DashboardSession, DashboardSnapshot, DashboardStats, SessionState, DEFAULT_RECENT_CALLS,
};
use serde::Deserialize;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::auth::CurrentUser;
use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecentCallsQuery {
    pub limit: Option<u32>,
}

/// Stats and recent calls in one response.
pub async fn overview(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<DashboardSnapshot>> {
    Ok(Json(state.dashboard.snapshot(&user_id).await?))
}

pub async fn stats(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<DashboardStats>> {
    Ok(Json(state.dashboard.compute_stats(&user_id).await?))
}

pub async fn recent_calls(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<RecentCallsQuery>,
) -> Result<Json<Vec<CallSummary>>> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_CALLS);
    Ok(Json(state.dashboard.fetch_recent_calls(&user_id, limit).await?))
}

/// Live dashboard feed. Sends the session state on every transition; the
/// session ends when the client disconnects.
pub async fn events(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    info!(user_id = %user_id, "Dashboard feed connected");
    let session = DashboardSession::start(state.dashboard.clone(), user_id);

    Sse::new(session_events(session)).keep_alive(KeepAlive::default())
}

fn session_events(
    session: DashboardSession,
) -> impl Stream<Item = std::result::Result<Event, Infallible>> {
    let updates = WatchStream::new(session.watch());

    // The closure owns the session, so dropping the stream drops the session.
    updates.map(move |state: SessionState| {
        let event = Event::default().event("dashboard");
        Ok(match event.json_data(&state) {
            Ok(event) => event,
            Err(e) => {
                warn!(user_id = %session.user_id(), error = %e, "Failed to encode dashboard event");
                Event::default().event("error").data("encode failed")
            }
        })
    })
}
