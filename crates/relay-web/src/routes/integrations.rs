//! Ingest API for the call-handling integration.
//!
//! Every write goes through the database crate, so dashboards subscribed to
//! the owner see it immediately.

use axum::extract::{Path, State};
use axum::Json;
use database::{booking, call, ChangeKind, NewBooking, NewCall};
use serde::Serialize;
use tracing::info;

use crate::auth::Integration;
use crate::error::Result;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub id: String,
    pub change: ChangeKind,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

pub async fn put_call(
    State(state): State<AppState>,
    _auth: Integration,
    ApiJson(new_call): ApiJson<NewCall>,
) -> Result<Json<WriteResponse>> {
    let change = call::upsert_call(&state.db, &new_call).await?;
    info!(call_id = %new_call.id, user_id = %new_call.user_id, change = ?change, "Call ingested");
    Ok(Json(WriteResponse {
        id: new_call.id,
        change,
    }))
}

pub async fn delete_call(
    State(state): State<AppState>,
    _auth: Integration,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    call::delete_call(&state.db, &id).await?;
    info!(call_id = %id, "Call deleted");
    Ok(Json(DeleteResponse { deleted: true }))
}

pub async fn put_booking(
    State(state): State<AppState>,
    _auth: Integration,
    ApiJson(new_booking): ApiJson<NewBooking>,
) -> Result<Json<WriteResponse>> {
    let change = booking::upsert_booking(&state.db, &new_booking).await?;
    info!(
        booking_id = %new_booking.id,
        user_id = %new_booking.user_id,
        change = ?change,
        "Booking ingested"
    );
    Ok(Json(WriteResponse {
        id: new_booking.id,
        change,
    }))
}

pub async fn delete_booking(
    State(state): State<AppState>,
    _auth: Integration,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    booking::delete_booking(&state.db, &id).await?;
    info!(booking_id = %id, "Booking deleted");
    Ok(Json(DeleteResponse { deleted: true }))
}
