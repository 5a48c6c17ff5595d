//! Contact form endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use receptionist::{ContactMeta, ContactRequest};
use serde::Serialize;

use crate::error::{Result, WebError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Validate a submission and email it to the operator.
///
/// The body is parsed by hand so an unreadable payload answers like any other
/// internal failure instead of with the framework's rejection.
pub async fn send_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ContactResponse>> {
    let request: ContactRequest = serde_json::from_slice(&body)
        .map_err(|e| WebError::Internal(format!("unreadable contact body: {}", e)))?;

    let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());
    let meta = ContactMeta::new(
        header("x-forwarded-for"),
        header("x-real-ip"),
        header("user-agent"),
    );

    state.contact.send(&request, &meta).await?;

    Ok(Json(ContactResponse {
        success: true,
        message: "Email sent successfully",
    }))
}
