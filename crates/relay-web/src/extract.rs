//! Body extractors whose failures use the `{"error": ...}` shape.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::WebError;

/// JSON body parsed by hand, rejecting with `400 {"error": ...}` instead of
/// the framework's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| WebError::BadRequest(format!("Unreadable body: {}", e)))?;

        serde_json::from_slice(&body)
            .map(ApiJson)
            .map_err(|e| WebError::BadRequest(format!("Invalid JSON body: {}", e)))
    }
}
