//! Request identity extractors.
//!
//! Sign-in itself happens in the fronting auth layer, which forwards the
//! user id in a header. Integration calls authenticate with a bearer token.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::WebError;
use crate::state::AppState;

/// The signed-in user. Rejects with `401` when the identity header is absent.
///
/// Use `Option<CurrentUser>` where the handler decides what to do without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(&state.identity_header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| CurrentUser(value.to_string()))
            .ok_or(WebError::Unauthenticated)
    }
}

/// A caller holding the integration bearer token.
#[derive(Debug, Clone, Copy)]
pub struct Integration;

#[async_trait]
impl FromRequestParts<AppState> for Integration {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.integration_token.as_deref() else {
            return Err(WebError::IntegrationDisabled);
        };

        let Some(value) = parts.headers.get(AUTHORIZATION) else {
            return Err(WebError::Unauthorized);
        };

        let Ok(value) = value.to_str() else {
            return Err(WebError::Unauthorized);
        };

        let token = value.strip_prefix("Bearer ").unwrap_or(value);
        if token != expected {
            return Err(WebError::Unauthorized);
        }

        Ok(Integration)
    }
}
