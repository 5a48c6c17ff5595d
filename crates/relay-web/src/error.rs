//! Error types for the web server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use receptionist::{ContactError, IdentityError, OrganizeError};
use thiserror::Error;

/// Errors a handler can answer with. Every variant renders as
/// `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum WebError {
    /// No signed-in user on the request.
    #[error("Authentication required")]
    Unauthenticated,

    /// Missing or wrong integration bearer token.
    #[error("Unauthorized")]
    Unauthorized,

    /// The integration API has no token configured.
    #[error("Integration API disabled")]
    IntegrationDisabled,

    /// No identity provider is configured.
    #[error("User sync not configured")]
    IdentityDisabled,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Contact error: {0}")]
    Contact(#[from] ContactError),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OrganizeError> for WebError {
    fn from(err: OrganizeError) -> Self {
        match err {
            OrganizeError::AuthenticationRequired => WebError::Unauthenticated,
            OrganizeError::Database(e) => WebError::Database(e),
        }
    }
}

const INTERNAL: &str = "Internal server error";

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            WebError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            WebError::Unauthorized => {
                tracing::warn!("Unauthorized integration request");
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            WebError::IntegrationDisabled => (StatusCode::FORBIDDEN, self.to_string()),
            WebError::IdentityDisabled => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            WebError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            WebError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            WebError::Contact(err) => {
                let status = if err.is_validation() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, err.user_message().to_string())
            }
            WebError::Identity(err) => identity_response(err),
            WebError::Database(DatabaseError::NotFound { entity, .. }) => {
                (StatusCode::NOT_FOUND, format!("{} not found", entity))
            }
            WebError::Database(err @ DatabaseError::InvalidTimestamp { .. }) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            WebError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL.to_string())
            }
            WebError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL.to_string())
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

fn identity_response(err: &IdentityError) -> (StatusCode, String) {
    match err {
        IdentityError::NotFound(_) => (StatusCode::NOT_FOUND, "User not found".to_string()),
        IdentityError::MissingEmail(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "User has no email address".to_string(),
        ),
        IdentityError::Provider { .. } | IdentityError::Unavailable(_) => {
            tracing::error!("Identity provider error: {}", err);
            (
                StatusCode::BAD_GATEWAY,
                "Identity provider unavailable".to_string(),
            )
        }
        IdentityError::Config(_) | IdentityError::Database(_) => {
            tracing::error!("User sync error: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL.to_string())
        }
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;
    use mailer::MailerError;

    fn status_of(err: WebError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(status_of(WebError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ContactError::InvalidEmail.into()), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(ContactError::Send(MailerError::Unavailable("x".into())).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(
                DatabaseError::NotFound {
                    entity: "Call",
                    id: "c1".to_string()
                }
                .into()
            ),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(
                DatabaseError::InvalidTimestamp {
                    field: "created_at",
                    value: "soon".to_string()
                }
                .into()
            ),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(OrganizeError::AuthenticationRequired.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(IdentityError::Unavailable("dns".into()).into()),
            StatusCode::BAD_GATEWAY
        );
    }
}
