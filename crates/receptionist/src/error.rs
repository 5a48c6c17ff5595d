//! Error types for receptionist operations.

use database::DatabaseError;
use mailer::MailerError;
use thiserror::Error;

/// Errors from the business-info organizer.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// No signed-in user; the caller must authenticate and retry.
    #[error("authentication required")]
    AuthenticationRequired,

    /// Loading or deleting the stored profile failed.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Errors from contact dispatch.
#[derive(Debug, Error)]
pub enum ContactError {
    /// `name`, `email` or `emailContent` is absent or blank.
    #[error("missing required fields")]
    MissingFields,

    /// `email` is not shaped like `local@domain.tld`.
    #[error("invalid email format")]
    InvalidEmail,

    /// The email could not be rendered.
    #[error("template error: {0}")]
    Render(#[from] askama::Error),

    /// The email service refused or could not be reached.
    #[error("send failed: {0}")]
    Send(#[from] MailerError),
}

impl ContactError {
    /// Short message safe to show the submitter.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingFields => "Missing required fields",
            Self::InvalidEmail => "Invalid email format",
            Self::Render(_) => "Internal server error",
            Self::Send(MailerError::Rejected { .. }) => "Failed to send email",
            Self::Send(_) => "Email service unavailable",
        }
    }

    /// Whether the submitter is at fault.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingFields | Self::InvalidEmail)
    }
}

/// Errors from identity-provider sync.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider has no such user.
    #[error("user not found: {0}")]
    NotFound(String),

    /// The provider's record has no email address.
    #[error("user {0} has no email address")]
    MissingEmail(String),

    /// The provider answered with an error.
    #[error("identity provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// The provider could not be reached or its reply was unreadable.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    /// Misconfiguration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Storing the user failed.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_user_messages() {
        assert_eq!(
            ContactError::MissingFields.user_message(),
            "Missing required fields"
        );
        assert_eq!(ContactError::InvalidEmail.user_message(), "Invalid email format");
        assert_eq!(
            ContactError::Send(MailerError::Rejected {
                status: 422,
                message: "bad".to_string()
            })
            .user_message(),
            "Failed to send email"
        );
        assert_eq!(
            ContactError::Send(MailerError::Unavailable("dns".to_string())).user_message(),
            "Email service unavailable"
        );
        assert!(ContactError::InvalidEmail.is_validation());
        assert!(!ContactError::Send(MailerError::Unavailable(String::new())).is_validation());
    }
}
