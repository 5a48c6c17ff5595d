use thiserror::Error;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum MailerError {
    /// The mail service answered and refused the message.
    #[error("Email rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The mail service could not be reached.
    #[error("Email service unavailable: {0}")]
    Unavailable(String),

    /// Failed to build the message
    #[error("Failed to build email: {0}")]
    BuildEmail(String),

    /// Invalid email address
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing required environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Result type for mailer operations.
pub type Result<T> = std::result::Result<T, MailerError>;
