//! Outbound email for the Relay receptionist app.
//!
//! Two interchangeable backends implement [`Mailer`]:
//! - [`ResendMailer`] posts to the Resend HTTP API
//! - [`SmtpMailer`] relays through any STARTTLS SMTP server with lettre
//!
//! # Example
//!
//! ```rust,no_run
//! use mailer::{build_mailer, Email, MailerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mailer::MailerError> {
//!     let config = MailerConfig::from_env()?;
//!     let from = config.from.clone();
//!     let mailer = build_mailer(&config)?;
//!
//!     let email = Email::new(from, "owner@example.com", "Hello", "Plain text body")
//!         .with_html("<p>HTML body</p>");
//!     mailer.send(&email).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod resend;
mod smtp;
mod trait_def;
mod types;

use std::sync::Arc;

pub use config::{MailerConfig, Transport, DEFAULT_FROM, DEFAULT_RESEND_API_URL};
pub use error::{MailerError, Result};
pub use resend::ResendMailer;
pub use smtp::SmtpMailer;
pub use trait_def::Mailer;
pub use types::Email;

/// Construct the backend selected by the configuration.
pub fn build_mailer(config: &MailerConfig) -> Result<Arc<dyn Mailer>> {
    let mailer: Arc<dyn Mailer> = match &config.transport {
        Transport::Resend { api_url, api_key } => {
            Arc::new(ResendMailer::new(api_url.clone(), api_key.clone())?)
        }
        Transport::Smtp {
            host,
            port,
            username,
            password,
        } => Arc::new(SmtpMailer::new(host, *port, username, password)?),
    };

    Ok(mailer)
}
