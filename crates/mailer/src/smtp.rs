use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

use crate::{Email, Mailer, MailerError, Result};

/// Mailer backed by an SMTP relay.
///
/// Uses connection pooling for efficient batch sending.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Create a new pooled STARTTLS relay client.
    pub fn new(host: &str, port: u16, username: &str, password: &SecretString) -> Result<Self> {
        let creds = Credentials::new(username.to_string(), password.expose_secret().to_string());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| MailerError::Config(format!("SMTP transport error: {}", e)))?
            .port(port)
            .credentials(creds)
            .build();

        info!(host = %host, port, username = %username, "Created SMTP mail client");

        Ok(Self { transport })
    }
}

/// Build a lettre Message from our Email type.
pub(crate) fn build_message(email: &Email) -> Result<Message> {
    let from: Mailbox = email
        .from
        .parse()
        .map_err(|e| MailerError::InvalidAddress(format!("From '{}': {}", email.from, e)))?;

    let mut builder = Message::builder().from(from).subject(&email.subject);

    for to in &email.to {
        let addr: Mailbox = to
            .parse()
            .map_err(|e| MailerError::InvalidAddress(format!("To '{}': {}", to, e)))?;
        builder = builder.to(addr);
    }

    let message = match &email.html {
        Some(html) => builder.multipart(
            MultiPart::alternative()
                .singlepart(SinglePart::plain(email.text.clone()))
                .singlepart(SinglePart::html(html.clone())),
        ),
        None => builder.body(email.text.clone()),
    };

    message.map_err(|e| MailerError::BuildEmail(e.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, email), fields(to = ?email.to, subject = %email.subject))]
    async fn send(&self, email: &Email) -> Result<()> {
        let message = build_message(email)?;

        self.transport.send(message).await.map_err(|e| {
            if e.is_permanent() {
                MailerError::Rejected {
                    status: e
                        .status()
                        .and_then(|code| code.to_string().parse().ok())
                        .unwrap_or(550),
                    message: e.to_string(),
                }
            } else {
                MailerError::Unavailable(e.to_string())
            }
        })?;

        info!(to = ?email.to, subject = %email.subject, "Email sent successfully");
        Ok(())
    }

    fn name(&self) -> &str {
        "SMTP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_multipart_message() {
        let email = Email::new(
            "onboarding@resend.dev",
            "owner@example.com",
            "📋 New Business Information from Dana",
            "plain body",
        )
        .with_html("<p>html body</p>");

        let message = build_message(&email).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("plain body"));
        assert!(raw.contains("<p>html body</p>"));
    }

    #[test]
    fn test_invalid_recipient() {
        let email = Email::new("onboarding@resend.dev", "not an address", "s", "t");
        assert!(matches!(
            build_message(&email),
            Err(MailerError::InvalidAddress(_))
        ));
    }
}
