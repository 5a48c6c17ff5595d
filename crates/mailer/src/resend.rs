use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{Email, Mailer, MailerError, Result};

/// Error body returned by the Resend API.
#[derive(Debug, Deserialize)]
struct ResendErrorBody {
    #[serde(default)]
    name: Option<String>,
    message: String,
}

/// Success body returned by the Resend API.
#[derive(Debug, Deserialize)]
struct ResendSendResponse {
    id: String,
}

/// Mailer backed by the Resend HTTP API.
pub struct ResendMailer {
    client: Client,
    api_url: String,
    api_key: SecretString,
}

impl ResendMailer {
    /// Create a new Resend client.
    pub fn new(api_url: impl Into<String>, api_key: SecretString) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| MailerError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let api_url = api_url.into();
        info!(api_url = %api_url, "Created Resend mail client");

        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    fn emails_url(&self) -> String {
        format!("{}/emails", self.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    #[instrument(skip(self, email), fields(to = ?email.to, subject = %email.subject))]
    async fn send(&self, email: &Email) -> Result<()> {
        let response = self
            .client
            .post(self.emails_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(email)
            .send()
            .await
            .map_err(|e| MailerError::Unavailable(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ResendErrorBody>(&body) {
                Ok(parsed) => match parsed.name {
                    Some(name) => format!("{}: {}", name, parsed.message),
                    None => parsed.message,
                },
                Err(_) => body,
            };

            warn!(status = status.as_u16(), %message, "Resend rejected email");
            return Err(MailerError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        match response.json::<ResendSendResponse>().await {
            Ok(sent) => info!(id = %sent.id, "Email sent successfully"),
            Err(_) => info!("Email sent successfully"),
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "Resend"
    }
}
