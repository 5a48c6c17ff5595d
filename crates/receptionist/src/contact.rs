//! Contact form dispatch.
//!
//! Validates a submission, renders the operator notification as HTML and
//! plain text, and hands it to the configured [`Mailer`]. One attempt per
//! submission.

use std::sync::Arc;

use askama::Template;
use chrono::{DateTime, SecondsFormat, Utc};
use mailer::{Email, Mailer, MailerError};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::error::ContactError;

const UNKNOWN: &str = "Unknown";

/// A contact-form submission as posted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "emailContent")]
    pub email_content: Option<String>,
}

/// Request context echoed into the notification for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMeta {
    pub ip: String,
    pub user_agent: String,
    pub submitted_at: DateTime<Utc>,
}

impl ContactMeta {
    /// Build from raw header values. The client IP is the first
    /// `X-Forwarded-For` entry, else `X-Real-IP`, else `Unknown`.
    pub fn new(
        forwarded_for: Option<&str>,
        real_ip: Option<&str>,
        user_agent: Option<&str>,
    ) -> Self {
        let ip = forwarded_for
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .or_else(|| real_ip.map(str::trim).filter(|value| !value.is_empty()))
            .unwrap_or(UNKNOWN);

        let user_agent = user_agent
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(UNKNOWN);

        Self {
            ip: ip.to_string(),
            user_agent: user_agent.to_string(),
            submitted_at: Utc::now(),
        }
    }
}

/// A submission that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidContact<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub message: Option<&'a str>,
    pub content: &'a str,
}

impl ContactRequest {
    /// Check required fields, then the email shape.
    pub fn validate(&self) -> Result<ValidContact<'_>, ContactError> {
        let (Some(name), Some(email), Some(content)) = (
            present(&self.name),
            present(&self.email),
            present(&self.email_content),
        ) else {
            return Err(ContactError::MissingFields);
        };

        if !is_valid_email(email) {
            return Err(ContactError::InvalidEmail);
        }

        Ok(ValidContact {
            name,
            email,
            message: present(&self.message),
            content,
        })
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot in the
/// domain with something on both sides of it.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[derive(Template)]
#[template(path = "contact_email.html")]
struct ContactHtml<'a> {
    name: &'a str,
    email: &'a str,
    message: Option<&'a str>,
    content: &'a str,
    date: &'a str,
    ip: &'a str,
    user_agent: &'a str,
    timestamp: &'a str,
}

#[derive(Template)]
#[template(path = "contact_email.txt")]
struct ContactText<'a> {
    name: &'a str,
    email: &'a str,
    message: Option<&'a str>,
    content: &'a str,
    date: &'a str,
    ip: &'a str,
    user_agent: &'a str,
    timestamp: &'a str,
}

/// Render the `(html, text)` bodies. Every field is HTML-escaped in the HTML
/// body.
pub fn render(contact: &ValidContact<'_>, meta: &ContactMeta) -> Result<(String, String), askama::Error> {
    let date = meta.submitted_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let timestamp = meta.submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true);

    let html = ContactHtml {
        name: contact.name,
        email: contact.email,
        message: contact.message,
        content: contact.content,
        date: &date,
        ip: &meta.ip,
        user_agent: &meta.user_agent,
        timestamp: &timestamp,
    }
    .render()?;

    let text = ContactText {
        name: contact.name,
        email: contact.email,
        message: contact.message,
        content: contact.content,
        date: &date,
        ip: &meta.ip,
        user_agent: &meta.user_agent,
        timestamp: &timestamp,
    }
    .render()?;

    Ok((html, text))
}

/// Subject line of the operator notification.
pub fn subject_for(name: &str) -> String {
    format!("📋 New Business Information from {}", name)
}

/// Sends contact submissions to a fixed operator address.
#[derive(Clone)]
pub struct ContactService {
    mailer: Arc<dyn Mailer>,
    from: String,
    recipient: String,
}

impl ContactService {
    pub fn new(mailer: Arc<dyn Mailer>, from: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            mailer,
            from: from.into(),
            recipient: recipient.into(),
        }
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Validate, render and send. Validation failures never reach the mailer.
    pub async fn send(&self, request: &ContactRequest, meta: &ContactMeta) -> Result<(), ContactError> {
        let contact = request.validate().inspect_err(|e| {
            warn!(error = %e, ip = %meta.ip, "Rejected contact submission");
        })?;

        let (html, text) = render(&contact, meta).inspect_err(|e| {
            error!(error = %e, "Failed to render contact email");
        })?;

        let email = Email::new(&self.from, &self.recipient, subject_for(contact.name), text)
            .with_html(html);

        match self.mailer.send(&email).await {
            Ok(()) => {
                info!(
                    mailer = self.mailer.name(),
                    ip = %meta.ip,
                    chars = contact.content.len(),
                    "Contact email sent"
                );
                Ok(())
            }
            Err(e) => {
                match &e {
                    MailerError::Rejected { status, message } => {
                        error!(status, message = %message, "Email service rejected contact email");
                    }
                    other => error!(error = %other, "Email service unavailable"),
                }
                Err(ContactError::Send(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct OutboxMailer {
        sent: Mutex<Vec<Email>>,
        failure: Option<fn() -> MailerError>,
    }

    #[async_trait]
    impl Mailer for OutboxMailer {
        async fn send(&self, email: &Email) -> mailer::Result<()> {
            if let Some(failure) = self.failure {
                return Err(failure());
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }

        fn name(&self) -> &str {
            "Outbox"
        }
    }

    fn request(email: &str) -> ContactRequest {
        ContactRequest {
            name: Some("Dana".to_string()),
            email: Some(email.to_string()),
            message: Some("Call after 5".to_string()),
            email_content: Some("## 🏢 BUSINESS OVERVIEW\n- Dana's HVAC".to_string()),
        }
    }

    fn meta() -> ContactMeta {
        ContactMeta::new(Some("203.0.113.7, 10.0.0.1"), None, Some("curl/8.0"))
    }

    #[test]
    fn test_email_shape() {
        for valid in ["a@b.co", "first.last@sub.example.com", "x+tag@d.io", "a@b.c.d"] {
            assert!(is_valid_email(valid), "{} should be valid", valid);
        }
        for invalid in [
            "not-an-email",
            "@example.com",
            "a@",
            "a@b",
            "a@.com",
            "a@com.",
            "a@@b.com",
            "a@b@c.com",
            "a b@c.com",
            "a@b.com ",
        ] {
            assert!(!is_valid_email(invalid), "{} should be invalid", invalid);
        }
    }

    #[test]
    fn test_missing_fields_checked_before_email() {
        let mut blank_name = request("not-an-email");
        blank_name.name = Some("   ".to_string());
        assert!(matches!(blank_name.validate(), Err(ContactError::MissingFields)));

        let no_content = ContactRequest {
            email_content: None,
            ..request("dana@example.com")
        };
        assert!(matches!(no_content.validate(), Err(ContactError::MissingFields)));

        assert!(matches!(
            request("not-an-email").validate(),
            Err(ContactError::InvalidEmail)
        ));
    }

    #[test]
    fn test_blank_message_is_omitted() {
        let mut req = request("dana@example.com");
        req.message = Some("  ".to_string());
        assert_eq!(req.validate().unwrap().message, None);
    }

    #[test]
    fn test_request_uses_camel_case_content() {
        let req: ContactRequest = serde_json::from_str(
            r#"{"name":"Dana","email":"dana@example.com","emailContent":"profile"}"#,
        )
        .unwrap();
        assert_eq!(req.email_content.as_deref(), Some("profile"));
        assert_eq!(req.message, None);
    }

    #[test]
    fn test_meta_ip_precedence() {
        assert_eq!(meta().ip, "203.0.113.7");
        assert_eq!(ContactMeta::new(None, Some("198.51.100.2"), None).ip, "198.51.100.2");
        assert_eq!(ContactMeta::new(Some(" "), Some("198.51.100.2"), None).ip, "198.51.100.2");

        let unknown = ContactMeta::new(None, None, None);
        assert_eq!(unknown.ip, "Unknown");
        assert_eq!(unknown.user_agent, "Unknown");
    }

    #[test]
    fn test_html_escapes_every_field() {
        let req = ContactRequest {
            name: Some("<b>Dana</b>".to_string()),
            email: Some("dana@example.com".to_string()),
            message: Some("<script>alert(1)</script>".to_string()),
            email_content: Some("Tom & Jerry <Pest Control>".to_string()),
        };
        let meta = ContactMeta::new(Some("<img>"), None, Some("\"agent\""));

        let (html, text) = render(&req.validate().unwrap(), &meta).unwrap();

        assert!(!html.contains("<b>Dana</b>"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img>"));
        assert!(html.contains("&lt;b&gt;Dana&lt;/b&gt;"));
        assert!(html.contains("Tom &amp; Jerry &lt;Pest Control&gt;"));

        assert!(text.contains("Name: <b>Dana</b>"));
        assert!(text.contains("Tom & Jerry <Pest Control>"));
        assert!(text.contains("ADDITIONAL MESSAGE"));
    }

    #[tokio::test]
    async fn test_send_delivers_one_email() {
        let outbox = Arc::new(OutboxMailer::default());
        let service = ContactService::new(outbox.clone(), "onboarding@resend.dev", "ops@relay.example");

        service.send(&request("dana@example.com"), &meta()).await.unwrap();

        let sent = outbox.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["ops@relay.example".to_string()]);
        assert_eq!(sent[0].subject, "📋 New Business Information from Dana");
        assert!(sent[0].text.contains("IP Address: 203.0.113.7"));
        assert!(sent[0].html.as_deref().unwrap().contains("curl/8.0"));
    }

    #[tokio::test]
    async fn test_invalid_email_never_sends() {
        let outbox = Arc::new(OutboxMailer::default());
        let service = ContactService::new(outbox.clone(), "from@x.io", "ops@x.io");

        let err = service.send(&request("not-an-email"), &meta()).await.unwrap_err();

        assert_eq!(err.user_message(), "Invalid email format");
        assert!(outbox.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mailer_failure_is_reported() {
        let outbox = Arc::new(OutboxMailer {
            failure: Some(|| MailerError::Rejected {
                status: 403,
                message: "domain not verified".to_string(),
            }),
            ..Default::default()
        });
        let service = ContactService::new(outbox, "from@x.io", "ops@x.io");

        let err = service.send(&request("dana@example.com"), &meta()).await.unwrap_err();

        assert!(!err.is_validation());
        assert_eq!(err.user_message(), "Failed to send email");
    }
}
