use serde::Serialize;

/// An email message to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    /// Sender address
    pub from: String,
    /// Recipients
    pub to: Vec<String>,
    /// Subject line
    pub subject: String,
    /// Plain text body
    pub text: String,
    /// Optional HTML body (sent as multipart alternative with the text)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl Email {
    /// Create a plain-text email with a single recipient.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: vec![to.into()],
            subject: subject.into(),
            text: text.into(),
            html: None,
        }
    }

    /// Set the HTML body.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_json_shape() {
        let email = Email::new("from@example.com", "to@example.com", "Hi", "Body")
            .with_html("<p>Body</p>");

        let json = serde_json::to_value(&email).unwrap();
        assert_eq!(json["from"], "from@example.com");
        assert_eq!(json["to"], serde_json::json!(["to@example.com"]));
        assert_eq!(json["text"], "Body");
        assert_eq!(json["html"], "<p>Body</p>");
    }

    #[test]
    fn test_text_only_omits_html() {
        let email = Email::new("a@example.com", "b@example.com", "s", "t");
        let json = serde_json::to_value(&email).unwrap();
        assert!(json.get("html").is_none());
    }
}
