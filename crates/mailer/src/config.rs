use secrecy::SecretString;
use std::env;

use crate::MailerError;

/// Default Resend API base URL.
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";

/// Default sender address (Resend's shared test sender).
pub const DEFAULT_FROM: &str = "onboarding@resend.dev";

/// Which backend delivers mail.
#[derive(Debug, Clone)]
pub enum Transport {
    /// Resend HTTP API.
    Resend {
        api_url: String,
        api_key: SecretString,
    },
    /// SMTP relay with STARTTLS.
    Smtp {
        host: String,
        port: u16,
        username: String,
        password: SecretString,
    },
}

/// Configuration for outbound mail.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub transport: Transport,
    /// Sender address used by callers that do not set one.
    pub from: String,
}

impl MailerConfig {
    /// Resend backend with the default API URL.
    pub fn resend(api_key: impl Into<String>) -> Self {
        Self {
            transport: Transport::Resend {
                api_url: DEFAULT_RESEND_API_URL.to_string(),
                api_key: SecretString::from(api_key.into()),
            },
            from: DEFAULT_FROM.to_string(),
        }
    }

    /// SMTP backend on port 587.
    pub fn smtp(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            transport: Transport::Smtp {
                host: host.into(),
                port: 587,
                username: username.into(),
                password: SecretString::from(password.into()),
            },
            from: DEFAULT_FROM.to_string(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// - `MAIL_TRANSPORT` - `resend` (default) or `smtp`
    /// - `MAIL_FROM` - Default: onboarding@resend.dev
    ///
    /// For `resend`:
    /// - `RESEND_API_KEY` - required
    /// - `RESEND_API_URL` - Default: https://api.resend.com
    ///
    /// For `smtp`:
    /// - `SMTP_HOST`, `SMTP_USERNAME`, `SMTP_PASSWORD` - required
    /// - `SMTP_PORT` - Default: 587
    pub fn from_env() -> Result<Self, MailerError> {
        let from = env::var("MAIL_FROM").unwrap_or_else(|_| DEFAULT_FROM.to_string());

        let transport_name = env::var("MAIL_TRANSPORT").unwrap_or_else(|_| "resend".to_string());

        let transport = match transport_name.to_lowercase().as_str() {
            "resend" => Transport::Resend {
                api_url: env::var("RESEND_API_URL")
                    .unwrap_or_else(|_| DEFAULT_RESEND_API_URL.to_string()),
                api_key: SecretString::from(required("RESEND_API_KEY")?),
            },
            "smtp" => Transport::Smtp {
                host: required("SMTP_HOST")?,
                port: env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "587".to_string())
                    .parse::<u16>()
                    .map_err(|e| MailerError::Config(format!("Invalid SMTP_PORT: {}", e)))?,
                username: required("SMTP_USERNAME")?,
                password: SecretString::from(required("SMTP_PASSWORD")?),
            },
            other => {
                return Err(MailerError::Config(format!(
                    "Unknown MAIL_TRANSPORT '{}', expected 'resend' or 'smtp'",
                    other
                )))
            }
        };

        Ok(Self { transport, from })
    }

    /// Builder method to set the sender address.
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    /// Builder method to point the Resend backend at another URL.
    ///
    /// No effect on an SMTP configuration.
    pub fn with_resend_api_url(mut self, url: impl Into<String>) -> Self {
        if let Transport::Resend { ref mut api_url, .. } = self.transport {
            *api_url = url.into();
        }
        self
    }

    /// Builder method to set the SMTP port.
    ///
    /// No effect on a Resend configuration.
    pub fn with_smtp_port(mut self, new_port: u16) -> Self {
        if let Transport::Smtp { ref mut port, .. } = self.transport {
            *port = new_port;
        }
        self
    }
}

fn required(name: &str) -> Result<String, MailerError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| MailerError::MissingEnvVar(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_builders() {
        let config = MailerConfig::resend("re_key")
            .with_resend_api_url("http://localhost:1234")
            .with_from("relay@example.com");

        match config.transport {
            Transport::Resend { api_url, api_key } => {
                assert_eq!(api_url, "http://localhost:1234");
                assert_eq!(api_key.expose_secret(), "re_key");
            }
            other => panic!("Expected Resend, got {:?}", other),
        }
        assert_eq!(config.from, "relay@example.com");

        let config = MailerConfig::smtp("smtp.example.com", "user", "pass").with_smtp_port(2525);
        assert!(matches!(config.transport, Transport::Smtp { port: 2525, .. }));
    }

    #[test]
    fn test_secret_not_in_debug() {
        let config = MailerConfig::resend("re_super_secret");
        assert!(!format!("{:?}", config).contains("re_super_secret"));
    }

    // Env vars are process-global; keep all scenarios in one test.
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_vars() {
            for var in [
                "MAIL_TRANSPORT",
                "MAIL_FROM",
                "RESEND_API_KEY",
                "RESEND_API_URL",
                "SMTP_HOST",
                "SMTP_PORT",
                "SMTP_USERNAME",
                "SMTP_PASSWORD",
            ] {
                std::env::remove_var(var);
            }
        }

        // Resend is the default and needs a key
        clear_all_vars();
        match MailerConfig::from_env() {
            Err(MailerError::MissingEnvVar(name)) => assert_eq!(name, "RESEND_API_KEY"),
            other => panic!("Expected MissingEnvVar, got {:?}", other),
        }

        clear_all_vars();
        std::env::set_var("RESEND_API_KEY", "re_env");
        let config = MailerConfig::from_env().unwrap();
        assert_eq!(config.from, DEFAULT_FROM);
        assert!(matches!(
            config.transport,
            Transport::Resend { ref api_url, .. } if api_url == DEFAULT_RESEND_API_URL
        ));

        // SMTP
        clear_all_vars();
        std::env::set_var("MAIL_TRANSPORT", "smtp");
        std::env::set_var("SMTP_HOST", "smtp.example.com");
        std::env::set_var("SMTP_USERNAME", "relay");
        std::env::set_var("SMTP_PASSWORD", "pw");
        std::env::set_var("MAIL_FROM", "relay@example.com");
        let config = MailerConfig::from_env().unwrap();
        assert_eq!(config.from, "relay@example.com");
        assert!(matches!(config.transport, Transport::Smtp { port: 587, .. }));

        std::env::set_var("SMTP_PORT", "not-a-port");
        assert!(matches!(MailerConfig::from_env(), Err(MailerError::Config(_))));

        // Unknown transport
        clear_all_vars();
        std::env::set_var("MAIL_TRANSPORT", "pigeon");
        assert!(matches!(MailerConfig::from_env(), Err(MailerError::Config(_))));

        clear_all_vars();
    }
}
