//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use axum::http::HeaderName;

/// Default header carrying the signed-in user id.
pub const DEFAULT_IDENTITY_HEADER: &str = "x-user-id";

/// Relay web server configuration.
///
/// Collaborator settings (model gateway, mail transport, identity provider)
/// are read by their own crates.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Header set by the fronting auth layer with the signed-in user id.
    pub identity_header: HeaderName,
    /// Bearer token for the call-integration API; `None` disables it.
    pub integration_token: Option<String>,
    /// Operator address that receives contact-form emails.
    pub contact_recipient: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `RELAY_ADDR` | Server bind address | `127.0.0.1:3000` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:relay.db?mode=rwc` |
    /// | `RELAY_IDENTITY_HEADER` | Header with the signed-in user id | `x-user-id` |
    /// | `RELAY_INTEGRATION_TOKEN` | Bearer token for `/api/integrations` | (disabled) |
    /// | `CONTACT_RECIPIENT` | Operator address for contact emails | (required) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("RELAY_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            env::var("SQLITE_PATH").unwrap_or_else(|_| "sqlite:relay.db?mode=rwc".to_string());

        let identity_header = env::var("RELAY_IDENTITY_HEADER")
            .unwrap_or_else(|_| DEFAULT_IDENTITY_HEADER.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidIdentityHeader)?;

        let integration_token = env::var("RELAY_INTEGRATION_TOKEN")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let contact_recipient = env::var("CONTACT_RECIPIENT")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingContactRecipient)?;

        Ok(Self {
            addr,
            database_url,
            identity_header,
            integration_token,
            contact_recipient,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid RELAY_ADDR format")]
    InvalidAddr,

    #[error("RELAY_IDENTITY_HEADER is not a valid header name")]
    InvalidIdentityHeader,

    #[error("CONTACT_RECIPIENT environment variable is required")]
    MissingContactRecipient,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear() {
        for var in [
            "RELAY_ADDR",
            "SQLITE_PATH",
            "RELAY_IDENTITY_HEADER",
            "RELAY_INTEGRATION_TOKEN",
            "CONTACT_RECIPIENT",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_from_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear();

        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingContactRecipient)
        ));

        env::set_var("CONTACT_RECIPIENT", "ops@relay.example");
        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.database_url, "sqlite:relay.db?mode=rwc");
        assert_eq!(config.identity_header.as_str(), DEFAULT_IDENTITY_HEADER);
        assert_eq!(config.integration_token, None);

        env::set_var("RELAY_INTEGRATION_TOKEN", "  ");
        assert_eq!(Config::from_env().unwrap().integration_token, None);

        env::set_var("RELAY_IDENTITY_HEADER", "X-Clerk-User-Id");
        env::set_var("RELAY_INTEGRATION_TOKEN", "vapi-secret");
        let config = Config::from_env().unwrap();
        assert_eq!(config.identity_header.as_str(), "x-clerk-user-id");
        assert_eq!(config.integration_token.as_deref(), Some("vapi-secret"));

        env::set_var("RELAY_IDENTITY_HEADER", "bad header");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidIdentityHeader)
        ));

        env::set_var("RELAY_IDENTITY_HEADER", "x-user-id");
        env::set_var("RELAY_ADDR", "not-an-addr");
        assert!(matches!(Config::from_env(), Err(ConfigError::InvalidAddr)));

        clear();
    }
}
