//! Identity-provider sync.
//!
//! On sign-in the app mirrors the provider's profile into `users`, fully
//! overwriting the previous row.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use database::{user, Database, NewUser, User};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{error, info, instrument};

use crate::error::IdentityError;

/// Default Clerk backend API base URL.
pub const DEFAULT_CLERK_API_URL: &str = "https://api.clerk.com";

/// Source of signed-in user profiles.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fetch the profile for `user_id`.
    async fn fetch_user(&self, user_id: &str) -> Result<NewUser, IdentityError>;

    fn name(&self) -> &str;
}

/// Configuration for [`ClerkClient`].
#[derive(Debug, Clone)]
pub struct ClerkConfig {
    pub api_url: String,
    pub secret_key: SecretString,
    pub timeout: Duration,
}

impl ClerkConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_CLERK_API_URL.to_string(),
            secret_key: SecretString::from(secret_key.into()),
            timeout: Duration::from_secs(10),
        }
    }

    /// Read `CLERK_SECRET_KEY` and `CLERK_API_URL`.
    ///
    /// Returns `Ok(None)` when no secret key is set, which disables sync.
    pub fn from_env() -> Result<Option<Self>, IdentityError> {
        let Some(secret_key) = env::var("CLERK_SECRET_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
        else {
            return Ok(None);
        };

        let mut config = Self::new(secret_key);
        if let Ok(api_url) = env::var("CLERK_API_URL") {
            if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
                return Err(IdentityError::Config(format!(
                    "CLERK_API_URL must be an http(s) URL, got '{}'",
                    api_url
                )));
            }
            config.api_url = api_url;
        }

        Ok(Some(config))
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn user_url(&self, user_id: &str) -> String {
        format!("{}/v1/users/{}", self.api_url.trim_end_matches('/'), user_id)
    }
}

#[derive(Debug, Deserialize)]
struct ClerkUser {
    id: String,
    #[serde(default)]
    email_addresses: Vec<ClerkEmail>,
    #[serde(default)]
    phone_numbers: Vec<ClerkPhone>,
    first_name: Option<String>,
    last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClerkEmail {
    email_address: String,
}

#[derive(Debug, Deserialize)]
struct ClerkPhone {
    phone_number: String,
}

#[derive(Debug, Deserialize)]
struct ClerkErrors {
    errors: Vec<ClerkErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ClerkErrorDetail {
    message: String,
}

impl ClerkUser {
    fn into_new_user(self) -> Result<NewUser, IdentityError> {
        let email = self
            .email_addresses
            .into_iter()
            .next()
            .map(|e| e.email_address)
            .ok_or_else(|| IdentityError::MissingEmail(self.id.clone()))?;

        Ok(NewUser {
            clerk_user_id: self.id,
            email,
            first_name: self.first_name.filter(|v| !v.is_empty()),
            last_name: self.last_name.filter(|v| !v.is_empty()),
            phone: self.phone_numbers.into_iter().next().map(|p| p.phone_number),
            // Clerk holds no business name.
            business_name: None,
        })
    }
}

/// Reads users from the Clerk backend API.
pub struct ClerkClient {
    client: Client,
    config: ClerkConfig,
}

impl ClerkClient {
    pub fn new(config: ClerkConfig) -> Result<Self, IdentityError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IdentityError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl IdentityProvider for ClerkClient {
    #[instrument(skip(self))]
    async fn fetch_user(&self, user_id: &str) -> Result<NewUser, IdentityError> {
        let response = self
            .client
            .get(self.config.user_url(user_id))
            .bearer_auth(self.config.secret_key.expose_secret())
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(IdentityError::NotFound(user_id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ClerkErrors>(&body)
                .ok()
                .and_then(|e| e.errors.into_iter().next())
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(IdentityError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let user: ClerkUser = response
            .json()
            .await
            .map_err(|e| IdentityError::Unavailable(format!("invalid user payload: {}", e)))?;

        user.into_new_user()
    }

    fn name(&self) -> &str {
        "Clerk"
    }
}

/// Mirror the provider's profile into `users`.
pub async fn sync_user(
    provider: &dyn IdentityProvider,
    db: &Database,
    user_id: &str,
) -> Result<User, IdentityError> {
    let profile = provider.fetch_user(user_id).await.inspect_err(|e| {
        error!(user_id = %user_id, provider = provider.name(), error = %e, "Failed to fetch user profile");
    })?;

    let stored = user::upsert_user(db.pool(), &profile).await.inspect_err(|e| {
        error!(user_id = %user_id, error = %e, "Failed to store user profile");
    })?;

    info!(user_id = %user_id, provider = provider.name(), "User synced");
    Ok(stored)
}
