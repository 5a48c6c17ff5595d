use async_trait::async_trait;

use crate::{Email, Result};

/// A backend that delivers one email per call.
///
/// Implementations do not retry; a failed send is reported to the caller.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send an email.
    async fn send(&self, email: &Email) -> Result<()>;

    /// Get a human-readable name for this backend.
    fn name(&self) -> &str;
}
