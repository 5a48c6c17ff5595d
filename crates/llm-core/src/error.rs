//! Error types for model calls.

use thiserror::Error;

/// Errors that can occur while requesting a completion.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The client is misconfigured (missing key, bad URL).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never got an answer.
    #[error("network error: {0}")]
    Network(String),

    /// The gateway answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The gateway answered but the body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The request exceeded its deadline.
    #[error("request timed out")]
    Timeout,
}

impl LlmError {
    /// Whether the failure came from reaching the gateway rather than from
    /// what it said.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = LlmError::Api {
            status: 429,
            message: "Rate limit exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "API error (429): Rate limit exceeded");
        assert!(!err.is_transport());
        assert!(LlmError::Timeout.is_transport());
    }
}
