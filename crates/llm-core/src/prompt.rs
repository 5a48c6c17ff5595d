//! System prompt fingerprints.
//!
//! Prompts are compiled into the binary; the fingerprint is logged at startup
//! so a deployed build can be matched to the prompt text it ships.

use sha2::{Digest, Sha256};

/// Stable SHA-256 hex digest of a prompt.
pub fn hash_prompt(prompt: &str) -> String {
    Sha256::digest(prompt.as_bytes())
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

/// First 12 hex characters of [`hash_prompt`], for log lines.
pub fn short_fingerprint(prompt: &str) -> String {
    let mut hash = hash_prompt(prompt);
    hash.truncate(12);
    hash
}
