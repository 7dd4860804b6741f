//! API key verification
//!
//! Every protected request carries the shared secret in the `x-api-key`
//! header. Comparison is done on SHA-256 digests so the time taken does not
//! depend on how many leading bytes of the candidate match the secret.

use sha2::{Digest, Sha256};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authentication error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyError {
    /// Header absent or not valid UTF-8
    Missing,
    /// Header present but does not match the configured secret
    Mismatch,
}

impl std::fmt::Display for ApiKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiKeyError::Missing => write!(f, "Missing API key"),
            ApiKeyError::Mismatch => write!(f, "API key mismatch"),
        }
    }
}

impl std::error::Error for ApiKeyError {}

/// Verify a presented API key against the configured secret
pub fn verify_api_key(provided: Option<&str>, expected: &str) -> Result<(), ApiKeyError> {
    let provided = provided.ok_or(ApiKeyError::Missing)?;

    let provided_digest = Sha256::digest(provided.as_bytes());
    let expected_digest = Sha256::digest(expected.as_bytes());

    let diff = provided_digest
        .iter()
        .zip(expected_digest.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b));

    if diff == 0 {
        Ok(())
    } else {
        Err(ApiKeyError::Mismatch)
    }
}
