//! Observability for the todo service.
//!
//! # Privacy by Default
//!
//! All instrumentation uses `#[instrument(skip_all)]` and explicit field
//! allow-listing. Fields fall into three groups:
//! - **SAFE**: logged in plaintext (operation names, ids, status labels)
//! - **HASHED**: SHA-256 hashed for correlation (usernames)
//! - **NEVER**: never logged (passwords, password hashes, tokens, the signing secret)

pub mod metrics;

use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars).
///
/// Used for usernames, which need to be correlated across log lines but
/// should not be stored in plaintext. This is not a secret-protecting hash.
pub fn hash_for_correlation(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    // 4 bytes is enough for correlation and limits reversibility
    hex::encode(digest.get(..4).unwrap_or_default())
}
