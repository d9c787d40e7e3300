//! Salted one-way password hashing (bcrypt).

use crate::config::AuthSettings;
use crate::errors::TodoError;
use tracing::instrument;

/// Plaintext used to build the decoy hash. Its value is irrelevant; only the
/// cost of verifying against the resulting hash matters.
const DUMMY_PASSWORD: &str = "decoy-password-for-unknown-users";

/// Longest password bcrypt can represent. Input past this many bytes is
/// silently truncated by the algorithm, so longer candidates never verify.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hashes and verifies user passwords with bcrypt.
///
/// Every call to [`hash`](Self::hash) draws a fresh salt, so hashing the same
/// password twice yields two different strings that both verify.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: String,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

impl PasswordHasher {
    /// Build a hasher using the configured bcrypt cost.
    ///
    /// Precomputes a decoy hash at the same cost so that
    /// [`verify_decoy`](Self::verify_decoy) takes as long as a real check.
    pub fn new(settings: &AuthSettings) -> Result<Self, TodoError> {
        let cost = settings.bcrypt_cost();
        let dummy_hash = bcrypt::hash(DUMMY_PASSWORD, cost)
            .map_err(|e| TodoError::Crypto(format!("Password hashing failed: {}", e)))?;

        Ok(Self { cost, dummy_hash })
    }

    /// Hash a plaintext password with a fresh random salt.
    #[instrument(skip_all)]
    pub fn hash(&self, plaintext: &str) -> Result<String, TodoError> {
        bcrypt::hash(plaintext, self.cost)
            .map_err(|e| TodoError::Crypto(format!("Password hashing failed: {}", e)))
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// The digest comparison inside bcrypt is constant-time. A stored value
    /// that is not a bcrypt hash yields `TodoError::HashFormat`. Candidates
    /// longer than [`MAX_PASSWORD_BYTES`] are rejected, since bcrypt would
    /// otherwise compare only their first 72 bytes.
    #[instrument(skip_all)]
    pub fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, TodoError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            // Same bcrypt work as a real check so the length does not show in latency
            return Ok(self.verify_decoy(plaintext));
        }

        bcrypt::verify(plaintext, hash)
            .map_err(|e| TodoError::HashFormat(format!("Password verification failed: {}", e)))
    }

    /// Burn the same CPU time as a real verification and always report failure.
    ///
    /// Used when the username does not exist, so login latency does not reveal
    /// whether an account is registered.
    #[instrument(skip_all)]
    pub fn verify_decoy(&self, plaintext: &str) -> bool {
        let _ = bcrypt::verify(plaintext, &self.dummy_hash);
        false
    }
}
