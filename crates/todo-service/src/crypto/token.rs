//! Signed, expiring identity tokens (HMAC JWT).
//!
//! Tokens carry `{sub, exp, iat}` and nothing else. Expiry is checked against
//! the injected [`Clock`] rather than the system time so tests can advance it.

use crate::config::AuthSettings;
use crate::errors::TodoError;
use crate::observability::metrics;
use common::clock::Clock;
use common::secret::ExposeSecret;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

/// Maximum accepted token size. Anything larger is rejected before any
/// base64 decoding or signature work happens.
pub const MAX_TOKEN_SIZE_BYTES: usize = 4096;

/// Why a presented token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,
}

impl TokenError {
    /// Bounded label used for metrics.
    pub fn category(self) -> &'static str {
        match self {
            TokenError::InvalidSignature => "signature_invalid",
            TokenError::Expired => "expired",
            TokenError::Malformed => "malformed",
        }
    }
}

/// Token payload.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject: the username the token was issued to.
    pub sub: String,

    /// Expiration (Unix seconds).
    pub exp: i64,

    /// Issued at (Unix seconds).
    pub iat: i64,
}

impl fmt::Debug for TokenClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenClaims")
            .field("sub", &"[REDACTED]")
            .field("exp", &self.exp)
            .field("iat", &self.iat)
            .finish()
    }
}

/// Issues and validates identity tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    default_ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("default_ttl_seconds", &self.default_ttl.num_seconds())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(settings: &AuthSettings, clock: Arc<dyn Clock>) -> Self {
        let secret = settings.signing_secret().expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: settings.algorithm(),
            default_ttl: settings.token_ttl(),
            clock,
        }
    }

    /// Lifetime applied by [`issue`](Self::issue).
    pub fn default_ttl(&self) -> chrono::Duration {
        self.default_ttl
    }

    /// Issue a token for `subject` with the configured default lifetime.
    pub fn issue(&self, subject: &str) -> Result<String, TodoError> {
        self.issue_with_ttl(subject, self.default_ttl)
    }

    /// Issue a token for `subject` that expires `ttl` from now.
    #[instrument(skip_all)]
    pub fn issue_with_ttl(&self, subject: &str, ttl: chrono::Duration) -> Result<String, TodoError> {
        if ttl <= chrono::Duration::zero() {
            return Err(TodoError::Validation(
                "token lifetime must be positive".to_string(),
            ));
        }

        let issued_at = self.clock.now();
        let expires_at = issued_at.checked_add_signed(ttl).ok_or_else(|| {
            TodoError::Validation("token lifetime is out of range".to_string())
        })?;
        let claims = TokenClaims {
            sub: subject.to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TodoError::Crypto(format!("Token signing failed: {}", e)))
    }

    /// Validate a token and return its subject.
    ///
    /// Rejects oversized input, tokens signed with a different key or
    /// algorithm, and tokens whose `exp` is at or before the current time.
    #[instrument(skip_all)]
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        let result = self.validate_inner(token);

        match &result {
            Ok(_) => metrics::record_token_validation("success", None),
            Err(e) => {
                tracing::debug!(target: "todo.crypto", error = %e, "Token rejected");
                metrics::record_token_validation("error", Some(e.category()));
            }
        }

        result
    }

    fn validate_inner(&self, token: &str) -> Result<String, TokenError> {
        if token.len() > MAX_TOKEN_SIZE_BYTES {
            tracing::debug!(
                target: "todo.crypto",
                token_size = token.len(),
                max_size = MAX_TOKEN_SIZE_BYTES,
                "Token rejected: size exceeds maximum"
            );
            return Err(TokenError::Malformed);
        }

        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?
            .claims;

        if claims.sub.is_empty() {
            return Err(TokenError::Malformed);
        }

        if self.clock.now().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims.sub)
    }
}
