//! Builder patterns for test token construction
//!
//! Produces tokens the service would never issue itself: already expired,
//! signed with a foreign secret, or carrying odd claims.

use crate::crypto_fixtures::TEST_SIGNING_SECRET;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

/// Builder for signed test tokens
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .for_user("alice")
///     .at(server.clock().now())
///     .expires_in(-60)
///     .sign();
/// ```
pub struct TestTokenBuilder {
    sub: Option<String>,
    now: DateTime<Utc>,
    ttl_seconds: i64,
    secret: String,
    algorithm: Algorithm,
}

impl TestTokenBuilder {
    /// Create a builder with defaults: subject `test-subject`, one hour
    /// lifetime, test secret, HS256.
    pub fn new() -> Self {
        Self {
            sub: Some("test-subject".to_string()),
            now: Utc::now(),
            ttl_seconds: 3600,
            secret: TEST_SIGNING_SECRET.to_string(),
            algorithm: Algorithm::HS256,
        }
    }

    /// Set the subject (username)
    pub fn for_user(mut self, subject: &str) -> Self {
        self.sub = Some(subject.to_string());
        self
    }

    /// Leave the `sub` claim out entirely
    pub fn without_subject(mut self) -> Self {
        self.sub = None;
        self
    }

    /// Use `now` as the issue time (pass the server's mock clock here)
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Set expiration relative to the issue time; negative means already expired
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.ttl_seconds = seconds;
        self
    }

    /// Sign with a different secret
    pub fn signed_with(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    /// Sign with a different HMAC algorithm
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the claims as a JSON value
    pub fn build_claims(&self) -> serde_json::Value {
        let mut claims = json!({
            "exp": (self.now + Duration::seconds(self.ttl_seconds)).timestamp(),
            "iat": self.now.timestamp(),
        });
        if let Some(sub) = &self.sub {
            claims["sub"] = json!(sub);
        }
        claims
    }

    /// Build and sign the token
    pub fn sign(self) -> String {
        encode(
            &Header::new(self.algorithm),
            &self.build_claims(),
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("test token signing should not fail")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
