//! Custom test assertions for expressive tests
//!
//! Inspects token structure without verifying the signature; signature
//! checks belong to the service under test.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

/// JWT header structure
#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// JWT claims structure
#[derive(Debug, Deserialize)]
struct JwtClaims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

fn decode_part<T: serde::de::DeserializeOwned>(token: &str, index: usize) -> T {
    let part = token
        .split('.')
        .nth(index)
        .unwrap_or_else(|| panic!("JWT is missing part {}", index));
    let bytes = URL_SAFE_NO_PAD
        .decode(part)
        .unwrap_or_else(|e| panic!("Failed to base64 decode JWT part {}: {}", index, e));
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("Failed to parse JWT part {} JSON: {}", index, e))
}

/// Custom assertions for issued tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_for_subject("alice")
///     .assert_expires_in(900);
/// ```
pub trait TokenAssertions {
    /// Assert that the token is a well-formed HMAC-signed JWT
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert the signing algorithm named in the header
    fn assert_algorithm(&self, alg: &str) -> &Self;

    /// Assert that the token is for the specified subject
    fn assert_for_subject(&self, subject: &str) -> &Self;

    /// Assert that `exp - iat` equals the specified seconds
    fn assert_expires_in(&self, seconds: i64) -> &Self;
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let parts: Vec<_> = self.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts.len()
        );

        let header: JwtHeader = decode_part(self, 0);
        assert!(
            header.alg.starts_with("HS"),
            "Expected an HMAC algorithm, got {}",
            header.alg
        );
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        let claims: JwtClaims = decode_part(self, 1);
        assert!(!claims.sub.is_empty(), "JWT subject must not be empty");
        assert!(claims.exp > claims.iat, "JWT must expire after issuance");

        self
    }

    fn assert_algorithm(&self, alg: &str) -> &Self {
        let header: JwtHeader = decode_part(self, 0);
        assert_eq!(header.alg, alg, "Unexpected JWT algorithm");
        self
    }

    fn assert_for_subject(&self, subject: &str) -> &Self {
        let claims: JwtClaims = decode_part(self, 1);
        assert_eq!(claims.sub, subject, "Unexpected JWT subject");
        self
    }

    fn assert_expires_in(&self, seconds: i64) -> &Self {
        let claims: JwtClaims = decode_part(self, 1);
        assert_eq!(
            claims.exp - claims.iat,
            seconds,
            "Unexpected JWT lifetime"
        );
        self
    }
}
