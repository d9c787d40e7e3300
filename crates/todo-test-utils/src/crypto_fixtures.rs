//! Deterministic auth fixtures for testing
//!
//! Fixed secrets and the lowest accepted bcrypt cost keep tests reproducible
//! and fast.

use common::secret::SecretString;
use jsonwebtoken::Algorithm;
use todo_service::config::{AuthSettings, ConfigError, MIN_BCRYPT_COST};

/// Signing secret used by the test server.
pub const TEST_SIGNING_SECRET: &str = "test-signing-secret-0123456789abcdef";

/// A different valid secret, for tokens the server must reject.
pub const FOREIGN_SIGNING_SECRET: &str = "foreign-signing-secret-fedcba9876543210";

/// Default token lifetime in tests (15 minutes, same as production).
pub const TEST_TOKEN_TTL_SECONDS: i64 = 900;

/// Auth settings with the test secret, HS256, a 15 minute TTL and bcrypt cost 10.
pub fn test_auth_settings() -> Result<AuthSettings, ConfigError> {
    test_auth_settings_with(
        Algorithm::HS256,
        chrono::Duration::seconds(TEST_TOKEN_TTL_SECONDS),
    )
}

/// Auth settings with the test secret and a custom algorithm and TTL.
pub fn test_auth_settings_with(
    algorithm: Algorithm,
    token_ttl: chrono::Duration,
) -> Result<AuthSettings, ConfigError> {
    AuthSettings::new(
        SecretString::from(TEST_SIGNING_SECRET),
        algorithm,
        token_ttl,
        MIN_BCRYPT_COST,
    )
}
