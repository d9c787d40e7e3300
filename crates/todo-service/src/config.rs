//! Todo service configuration.
//!
//! Configuration is loaded once at startup from environment variables.
//! The signing secret and hashing parameters are bundled into
//! [`AuthSettings`], which is immutable after construction and shared by
//! the password hasher and the token service.

use common::secret::{ExposeSecret, SecretString};
use jsonwebtoken::Algorithm;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default token lifetime (15 minutes).
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 900;

/// Longest accepted token lifetime (30 days).
pub const MAX_TOKEN_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Default bcrypt cost factor (2^12 rounds).
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Lowest accepted bcrypt cost.
pub const MIN_BCRYPT_COST: u32 = 10;

/// Highest accepted bcrypt cost. Above this a single hash takes close to a second.
pub const MAX_BCRYPT_COST: u32 = 14;

/// Minimum signing secret length in bytes for HMAC algorithms.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// Service configuration.
#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection URL. `None` runs the service on the in-memory store.
    pub database_url: Option<String>,

    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Immutable token and hashing settings.
    pub auth: AuthSettings,
}

/// Custom Debug implementation that redacts the database URL.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("bind_address", &self.bind_address)
            .field("auth", &self.auth)
            .finish()
    }
}

/// Process-wide authentication settings.
///
/// Built once at startup and never mutated. Safe for unsynchronized
/// concurrent reads.
#[derive(Clone)]
pub struct AuthSettings {
    signing_secret: SecretString,
    algorithm: Algorithm,
    token_ttl: chrono::Duration,
    bcrypt_cost: u32,
}

impl AuthSettings {
    /// Build validated settings.
    pub fn new(
        signing_secret: SecretString,
        algorithm: Algorithm,
        token_ttl: chrono::Duration,
        bcrypt_cost: u32,
    ) -> Result<Self, ConfigError> {
        if signing_secret.expose_secret().len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::InvalidSecret(format!(
                "must be at least {} bytes",
                MIN_JWT_SECRET_BYTES
            )));
        }

        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(ConfigError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }

        if token_ttl <= chrono::Duration::zero()
            || token_ttl > chrono::Duration::seconds(MAX_TOKEN_TTL_SECONDS)
        {
            return Err(ConfigError::InvalidValue {
                var: "TOKEN_TTL_SECONDS".to_string(),
                reason: format!("must be 1-{} seconds", MAX_TOKEN_TTL_SECONDS),
            });
        }

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                var: "BCRYPT_COST".to_string(),
                reason: format!("must be {}-{}", MIN_BCRYPT_COST, MAX_BCRYPT_COST),
            });
        }

        Ok(Self {
            signing_secret,
            algorithm,
            token_ttl,
            bcrypt_cost,
        })
    }

    pub fn signing_secret(&self) -> &SecretString {
        &self.signing_secret
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Default lifetime for issued tokens.
    pub fn token_ttl(&self) -> chrono::Duration {
        self.token_ttl
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("signing_secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("token_ttl_seconds", &self.token_ttl.num_seconds())
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid signing secret: {0}")]
    InvalidSecret(String),

    #[error("Unsupported signing algorithm: {0} (expected HS256, HS384 or HS512)")]
    UnsupportedAlgorithm(String),

    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .cloned();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let signing_secret = vars
            .get("JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;

        let algorithm = match vars.get("JWT_ALGORITHM") {
            Some(name) => Algorithm::from_str(name)
                .map_err(|_| ConfigError::UnsupportedAlgorithm(name.clone()))?,
            None => Algorithm::HS256,
        };

        let token_ttl_seconds = parse_var(vars, "TOKEN_TTL_SECONDS", DEFAULT_TOKEN_TTL_SECONDS)?;
        let bcrypt_cost = parse_var(vars, "BCRYPT_COST", DEFAULT_BCRYPT_COST)?;

        let token_ttl = chrono::Duration::try_seconds(token_ttl_seconds).ok_or_else(|| {
            ConfigError::InvalidValue {
                var: "TOKEN_TTL_SECONDS".to_string(),
                reason: "out of range".to_string(),
            }
        })?;

        let auth = AuthSettings::new(
            SecretString::from(signing_secret.clone()),
            algorithm,
            token_ttl,
            bcrypt_cost,
        )?;

        Ok(Config {
            database_url,
            bind_address,
            auth,
        })
    }
}

fn parse_var<T>(vars: &HashMap<String, String>, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match vars.get(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            var: name.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
