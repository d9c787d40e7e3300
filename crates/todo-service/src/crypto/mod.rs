//! Cryptographic primitives: password hashing and signed identity tokens.
//!
//! Both components take their parameters from the immutable
//! [`AuthSettings`](crate::config::AuthSettings) built at startup; neither
//! keeps any mutable state of its own.

pub mod password;
pub mod token;

pub use password::{PasswordHasher, MAX_PASSWORD_BYTES};
pub use token::{TokenClaims, TokenError, TokenService, MAX_TOKEN_SIZE_BYTES};
