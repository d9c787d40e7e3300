//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports types from the [`secrecy`] crate. `SecretString` implements
//! `Debug` with redaction, so any struct deriving `Debug` that holds one is
//! safe to log via `{:?}` or tracing.
//!
//! Use `SecretString` for:
//! - User passwords on their way from a request into the password hasher
//! - The process-wide token signing secret
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct Credentials {
//!     username: String,
//!     password: SecretString,
//! }
//!
//! let creds = Credentials {
//!     username: "alice".to_string(),
//!     password: SecretString::from("hunter2"),
//! };
//!
//! assert!(!format!("{creds:?}").contains("hunter2"));
//! assert_eq!(creds.password.expose_secret(), "hunter2");
//! ```

pub use secrecy::{ExposeSecret, SecretString};
