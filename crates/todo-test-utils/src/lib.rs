//! # Todo Test Utilities
//!
//! Shared test utilities for the todo service.
//!
//! This crate provides:
//! - Deterministic auth fixtures (fixed signing secrets, low bcrypt cost)
//! - Test token builder for crafted tokens (expired, foreign key, odd claims)
//! - Server test harness (TestTodoServer for E2E tests over HTTP)
//! - Fixed test credentials
//! - Custom assertions (TokenAssertions trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use todo_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let server = TestTodoServer::spawn().await?;
//!     let token = server.signup(ALICE_USERNAME, ALICE_PASSWORD).await?;
//!
//!     token.assert_valid_jwt().assert_for_subject(ALICE_USERNAME);
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod crypto_fixtures;
pub mod server_harness;
pub mod test_ids;
pub mod token_builders;

// Re-export commonly used items
pub use assertions::*;
pub use crypto_fixtures::*;
pub use server_harness::*;
pub use test_ids::*;
pub use token_builders::*;
