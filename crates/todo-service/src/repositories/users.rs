//! User account store contract.

use crate::errors::TodoError;
use crate::models::User;
use async_trait::async_trait;

/// Account storage. Usernames are unique.
#[async_trait]
pub trait UserCollection: Send + Sync {
    /// Create an account.
    ///
    /// Fails with `TodoError::UserExists` if the username is taken, including
    /// when a concurrent insert wins the race.
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, TodoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, TodoError>;
}
