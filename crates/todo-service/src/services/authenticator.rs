//! Resolves a bearer token into the calling user.

use crate::crypto::TokenService;
use crate::errors::TodoError;
use crate::models::User;
use crate::observability::hash_for_correlation;
use crate::repositories::UserCollection;
use std::sync::Arc;
use tracing::instrument;

/// Validates tokens and looks up their subject.
///
/// Every rejection reason (bad signature, expiry, malformed input, unknown
/// subject) surfaces as the same `TodoError::Unauthenticated`.
#[derive(Clone)]
pub struct Authenticator {
    tokens: Arc<TokenService>,
    users: Arc<dyn UserCollection>,
}

impl Authenticator {
    pub fn new(tokens: Arc<TokenService>, users: Arc<dyn UserCollection>) -> Self {
        Self { tokens, users }
    }

    /// Resolve `token` to the user it was issued to.
    ///
    /// A store failure during the lookup is returned as `TodoError::Store`,
    /// not as an authentication failure.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, token: &str) -> Result<User, TodoError> {
        let username = self
            .tokens
            .validate(token)
            .map_err(|_| TodoError::Unauthenticated)?;

        match self.users.find_by_username(&username).await? {
            Some(user) => Ok(user),
            None => {
                tracing::debug!(
                    target: "todo.auth",
                    username_hash = %hash_for_correlation(&username),
                    "Token subject has no matching user"
                );
                Err(TodoError::Unauthenticated)
            }
        }
    }
}
