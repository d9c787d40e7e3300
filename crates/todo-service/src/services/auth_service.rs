//! Signup and login.
//!
//! Both operations end by issuing a bearer token for the account, so a new
//! user is logged in immediately after signing up.

use crate::crypto::{PasswordHasher, TokenService, MAX_PASSWORD_BYTES};
use crate::errors::TodoError;
use crate::models::TokenResponse;
use crate::observability::{hash_for_correlation, metrics};
use crate::repositories::UserCollection;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Longest accepted username, in characters, after trimming.
pub const MAX_USERNAME_CHARS: usize = 64;

/// Account creation and credential checks.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserCollection>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserCollection>,
        hasher: PasswordHasher,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a new account and issue its first token.
    ///
    /// # Errors
    ///
    /// - `Validation` if the username or password is empty or too long
    /// - `UserExists` if the username is already registered
    #[instrument(skip_all)]
    pub async fn signup(&self, username: &str, password: &str) -> Result<TokenResponse, TodoError> {
        let result = self.signup_inner(username.trim(), password).await;
        metrics::record_auth_attempt("signup", status_label(&result));
        result
    }

    async fn signup_inner(&self, username: &str, password: &str) -> Result<TokenResponse, TodoError> {
        validate_username(username)?;
        validate_password(password)?;

        let username_hash = hash_for_correlation(username);

        if self.users.find_by_username(username).await?.is_some() {
            tracing::debug!(target: "todo.auth", username_hash = %username_hash, "Signup rejected: username taken");
            return Err(TodoError::UserExists);
        }

        let password_hash = self.hasher.hash(password)?;

        // Loses to a concurrent signup through the store's unique constraint
        let user = self.users.insert(username, &password_hash).await?;

        tracing::info!(
            target: "todo.auth",
            user_id = %user.id,
            username_hash = %username_hash,
            "User registered"
        );

        self.issue("signup", &user.username)
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown usernames and wrong passwords both fail with
    /// `InvalidCredentials` after the same amount of bcrypt work.
    #[instrument(skip_all)]
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, TodoError> {
        let result = self.login_inner(username.trim(), password).await;
        metrics::record_auth_attempt("login", status_label(&result));
        result
    }

    async fn login_inner(&self, username: &str, password: &str) -> Result<TokenResponse, TodoError> {
        let username_hash = hash_for_correlation(username);
        let user = self.users.find_by_username(username).await?;

        let is_valid = match &user {
            Some(user) => match self.hasher.verify(password, &user.password_hash) {
                Ok(valid) => valid,
                Err(e) => {
                    tracing::warn!(
                        target: "todo.auth",
                        user_id = %user.id,
                        error = %e,
                        "Stored password hash is unreadable, rejecting login"
                    );
                    false
                }
            },
            None => self.hasher.verify_decoy(password),
        };

        let user = match user {
            Some(user) if is_valid => user,
            _ => {
                tracing::debug!(target: "todo.auth", username_hash = %username_hash, "Login rejected");
                return Err(TodoError::InvalidCredentials);
            }
        };

        tracing::info!(target: "todo.auth", user_id = %user.id, "User logged in");

        self.issue("login", &user.username)
    }

    fn issue(&self, operation: &'static str, subject: &str) -> Result<TokenResponse, TodoError> {
        let start = Instant::now();
        let result = self.tokens.issue(subject);
        metrics::record_token_issuance(operation, status_label(&result), start.elapsed());

        let expires_in = u64::try_from(self.tokens.default_ttl().num_seconds()).unwrap_or(0);
        Ok(TokenResponse::bearer(result?, expires_in))
    }
}

fn status_label<T>(result: &Result<T, TodoError>) -> &'static str {
    if result.is_ok() {
        "success"
    } else {
        "error"
    }
}

fn validate_username(username: &str) -> Result<(), TodoError> {
    let length = username.chars().count();
    if length == 0 || length > MAX_USERNAME_CHARS {
        return Err(TodoError::Validation(format!(
            "Username must be 1-{} characters",
            MAX_USERNAME_CHARS
        )));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), TodoError> {
    if password.is_empty() || password.len() > MAX_PASSWORD_BYTES {
        return Err(TodoError::Validation(format!(
            "Password must be 1-{} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}
