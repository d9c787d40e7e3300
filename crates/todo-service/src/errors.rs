//! Todo service error types.
//!
//! Every core operation returns `Result<_, TodoError>`. The HTTP mapping lives
//! in the `IntoResponse` impl so that the core never deals with status codes.
//! Messages returned to clients are generic; the underlying cause of
//! internal failures is logged server-side only.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Todo service error type.
///
/// Maps to HTTP status codes:
/// - UserExists: 409 Conflict
/// - InvalidCredentials, Unauthenticated: 401 Unauthorized
/// - NotFound: 404 Not Found
/// - Validation: 400 Bad Request
/// - HashFormat, Store, Crypto, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("User already exists")]
    UserExists,

    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Covers bad signature, expiry, malformed token and unknown subject alike.
    #[error("User not authenticated")]
    Unauthenticated,

    /// Covers both an absent id and an id owned by someone else.
    #[error("Not found")]
    NotFound,

    #[error("Malformed password hash: {0}")]
    HashFormat(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A store acknowledged a write it then could not serve back.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl TodoError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            TodoError::UserExists => StatusCode::CONFLICT,
            TodoError::InvalidCredentials | TodoError::Unauthenticated => StatusCode::UNAUTHORIZED,
            TodoError::NotFound => StatusCode::NOT_FOUND,
            TodoError::Validation(_) => StatusCode::BAD_REQUEST,
            TodoError::HashFormat(_)
            | TodoError::Store(_)
            | TodoError::Crypto(_)
            | TodoError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Unreadable request bodies (bad JSON, missing fields, wrong content type)
/// are client errors and use the same envelope as every other failure.
impl From<JsonRejection> for TodoError {
    fn from(rejection: JsonRejection) -> Self {
        TodoError::Validation(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (code, message) = match &self {
            TodoError::UserExists => ("USER_EXISTS", "User already exists".to_string()),
            TodoError::InvalidCredentials => (
                "INVALID_CREDENTIALS",
                "Invalid username or password".to_string(),
            ),
            TodoError::Unauthenticated => {
                ("UNAUTHENTICATED", "User not authenticated".to_string())
            }
            TodoError::NotFound => ("NOT_FOUND", "Todo not found".to_string()),
            TodoError::Validation(reason) => ("VALIDATION_ERROR", reason.clone()),
            TodoError::HashFormat(err) => {
                tracing::error!(target: "todo.crypto", error = %err, "Stored password hash is malformed");
                ("INTERNAL_ERROR", "An internal error occurred".to_string())
            }
            TodoError::Store(err) => {
                tracing::error!(target: "todo.store", error = %err, "Store operation failed");
                (
                    "STORE_ERROR",
                    "An internal storage error occurred".to_string(),
                )
            }
            TodoError::Crypto(err) => {
                tracing::error!(target: "todo.crypto", error = %err, "Cryptographic operation failed");
                (
                    "CRYPTO_ERROR",
                    "An internal cryptographic error occurred".to_string(),
                )
            }
            TodoError::Internal(err) => {
                tracing::error!(target: "todo.store", error = %err, "Internal consistency failure");
                ("INTERNAL_ERROR", "An internal error occurred".to_string())
            }
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        let mut response = (status, Json(error_response)).into_response();

        // Add WWW-Authenticate header for 401 responses
        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) = "Bearer realm=\"todo-api\"".parse() {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}
