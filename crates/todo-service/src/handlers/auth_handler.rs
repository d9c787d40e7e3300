//! Signup and login endpoints.

use crate::errors::TodoError;
use crate::models::{CredentialsRequest, TokenResponse};
use crate::routes::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use common::secret::ExposeSecret;
use std::sync::Arc;
use tracing::instrument;

/// Handler for POST /signup
///
/// Creates the account and returns its first token (201 Created).
#[instrument(skip_all, name = "todo.signup")]
pub async fn handle_signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), TodoError> {
    let Json(request) = payload?;
    let response = state
        .auth
        .signup(&request.username, request.password.expose_secret())
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST /login
#[instrument(skip_all, name = "todo.login")]
pub async fn handle_login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, TodoError> {
    let Json(request) = payload?;
    let response = state
        .auth
        .login(&request.username, request.password.expose_secret())
        .await?;

    Ok(Json(response))
}
