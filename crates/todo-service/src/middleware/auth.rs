//! Authentication middleware for protected routes.
//!
//! Extracts the Bearer token from the Authorization header, resolves it to a
//! [`User`](crate::models::User) through the [`Authenticator`], and stores the user in request
//! extensions for handlers.

use crate::errors::TodoError;
use crate::services::Authenticator;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

/// Authentication middleware.
///
/// # Authorization Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Response
///
/// - 401 Unauthorized with WWW-Authenticate header if the header is missing,
///   malformed, or the token does not resolve to a user
/// - Otherwise continues with the user in request extensions
#[instrument(skip_all, name = "todo.middleware.auth")]
pub async fn require_auth(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, TodoError> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!(target: "todo.middleware.auth", "Missing Authorization header");
            TodoError::Unauthenticated
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::debug!(target: "todo.middleware.auth", "Invalid Authorization header format");
        TodoError::Unauthenticated
    })?;

    let user = authenticator.authenticate(token.trim()).await?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::AuthSettings;
    use crate::crypto::TokenService;
    use crate::models::User;
    use crate::repositories::memory::MemoryUserCollection;
    use crate::repositories::UserCollection;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Extension, Router};
    use common::clock::SystemClock;
    use common::secret::SecretString;
    use jsonwebtoken::Algorithm;
    use tower::ServiceExt;

    async fn app() -> (Router, Arc<TokenService>) {
        let settings = AuthSettings::new(
            SecretString::from("0123456789abcdef0123456789abcdef"),
            Algorithm::HS256,
            chrono::Duration::minutes(15),
            10,
        )
        .unwrap();
        let tokens = Arc::new(TokenService::new(&settings, Arc::new(SystemClock)));
        let users = Arc::new(MemoryUserCollection::new());
        users.insert("alice", "hash").await.unwrap();

        let authenticator = Arc::new(Authenticator::new(tokens.clone(), users));
        let router = Router::new()
            .route(
                "/whoami",
                get(|Extension(user): Extension<User>| async move { user.username }),
            )
            .layer(middleware::from_fn_with_state(authenticator, require_auth));

        (router, tokens)
    }

    fn request(auth: Option<&str>) -> Request<Body> {
        let mut builder = axum::http::Request::builder().uri("/whoami");
        if let Some(value) = auth {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let (app, tokens) = app().await;
        let token = tokens.issue("alice").unwrap();

        let response = app
            .oneshot(request(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_header_is_401() {
        let (app, _) = app().await;
        let response = app.oneshot(request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key("www-authenticate"));
    }

    #[tokio::test]
    async fn test_wrong_scheme_is_401() {
        let (app, tokens) = app().await;
        let token = tokens.issue("alice").unwrap();

        let response = app
            .oneshot(request(Some(&format!("Basic {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_subject_is_401() {
        let (app, tokens) = app().await;
        let token = tokens.issue("ghost").unwrap();

        let response = app
            .oneshot(request(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
