//! HTTP routes for the todo service.
//!
//! Defines the Axum router and application state.

use crate::config::AuthSettings;
use crate::crypto::{PasswordHasher, TokenService};
use crate::errors::TodoError;
use crate::handlers::{auth_handler, metrics::metrics_handler, todo_handler};
use crate::middleware::auth::require_auth;
use crate::models::Todo;
use crate::repositories::{DocumentCollection, UserCollection};
use crate::services::{AuthService, Authenticator, TodoStore};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use common::clock::Clock;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Signup and login.
    pub auth: AuthService,

    /// Token to user resolution for protected routes.
    pub authenticator: Arc<Authenticator>,

    /// Ownership-scoped todo CRUD.
    pub todos: TodoStore,
}

impl AppState {
    /// Wire the core components over the given stores.
    pub fn new(
        settings: &AuthSettings,
        clock: Arc<dyn Clock>,
        users: Arc<dyn UserCollection>,
        todos: Arc<dyn DocumentCollection<Todo>>,
    ) -> Result<Self, TodoError> {
        let tokens = Arc::new(TokenService::new(settings, clock));
        let hasher = PasswordHasher::new(settings)?;

        Ok(Self {
            auth: AuthService::new(Arc::clone(&users), hasher, Arc::clone(&tokens)),
            authenticator: Arc::new(Authenticator::new(tokens, users)),
            todos: TodoStore::new(todos),
        })
    }
}

/// Install the global Prometheus recorder.
///
/// Fails if a recorder is already installed in this process.
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {}", e))
}

/// Build the application routes.
///
/// - `/signup`, `/login` - account endpoints
/// - `/todo`, `/todo/:id` - todo CRUD, behind `require_auth`
/// - `/health` - liveness
/// - `/metrics` - Prometheus scrape
/// - TraceLayer for request logging
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let protected_routes = Router::new()
        .route(
            "/todo",
            get(todo_handler::list_todos).post(todo_handler::create_todo),
        )
        .route(
            "/todo/:id",
            get(todo_handler::get_todo)
                .patch(todo_handler::update_todo)
                .delete(todo_handler::delete_todo),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.authenticator),
            require_auth,
        ))
        .with_state(Arc::clone(&state));

    let public_routes = Router::new()
        .route("/signup", post(auth_handler::handle_signup))
        .route("/login", post(auth_handler::handle_login))
        .route("/health", get(health_check))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    public_routes
        .merge(protected_routes)
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}

async fn health_check() -> &'static str {
    "OK"
}
