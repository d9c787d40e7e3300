//! Prometheus metrics endpoint handler.
//!
//! Unauthenticated so Prometheus can scrape it. Only bounded-cardinality
//! operational labels are exported; no usernames, ids or tokens.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
///
/// Returns Prometheus text format:
/// ```text
/// # TYPE todo_auth_attempts_total counter
/// todo_auth_attempts_total{operation="login",status="success"} 42
/// ```
#[tracing::instrument(skip_all, name = "todo.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
