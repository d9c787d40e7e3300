//! Metric definitions for the todo service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `todo_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded by code:
//! - `operation`: signup, login, create, get, list, update, delete
//! - `status`: success, error, not_found (store operations only)
//! - `error_category`: signature_invalid, expired, malformed, none

use metrics::{counter, histogram};
use std::time::Duration;

// ============================================================================
// Token Metrics
// ============================================================================

/// Record token issuance duration and outcome
///
/// Metric: `todo_token_issuance_total`, `todo_token_issuance_duration_seconds`
/// Labels: `operation`, `status`
pub fn record_token_issuance(operation: &'static str, status: &'static str, duration: Duration) {
    histogram!("todo_token_issuance_duration_seconds", "operation" => operation, "status" => status)
        .record(duration.as_secs_f64());

    counter!("todo_token_issuance_total", "operation" => operation, "status" => status)
        .increment(1);
}

/// Record token validation result
///
/// Metric: `todo_token_validations_total`
/// Labels: `status`, `error_category`
pub fn record_token_validation(status: &'static str, error_category: Option<&'static str>) {
    let category = error_category.unwrap_or("none");
    counter!("todo_token_validations_total", "status" => status, "error_category" => category)
        .increment(1);
}

// ============================================================================
// Authentication Metrics
// ============================================================================

/// Record a signup or login attempt
///
/// Metric: `todo_auth_attempts_total`
/// Labels: `operation`, `status`
pub fn record_auth_attempt(operation: &'static str, status: &'static str) {
    counter!("todo_auth_attempts_total", "operation" => operation, "status" => status)
        .increment(1);
}

// ============================================================================
// Store Metrics
// ============================================================================

/// Record an ownership-scoped store operation
///
/// Metric: `todo_store_operations_total`, `todo_store_operation_duration_seconds`
/// Labels: `operation`, `status`
pub fn record_store_operation(operation: &'static str, status: &'static str, duration: Duration) {
    histogram!("todo_store_operation_duration_seconds", "operation" => operation)
        .record(duration.as_secs_f64());

    counter!("todo_store_operations_total", "operation" => operation, "status" => status)
        .increment(1);
}

/// Counter lookup against a [`DebuggingRecorder`](metrics_util::debugging::DebuggingRecorder)
/// snapshot, shared by unit tests across the crate.
#[cfg(test)]
pub(crate) mod testing {
    use metrics_util::debugging::{DebugValue, Snapshotter};
    use metrics_util::MetricKind;

    /// Sum of every counter named `name` whose labels include all of `labels`.
    pub(crate) fn counter_value(
        snapshotter: &Snapshotter,
        name: &str,
        labels: &[(&str, &str)],
    ) -> u64 {
        snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter_map(|(composite, _, _, value)| {
                let (kind, key) = composite.into_parts();
                let matches = kind == MetricKind::Counter
                    && key.name() == name
                    && labels.iter().all(|(k, v)| {
                        key.labels().any(|label| label.key() == *k && label.value() == *v)
                    });
                match value {
                    DebugValue::Counter(count) if matches => Some(count),
                    _ => None,
                }
            })
            .sum()
    }
}
