//! E2E tests for operational endpoints.

use reqwest::StatusCode;
use todo_test_utils::server_harness::TestTodoServer;
use todo_test_utils::{ALICE_PASSWORD, ALICE_USERNAME};

/// Test that /health answers without authentication.
#[tokio::test]
async fn test_health_returns_ok() -> Result<(), anyhow::Error> {
    let server = TestTodoServer::spawn().await?;

    let response = server
        .client()
        .get(format!("{}/health", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "OK");
    Ok(())
}

/// Test that /metrics answers without authentication and never exposes usernames.
#[tokio::test]
async fn test_metrics_endpoint_is_public_and_anonymous() -> Result<(), anyhow::Error> {
    let server = TestTodoServer::spawn().await?;
    server.signup(ALICE_USERNAME, ALICE_PASSWORD).await?;

    let response = server
        .client()
        .get(format!("{}/metrics", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await?;
    assert!(
        body.contains("todo_auth_attempts_total{operation=\"signup\",status=\"success\"}"),
        "signup attempt should be exported, got:\n{}",
        body
    );
    assert!(body.contains("todo_token_issuance_total"));
    assert!(!body.contains(ALICE_USERNAME));
    Ok(())
}
