//! E2E tests for signup and login.
//!
//! ## Test Naming
//!
//! Tests follow the convention: `test_<feature>_<scenario>`

use reqwest::StatusCode;
use serde_json::json;
use todo_test_utils::server_harness::TestTodoServer;
use todo_test_utils::{
    TokenAssertions, ALICE_PASSWORD, ALICE_USERNAME, TEST_TOKEN_TTL_SECONDS,
};

// ============================================================================
// Signup
// ============================================================================

/// Test that signup returns 201 with a bearer token for the new user.
#[tokio::test]
async fn test_signup_happy_path() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestTodoServer::spawn().await?;

    // Act
    let response = server
        .client()
        .post(format!("{}/signup", server.url()))
        .json(&json!({"username": ALICE_USERNAME, "password": ALICE_PASSWORD}))
        .send()
        .await?;

    // Assert
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["token_type"].as_str(), Some("bearer"));
    assert_eq!(
        body["expires_in"].as_i64(),
        Some(TEST_TOKEN_TTL_SECONDS)
    );

    let token = body["access_token"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("missing access_token"))?
        .to_string();
    token
        .assert_valid_jwt()
        .assert_algorithm("HS256")
        .assert_for_subject(ALICE_USERNAME)
        .assert_expires_in(TEST_TOKEN_TTL_SECONDS);

    Ok(())
}

/// Test that a second signup with the same username is rejected with 409.
#[tokio::test]
async fn test_signup_duplicate_username_conflict() -> Result<(), anyhow::Error> {
    let server = TestTodoServer::spawn().await?;
    server.signup(ALICE_USERNAME, ALICE_PASSWORD).await?;

    let response = server
        .client()
        .post(format!("{}/signup", server.url()))
        .json(&json!({"username": ALICE_USERNAME, "password": "different"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "USER_EXISTS");
    Ok(())
}

/// Test that an empty username is a 400 validation error.
#[tokio::test]
async fn test_signup_empty_username_rejected() -> Result<(), anyhow::Error> {
    let server = TestTodoServer::spawn().await?;

    let response = server
        .client()
        .post(format!("{}/signup", server.url()))
        .json(&json!({"username": "   ", "password": ALICE_PASSWORD}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    Ok(())
}

// ============================================================================
// Login
// ============================================================================

/// Test that login after signup returns a token that authenticates.
#[tokio::test]
async fn test_login_happy_path() -> Result<(), anyhow::Error> {
    let server = TestTodoServer::spawn().await?;
    server.signup(ALICE_USERNAME, ALICE_PASSWORD).await?;

    let token = server.login(ALICE_USERNAME, ALICE_PASSWORD).await?;
    token.assert_valid_jwt().assert_for_subject(ALICE_USERNAME);

    let response = server
        .client()
        .get(format!("{}/todo", server.url()))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

/// Test that wrong password and unknown user produce identical 401 responses.
#[tokio::test]
async fn test_login_failures_are_indistinguishable() -> Result<(), anyhow::Error> {
    let server = TestTodoServer::spawn().await?;
    server.signup(ALICE_USERNAME, ALICE_PASSWORD).await?;

    let wrong_password = server
        .client()
        .post(format!("{}/login", server.url()))
        .json(&json!({"username": ALICE_USERNAME, "password": "wrong"}))
        .send()
        .await?;
    let unknown_user = server
        .client()
        .post(format!("{}/login", server.url()))
        .json(&json!({"username": "nobody", "password": "wrong"}))
        .send()
        .await?;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let wrong_password: serde_json::Value = wrong_password.json().await?;
    let unknown_user: serde_json::Value = unknown_user.json().await?;
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password["error"]["code"], "INVALID_CREDENTIALS");
    Ok(())
}

/// Test that a token signed with another secret is rejected on protected routes.
#[tokio::test]
async fn test_foreign_token_rejected() -> Result<(), anyhow::Error> {
    let server = TestTodoServer::spawn().await?;
    server.signup(ALICE_USERNAME, ALICE_PASSWORD).await?;

    let forged = todo_test_utils::TestTokenBuilder::new()
        .for_user(ALICE_USERNAME)
        .at(server.now())
        .signed_with(todo_test_utils::FOREIGN_SIGNING_SECRET)
        .sign();

    let response = server
        .client()
        .get(format!("{}/todo", server.url()))
        .bearer_auth(&forged)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("www-authenticate"));
    Ok(())
}
