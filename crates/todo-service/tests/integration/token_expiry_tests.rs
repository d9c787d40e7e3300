//! E2E tests for token lifetime, driven by the server's mock clock.

use reqwest::StatusCode;
use todo_test_utils::server_harness::TestTodoServer;
use todo_test_utils::{
    TestTokenBuilder, ALICE_PASSWORD, ALICE_USERNAME, TEST_TOKEN_TTL_SECONDS,
};

async fn list_status(server: &TestTodoServer, token: &str) -> Result<StatusCode, anyhow::Error> {
    let response = server
        .client()
        .get(format!("{}/todo", server.url()))
        .bearer_auth(token)
        .send()
        .await?;
    Ok(response.status())
}

/// Test that a token is accepted until just before expiry and rejected from then on.
#[tokio::test]
async fn test_token_valid_until_expiry() -> Result<(), anyhow::Error> {
    let server = TestTodoServer::spawn().await?;
    let token = server.signup(ALICE_USERNAME, ALICE_PASSWORD).await?;

    assert_eq!(list_status(&server, &token).await?, StatusCode::OK);

    server.advance_clock(chrono::Duration::seconds(TEST_TOKEN_TTL_SECONDS - 1));
    assert_eq!(list_status(&server, &token).await?, StatusCode::OK);

    server.advance_clock(chrono::Duration::seconds(1));
    assert_eq!(list_status(&server, &token).await?, StatusCode::UNAUTHORIZED);

    // Expiry is irreversible for this token; logging in again issues a fresh one
    let fresh = server.login(ALICE_USERNAME, ALICE_PASSWORD).await?;
    assert_eq!(list_status(&server, &fresh).await?, StatusCode::OK);
    assert_eq!(list_status(&server, &token).await?, StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Test that a crafted, already-expired token is rejected.
#[tokio::test]
async fn test_expired_crafted_token_rejected() -> Result<(), anyhow::Error> {
    let server = TestTodoServer::spawn().await?;
    server.signup(ALICE_USERNAME, ALICE_PASSWORD).await?;

    let token = TestTokenBuilder::new()
        .for_user(ALICE_USERNAME)
        .at(server.now())
        .expires_in(-60)
        .sign();

    assert_eq!(list_status(&server, &token).await?, StatusCode::UNAUTHORIZED);
    Ok(())
}

/// Test that a crafted token with the right secret and no subject is rejected.
#[tokio::test]
async fn test_token_without_subject_rejected() -> Result<(), anyhow::Error> {
    let server = TestTodoServer::spawn().await?;

    let token = TestTokenBuilder::new()
        .without_subject()
        .at(server.now())
        .sign();

    assert_eq!(list_status(&server, &token).await?, StatusCode::UNAUTHORIZED);
    Ok(())
}

/// Test that a crafted valid token for a user that never signed up is rejected.
#[tokio::test]
async fn test_token_for_unknown_user_rejected() -> Result<(), anyhow::Error> {
    let server = TestTodoServer::spawn().await?;

    let token = TestTokenBuilder::new()
        .for_user("ghost")
        .at(server.now())
        .sign();

    assert_eq!(list_status(&server, &token).await?, StatusCode::UNAUTHORIZED);
    Ok(())
}
