//! E2E tests for ownership-scoped todo CRUD.
//!
//! One user can never observe or mutate another user's todos, and a foreign
//! id is reported exactly like an id that does not exist.

use reqwest::StatusCode;
use serde_json::json;
use todo_test_utils::server_harness::TestTodoServer;
use todo_test_utils::{ALICE_PASSWORD, ALICE_USERNAME, BOB_PASSWORD, BOB_USERNAME};

fn todo_url(server: &TestTodoServer, id: &str) -> String {
    format!("{}/todo/{}", server.url(), id)
}

fn id_of(todo: &serde_json::Value) -> Result<String, anyhow::Error> {
    todo["id"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("todo has no id: {}", todo))
}

/// Test the full create/read/update/delete cycle for one owner.
#[tokio::test]
async fn test_todo_crud_happy_path() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestTodoServer::spawn().await?;
    let token = server.signup(ALICE_USERNAME, ALICE_PASSWORD).await?;

    // Create
    let response = server
        .client()
        .post(format!("{}/todo", server.url()))
        .bearer_auth(&token)
        .json(&json!({"title": "x", "description": "first", "completed": false}))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "success");
    assert!(body["data"].get("owner_id").is_none(), "owner must not be echoed");
    let id = id_of(&body["data"])?;

    // Read
    let response = server
        .client()
        .get(todo_url(&server, &id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["data"]["title"], "x");
    assert_eq!(body["data"]["description"], "first");

    // Update
    let response = server
        .client()
        .patch(todo_url(&server, &id))
        .bearer_auth(&token)
        .json(&json!({"title": "y", "description": "second", "completed": true}))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["data"]["id"].as_str(), Some(id.as_str()));
    assert_eq!(body["data"]["title"], "y");
    assert_eq!(body["data"]["completed"], true);

    // List
    let response = server
        .client()
        .get(format!("{}/todo", server.url()))
        .bearer_auth(&token)
        .send()
        .await?;
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    // Delete
    let response = server
        .client()
        .delete(todo_url(&server, &id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = server
        .client()
        .get(todo_url(&server, &id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Test the alice/bob scenario: bob cannot see, change or delete alice's todo.
#[tokio::test]
async fn test_cross_owner_access_is_not_found() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestTodoServer::spawn().await?;
    let alice = server.signup(ALICE_USERNAME, ALICE_PASSWORD).await?;
    let bob = server.signup(BOB_USERNAME, BOB_PASSWORD).await?;
    let todo = server.create_todo(&alice, "x").await?;
    let id = id_of(&todo)?;

    // Act + Assert: every bob operation on alice's id is 404
    let get = server
        .client()
        .get(todo_url(&server, &id))
        .bearer_auth(&bob)
        .send()
        .await?;
    assert_eq!(get.status(), StatusCode::NOT_FOUND);

    let patch = server
        .client()
        .patch(todo_url(&server, &id))
        .bearer_auth(&bob)
        .json(&json!({"title": "pwned", "description": "", "completed": true}))
        .send()
        .await?;
    assert_eq!(patch.status(), StatusCode::NOT_FOUND);

    let delete = server
        .client()
        .delete(todo_url(&server, &id))
        .bearer_auth(&bob)
        .send()
        .await?;
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);

    let list = server
        .client()
        .get(format!("{}/todo", server.url()))
        .bearer_auth(&bob)
        .send()
        .await?;
    let list: serde_json::Value = list.json().await?;
    assert_eq!(list["data"], json!([]));

    // Alice still sees her todo, untouched
    let response = server
        .client()
        .get(todo_url(&server, &id))
        .bearer_auth(&alice)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["data"]["title"], "x");
    assert_eq!(body["data"]["completed"], false);

    // Alice deletes it; afterwards it is gone for her too
    let response = server
        .client()
        .delete(todo_url(&server, &id))
        .bearer_auth(&alice)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = server
        .client()
        .get(todo_url(&server, &id))
        .bearer_auth(&alice)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Test that foreign, absent and malformed ids produce byte-identical responses.
#[tokio::test]
async fn test_foreign_and_absent_ids_indistinguishable() -> Result<(), anyhow::Error> {
    let server = TestTodoServer::spawn().await?;
    let alice = server.signup(ALICE_USERNAME, ALICE_PASSWORD).await?;
    let bob = server.signup(BOB_USERNAME, BOB_PASSWORD).await?;
    let id = id_of(&server.create_todo(&alice, "x").await?)?;

    let mut bodies = Vec::new();
    for candidate in [
        id.as_str(),
        "00000000-0000-0000-0000-000000000000",
        "507f1f77bcf86cd799439011",
    ] {
        let response = server
            .client()
            .get(todo_url(&server, candidate))
            .bearer_auth(&bob)
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "candidate {}", candidate);
        bodies.push(response.text().await?);
    }

    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
    Ok(())
}

/// Test that a store outage is a 500 with a generic message.
#[tokio::test]
async fn test_store_outage_is_internal_error() -> Result<(), anyhow::Error> {
    let server = TestTodoServer::spawn().await?;
    let alice = server.signup(ALICE_USERNAME, ALICE_PASSWORD).await?;

    server.todo_store().set_unavailable(true);

    let response = server
        .client()
        .get(format!("{}/todo", server.url()))
        .bearer_auth(&alice)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "STORE_ERROR");
    assert!(!body.to_string().contains("unavailable"));
    Ok(())
}
