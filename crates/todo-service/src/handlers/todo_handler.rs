//! Todo CRUD endpoints.
//!
//! All handlers run behind `require_auth` and act on behalf of the user
//! it placed in the request extensions.

use crate::errors::TodoError;
use crate::models::{DataEnvelope, TodoFields, TodoResponse, User};
use crate::routes::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use common::types::TodoId;
use std::sync::Arc;
use tracing::instrument;

/// Path ids that are not UUIDs cannot name any todo, so they are NotFound too.
fn parse_todo_id(raw: &str) -> Result<TodoId, TodoError> {
    raw.parse().map_err(|_| TodoError::NotFound)
}

/// Handler for GET /todo
#[instrument(skip_all, name = "todo.list")]
pub async fn list_todos(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<DataEnvelope<Vec<TodoResponse>>>, TodoError> {
    let todos = state.todos.list(user.id).await?;
    let data = todos.into_iter().map(TodoResponse::from).collect();
    Ok(Json(DataEnvelope::success(data)))
}

/// Handler for POST /todo
#[instrument(skip_all, name = "todo.create")]
pub async fn create_todo(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    payload: Result<Json<TodoFields>, JsonRejection>,
) -> Result<(StatusCode, Json<DataEnvelope<TodoResponse>>), TodoError> {
    let Json(fields) = payload?;
    let todo = state.todos.create(user.id, fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataEnvelope::success(TodoResponse::from(todo))),
    ))
}

/// Handler for GET /todo/:id
#[instrument(skip_all, name = "todo.get")]
pub async fn get_todo(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<DataEnvelope<TodoResponse>>, TodoError> {
    let id = parse_todo_id(&id)?;
    let todo = state.todos.get(user.id, id).await?;
    Ok(Json(DataEnvelope::success(TodoResponse::from(todo))))
}

/// Handler for PATCH /todo/:id
///
/// Replaces title, description and completed in one step.
#[instrument(skip_all, name = "todo.update")]
pub async fn update_todo(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    payload: Result<Json<TodoFields>, JsonRejection>,
) -> Result<Json<DataEnvelope<TodoResponse>>, TodoError> {
    let id = parse_todo_id(&id)?;
    let Json(fields) = payload?;
    let todo = state.todos.update(user.id, id, fields).await?;
    Ok(Json(DataEnvelope::success(TodoResponse::from(todo))))
}

/// Handler for DELETE /todo/:id
#[instrument(skip_all, name = "todo.delete")]
pub async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<StatusCode, TodoError> {
    let id = parse_todo_id(&id)?;
    state.todos.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
