//! PostgreSQL store adapters.
//!
//! Ownership checks live in the `WHERE` clause of the same statement that
//! reads or mutates the row, so update and delete are atomic with respect to
//! the owner check.

use super::collection::{DocumentCollection, OwnerFilter};
use super::users::UserCollection;
use crate::errors::TodoError;
use crate::models::{Todo, TodoFields, User};
use async_trait::async_trait;
use common::types::{TodoId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

/// Row shape of the `todos` table.
#[derive(Debug, sqlx::FromRow)]
struct TodoRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    description: String,
    completed: bool,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: TodoId(row.id),
            owner_id: UserId(row.owner_id),
            title: row.title,
            description: row.description,
            completed: row.completed,
        }
    }
}

/// Row shape of the `users` table.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId(row.id),
            username: row.username,
            password_hash: row.password_hash,
        }
    }
}

/// Todo collection backed by the `todos` table.
#[derive(Clone)]
pub struct PgTodoCollection {
    pool: PgPool,
}

impl PgTodoCollection {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentCollection<Todo> for PgTodoCollection {
    async fn insert(&self, doc: Todo) -> Result<TodoId, TodoError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO todos (id, owner_id, title, description, completed)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(doc.id.0)
        .bind(doc.owner_id.0)
        .bind(&doc.title)
        .bind(&doc.description)
        .bind(doc.completed)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TodoError::Store(format!("Failed to insert todo: {}", e)))?;

        Ok(TodoId(id))
    }

    async fn find_one(&self, filter: &OwnerFilter<TodoId>) -> Result<Option<Todo>, TodoError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, owner_id, title, description, completed
            FROM todos
            WHERE owner_id = $1 AND ($2::uuid IS NULL OR id = $2)
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(filter.owner_id.0)
        .bind(filter.id.map(|id| id.0))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TodoError::Store(format!("Failed to fetch todo: {}", e)))?;

        Ok(row.map(Todo::from))
    }

    async fn find_many(&self, filter: &OwnerFilter<TodoId>) -> Result<Vec<Todo>, TodoError> {
        let rows = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, owner_id, title, description, completed
            FROM todos
            WHERE owner_id = $1 AND ($2::uuid IS NULL OR id = $2)
            ORDER BY created_at
            "#,
        )
        .bind(filter.owner_id.0)
        .bind(filter.id.map(|id| id.0))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TodoError::Store(format!("Failed to list todos: {}", e)))?;

        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn find_one_and_update(
        &self,
        filter: &OwnerFilter<TodoId>,
        patch: TodoFields,
    ) -> Result<Option<Todo>, TodoError> {
        let Some(id) = filter.id else {
            return Err(TodoError::Store(
                "find_one_and_update requires an id".to_string(),
            ));
        };

        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            UPDATE todos
            SET title = $3, description = $4, completed = $5, updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, title, description, completed
            "#,
        )
        .bind(id.0)
        .bind(filter.owner_id.0)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.completed)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TodoError::Store(format!("Failed to update todo: {}", e)))?;

        Ok(row.map(Todo::from))
    }

    async fn find_one_and_delete(
        &self,
        filter: &OwnerFilter<TodoId>,
    ) -> Result<Option<Todo>, TodoError> {
        let Some(id) = filter.id else {
            return Err(TodoError::Store(
                "find_one_and_delete requires an id".to_string(),
            ));
        };

        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            DELETE FROM todos
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, title, description, completed
            "#,
        )
        .bind(id.0)
        .bind(filter.owner_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TodoError::Store(format!("Failed to delete todo: {}", e)))?;

        Ok(row.map(Todo::from))
    }
}

/// User collection backed by the `users` table.
#[derive(Clone)]
pub struct PgUserCollection {
    pool: PgPool,
}

impl PgUserCollection {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserCollection for PgUserCollection {
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, TodoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash
            "#,
        )
        .bind(UserId::new().0)
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // A concurrent signup for the same name loses on the unique constraint
            if e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                TodoError::UserExists
            } else {
                TodoError::Store(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, TodoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TodoError::Store(format!("Failed to fetch user by username: {}", e)))?;

        Ok(row.map(User::from))
    }
}
