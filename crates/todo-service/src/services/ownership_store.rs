//! Ownership-scoped CRUD.
//!
//! Every operation takes the caller's [`UserId`] and folds it into the store
//! filter. An id that does not exist and an id owned by someone else produce
//! the same `TodoError::NotFound`, so callers cannot discover other users'
//! resources.

use crate::errors::TodoError;
use crate::models::Todo;
use crate::observability::metrics;
use crate::repositories::{DocumentCollection, Owned, OwnerFilter};
use common::types::UserId;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// CRUD over owned resources of type `R`.
pub struct OwnershipStore<R: Owned> {
    collection: Arc<dyn DocumentCollection<R>>,
}

/// Ownership store for todo items.
pub type TodoStore = OwnershipStore<Todo>;

impl<R: Owned> Clone for OwnershipStore<R> {
    fn clone(&self) -> Self {
        Self {
            collection: Arc::clone(&self.collection),
        }
    }
}

impl<R: Owned> OwnershipStore<R> {
    pub fn new(collection: Arc<dyn DocumentCollection<R>>) -> Self {
        Self { collection }
    }

    /// Store a new resource owned by `owner_id` and return it as persisted.
    #[instrument(skip_all, fields(owner_id = %owner_id))]
    pub async fn create(&self, owner_id: UserId, fields: R::Fields) -> Result<R, TodoError> {
        let start = Instant::now();
        let result = async {
            let id = self.collection.insert(R::new_owned(owner_id, fields)).await?;
            self.collection
                .find_one(&OwnerFilter::by_id(owner_id, id))
                .await?
                .ok_or_else(|| {
                    TodoError::Internal(format!("inserted document {} not readable", id))
                })
        }
        .await;
        record("create", start, &result);

        if let Ok(doc) = &result {
            tracing::debug!(target: "todo.store", id = %doc.id(), "Resource created");
        }
        result
    }

    /// Fetch one resource, only if `owner_id` owns it.
    #[instrument(skip_all, fields(owner_id = %owner_id, id = %id))]
    pub async fn get(&self, owner_id: UserId, id: R::Id) -> Result<R, TodoError> {
        let start = Instant::now();
        let result = self
            .collection
            .find_one(&OwnerFilter::by_id(owner_id, id))
            .await
            .and_then(|doc| doc.ok_or(TodoError::NotFound));
        record("get", start, &result);
        result
    }

    /// All resources owned by `owner_id`, in store order.
    #[instrument(skip_all, fields(owner_id = %owner_id))]
    pub async fn list(&self, owner_id: UserId) -> Result<Vec<R>, TodoError> {
        let start = Instant::now();
        let result = self
            .collection
            .find_many(&OwnerFilter::owned_by(owner_id))
            .await;
        record("list", start, &result);
        result
    }

    /// Replace the mutable fields of one resource in a single atomic step.
    #[instrument(skip_all, fields(owner_id = %owner_id, id = %id))]
    pub async fn update(
        &self,
        owner_id: UserId,
        id: R::Id,
        fields: R::Fields,
    ) -> Result<R, TodoError> {
        let start = Instant::now();
        let result = self
            .collection
            .find_one_and_update(&OwnerFilter::by_id(owner_id, id), fields)
            .await
            .and_then(|doc| doc.ok_or(TodoError::NotFound));
        record("update", start, &result);
        result
    }

    /// Remove one resource in a single atomic step.
    #[instrument(skip_all, fields(owner_id = %owner_id, id = %id))]
    pub async fn delete(&self, owner_id: UserId, id: R::Id) -> Result<(), TodoError> {
        let start = Instant::now();
        let result = self
            .collection
            .find_one_and_delete(&OwnerFilter::by_id(owner_id, id))
            .await
            .and_then(|doc| doc.map(|_| ()).ok_or(TodoError::NotFound));
        record("delete", start, &result);

        if result.is_ok() {
            tracing::debug!(target: "todo.store", "Resource deleted");
        }
        result
    }
}

fn record<T>(operation: &'static str, start: Instant, result: &Result<T, TodoError>) {
    let status = match result {
        Ok(_) => "success",
        Err(TodoError::NotFound) => "not_found",
        Err(_) => "error",
    };
    metrics::record_store_operation(operation, status, start.elapsed());
}
