//! In-memory store adapters.
//!
//! Used by tests and by the server when no `DATABASE_URL` is configured.
//! Every find-and-modify runs under a single write guard, which gives the same
//! atomicity the Postgres adapter gets from a single statement.

use super::collection::{DocumentCollection, OwnerFilter, Owned};
use super::users::UserCollection;
use crate::errors::TodoError;
use crate::models::User;
use async_trait::async_trait;
use common::types::UserId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-memory collection for any owned resource. Keeps insertion order.
pub struct MemoryCollection<R: Owned> {
    docs: RwLock<Vec<R>>,
    unavailable: AtomicBool,
}

impl<R: Owned> MemoryCollection<R> {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail with `TodoError::Store`, as if the
    /// backing database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Total number of documents across all owners.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), TodoError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TodoError::Store("memory store marked unavailable".to_string()));
        }
        Ok(())
    }
}

impl<R: Owned> Default for MemoryCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Owned> DocumentCollection<R> for MemoryCollection<R> {
    async fn insert(&self, doc: R) -> Result<R::Id, TodoError> {
        self.check_available()?;
        let id = doc.id();
        let mut docs = self.docs.write().await;
        if docs.iter().any(|existing| existing.id() == id) {
            return Err(TodoError::Store(format!("duplicate document id {}", id)));
        }
        docs.push(doc);
        Ok(id)
    }

    async fn find_one(&self, filter: &OwnerFilter<R::Id>) -> Result<Option<R>, TodoError> {
        self.check_available()?;
        let docs = self.docs.read().await;
        Ok(docs.iter().find(|doc| filter.matches(*doc)).cloned())
    }

    async fn find_many(&self, filter: &OwnerFilter<R::Id>) -> Result<Vec<R>, TodoError> {
        self.check_available()?;
        let docs = self.docs.read().await;
        Ok(docs
            .iter()
            .filter(|doc| filter.matches(*doc))
            .cloned()
            .collect())
    }

    async fn find_one_and_update(
        &self,
        filter: &OwnerFilter<R::Id>,
        patch: R::Fields,
    ) -> Result<Option<R>, TodoError> {
        self.check_available()?;
        let mut docs = self.docs.write().await;
        Ok(docs.iter_mut().find(|doc| filter.matches(&**doc)).map(|doc| {
            doc.apply(patch);
            doc.clone()
        }))
    }

    async fn find_one_and_delete(
        &self,
        filter: &OwnerFilter<R::Id>,
    ) -> Result<Option<R>, TodoError> {
        self.check_available()?;
        let mut docs = self.docs.write().await;
        let position = docs.iter().position(|doc| filter.matches(doc));
        Ok(position.map(|index| docs.remove(index)))
    }
}

/// In-memory user accounts keyed by username.
#[derive(Default)]
pub struct MemoryUserCollection {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserCollection for MemoryUserCollection {
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, TodoError> {
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(TodoError::UserExists);
        }

        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.insert(username.to_string(), user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, TodoError> {
        Ok(self.users.read().await.get(username).cloned())
    }
}
