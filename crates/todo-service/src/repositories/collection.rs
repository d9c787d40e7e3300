//! Document collection contract for owned resources.

use crate::errors::TodoError;
use crate::models::{Todo, TodoFields};
use async_trait::async_trait;
use common::types::{TodoId, UserId};
use std::fmt;
use std::hash::Hash;

/// A resource that belongs to exactly one user.
pub trait Owned: Clone + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + fmt::Display + Send + Sync + 'static;

    /// Caller-supplied mutable fields.
    type Fields: Clone + Send + Sync + 'static;

    /// Build a new resource with a fresh id, stamped with `owner_id`.
    fn new_owned(owner_id: UserId, fields: Self::Fields) -> Self;

    fn id(&self) -> Self::Id;

    fn owner_id(&self) -> UserId;

    /// Replace every mutable field. Id and owner never change.
    fn apply(&mut self, fields: Self::Fields);
}

impl Owned for Todo {
    type Id = TodoId;
    type Fields = TodoFields;

    fn new_owned(owner_id: UserId, fields: TodoFields) -> Self {
        Todo {
            id: TodoId::new(),
            owner_id,
            title: fields.title,
            description: fields.description,
            completed: fields.completed,
        }
    }

    fn id(&self) -> TodoId {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.owner_id
    }

    fn apply(&mut self, fields: TodoFields) {
        self.title = fields.title;
        self.description = fields.description;
        self.completed = fields.completed;
    }
}

/// Selects documents by owner, optionally narrowed to one id.
///
/// There is no way to build a filter without an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerFilter<Id> {
    pub owner_id: UserId,
    pub id: Option<Id>,
}

impl<Id: Copy + Eq> OwnerFilter<Id> {
    /// Every document owned by `owner_id`.
    pub fn owned_by(owner_id: UserId) -> Self {
        Self { owner_id, id: None }
    }

    /// The single document `id`, only if owned by `owner_id`.
    pub fn by_id(owner_id: UserId, id: Id) -> Self {
        Self {
            owner_id,
            id: Some(id),
        }
    }

    pub fn matches<R: Owned<Id = Id>>(&self, doc: &R) -> bool {
        doc.owner_id() == self.owner_id && self.id.map_or(true, |id| doc.id() == id)
    }
}

/// Persistent document store for one resource type.
///
/// `find_one_and_update` and `find_one_and_delete` must match and mutate in
/// a single atomic step.
#[async_trait]
pub trait DocumentCollection<R: Owned>: Send + Sync {
    async fn insert(&self, doc: R) -> Result<R::Id, TodoError>;

    async fn find_one(&self, filter: &OwnerFilter<R::Id>) -> Result<Option<R>, TodoError>;

    async fn find_many(&self, filter: &OwnerFilter<R::Id>) -> Result<Vec<R>, TodoError>;

    /// Apply `patch` to the first match and return the updated document.
    async fn find_one_and_update(
        &self,
        filter: &OwnerFilter<R::Id>,
        patch: R::Fields,
    ) -> Result<Option<R>, TodoError>;

    /// Remove the first match and return it.
    async fn find_one_and_delete(&self, filter: &OwnerFilter<R::Id>)
        -> Result<Option<R>, TodoError>;
}
