//! Store contracts and their adapters.
//!
//! The core only talks to the traits in [`collection`] and [`users`]. Two
//! adapters implement them: [`postgres`] for deployments and [`memory`] for
//! tests and database-less local runs.

pub mod collection;
pub mod memory;
pub mod postgres;
pub mod users;

pub use collection::{DocumentCollection, OwnerFilter, Owned};
pub use users::UserCollection;
