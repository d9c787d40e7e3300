pub mod auth_service;
pub mod authenticator;
pub mod ownership_store;

pub use auth_service::AuthService;
pub use authenticator::Authenticator;
pub use ownership_store::{OwnershipStore, TodoStore};
