pub mod auth_handler;
pub mod metrics;
pub mod todo_handler;
