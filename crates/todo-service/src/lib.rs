//! Todo Service Library
//!
//! Authenticates users and enforces per-owner access control over todo items.
//!
//! # Modules
//!
//! - `config` - Service configuration and the immutable auth settings
//! - `crypto` - Password hashing and signed token issuance/validation
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `middleware` - Bearer token authentication for protected routes
//! - `models` - Data models
//! - `observability` - Log field hashing and metrics
//! - `repositories` - Store contracts and their Postgres / in-memory adapters
//! - `routes` - Router construction and shared application state
//! - `services` - Signup, login, authentication and ownership-scoped CRUD

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
