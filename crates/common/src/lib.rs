//! Common utilities and types shared across the todo service crates.

#![warn(clippy::pedantic)]

/// Module for identifier newtypes
pub mod types;

/// Module for the injectable wall clock
pub mod clock;

/// Module for secret types that prevent accidental logging
pub mod secret;
