//! Rusty Todo - A small todo service with JWT authentication
//!
//! This library provides credential storage, password hashing, signed
//! access tokens, and an ownership gate that scopes every todo operation
//! to the caller who owns it.

pub mod auth;
pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod handlers;
pub mod security;
pub mod storage;
pub mod todos;

// Re-export main components
pub use config::*;
pub use constants::*;
pub use crate::core::AppState;
pub use handlers::routes;
