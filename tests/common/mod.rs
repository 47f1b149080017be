// Shared fixtures for the integration tests
#![allow(dead_code)]

use argon2::Params;
use serde_json::json;
use std::sync::Arc;

use rusty_todo::auth::{PasswordHasher, TokenManager};
use rusty_todo::storage::MemoryStorage;
use rusty_todo::AppState;

pub const SIGNING_KEY: &str = "Zq8-integration-signing-key-9f7e6d5c4b3a2918";
pub const OTHER_SIGNING_KEY: &str = "Kw3-another-signing-key-for-tests-7a6b5c4d3e2f";

/// Argon2 with the smallest cost the crate accepts
pub fn fast_hasher() -> PasswordHasher {
    PasswordHasher::with_params(Params::new(1024, 1, 1, None).unwrap()).unwrap()
}

/// Application state over a fresh in-memory store
///
/// The store is returned too so tests can inspect open sessions.
pub fn test_state() -> (AppState, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let state = AppState::new(TokenManager::new(SIGNING_KEY), fast_hasher(), storage.clone());
    (state, storage)
}

pub fn registration(username: &str, password: &str) -> serde_json::Value {
    json!({
        "username": username,
        "password": password,
        "email": format!("{}@example.com", username),
        "first_name": "Test",
        "last_name": "User",
        "role": "user",
        "is_active": true
    })
}

pub fn todo_body(
    title: &str,
    description: &str,
    priority: i64,
    complete: bool,
) -> serde_json::Value {
    json!({
        "title": title,
        "description": description,
        "priority": priority,
        "complete": complete
    })
}
