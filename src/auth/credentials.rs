//! Registration and login against the credential store

use std::sync::Arc;

use crate::auth::password::PasswordHasher;
use crate::auth::user::{CreateUserRequest, NewUser, User, UserId};
use crate::error::{Result, RustyTodoError};
use crate::storage::UserStorage;

// Argon2 runs on the blocking pool, never on the async workers
async fn hash_blocking(hasher: &Arc<PasswordHasher>, password: String) -> Result<String> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| RustyTodoError::SystemError(format!("Hashing task failed: {}", e)))?
}

async fn verify_blocking(
    hasher: &Arc<PasswordHasher>,
    password: String,
    digest: Option<String>,
) -> Result<bool> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || match digest {
        Some(digest) => hasher.verify(&password, &digest),
        None => hasher.verify_dummy(&password),
    })
    .await
    .map_err(|e| RustyTodoError::SystemError(format!("Verification task failed: {}", e)))
}

/// Create a user record with a hashed password
pub async fn register<S>(
    store: &S,
    hasher: &Arc<PasswordHasher>,
    request: CreateUserRequest,
) -> Result<UserId>
where
    S: UserStorage + ?Sized,
{
    if request.username.trim().is_empty() {
        return Err(RustyTodoError::ValidationError("username must not be empty".to_string()));
    }
    if request.password.is_empty() {
        return Err(RustyTodoError::ValidationError("password must not be empty".to_string()));
    }

    let hashed_password = hash_blocking(hasher, request.password).await?;
    let user = NewUser {
        username: request.username,
        email: request.email,
        first_name: request.first_name,
        last_name: request.last_name,
        hashed_password,
        role: request.role,
        is_active: request.is_active,
    };

    let username = user.username.clone();
    let id = store.create_user(user).await.map_err(|e| {
        if let RustyTodoError::DuplicateUsername(_) = e {
            log::info!(target: "security", "Registration rejected: username {} taken", username);
        }
        e
    })?;

    log::info!("Registered user {} with id {}", username, id);
    Ok(id)
}

/// Check a username/password pair
///
/// Unknown usernames still pay for one verification so the two failure
/// cases are indistinguishable.
pub async fn authenticate<S>(
    store: &S,
    hasher: &Arc<PasswordHasher>,
    username: &str,
    password: &str,
) -> Result<User>
where
    S: UserStorage + ?Sized,
{
    let user = store.get_user_by_username(username).await?;
    let digest = user.as_ref().map(|u| u.hashed_password.clone());

    let verified = verify_blocking(hasher, password.to_string(), digest).await?;
    match user {
        Some(user) if verified => {
            log::debug!(target: "security", "User {} authenticated", user.id);
            Ok(user)
        }
        _ => {
            log::warn!(target: "security", "Failed login attempt for username {}", username);
            Err(RustyTodoError::InvalidCredentials)
        }
    }
}
