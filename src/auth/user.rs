use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned user identifier
pub type UserId = u64;

/// Roles a registered user can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    /// Wire name of the role, as carried in token claims
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    /// Parse a role from its wire name
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(UserRole::Admin),
            "user" => Some(UserRole::User),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user as held by the credential store
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,
    /// Unique login name
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Argon2 PHC string, never the plaintext
    pub hashed_password: String,
    pub role: UserRole,
    pub is_active: bool,
}

// The password hash must never end up in logs
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("hashed_password", &"<redacted>")
            .field("role", &self.role)
            .field("is_active", &self.is_active)
            .finish()
    }
}

/// A user record before the store assigns its id
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub hashed_password: String,
    pub role: UserRole,
    pub is_active: bool,
}

impl NewUser {
    /// Attach the store-assigned id
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            hashed_password: self.hashed_password,
            role: self.role,
            is_active: self.is_active,
        }
    }
}

/// Registration payload accepted by `POST /auth/`
#[derive(Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub is_active: bool,
}
