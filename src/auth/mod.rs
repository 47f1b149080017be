//! Authentication and authorization module

pub mod credentials;
pub mod password;
pub mod session;
pub mod token;
pub mod user;

// Re-export main components
pub use password::PasswordHasher;
pub use token::{Claims, IdentityContext, TokenError, TokenManager};
pub use user::{CreateUserRequest, User, UserId, UserRole};
