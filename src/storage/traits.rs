//! Abstract storage interfaces for pluggable backends
//!
//! A backend hands out one `StorageSession` per request. The session is an
//! owned value: whatever the backend holds for it is released when the
//! session is dropped, on every exit path of the handler that opened it.

use async_trait::async_trait;

use crate::auth::user::{NewUser, User, UserId};
use crate::error::Result;
use crate::todos::model::{NewTodo, Todo, TodoId};

/// User credential storage interface
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Create a new user, failing with `DuplicateUsername` if the name is taken
    async fn create_user(&self, user: NewUser) -> Result<UserId>;

    /// Get user by ID
    async fn get_user(&self, user_id: UserId) -> Result<Option<User>>;

    /// Get user by username
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
}

/// Todo storage interface
///
/// Every lookup by id also takes the owner. There is no unscoped fetch.
#[async_trait]
pub trait TodoStorage: Send + Sync {
    /// Store a new todo
    async fn insert_todo(&self, todo: NewTodo) -> Result<TodoId>;

    /// Get a todo matching both id and owner
    async fn find_todo(&self, todo_id: TodoId, owner_id: UserId) -> Result<Option<Todo>>;

    /// List all todos of an owner, ordered by id
    async fn list_todos(&self, owner_id: UserId) -> Result<Vec<Todo>>;

    /// Replace a todo matching both `todo.id` and `todo.owner_id`; false if none matched
    async fn update_todo(&self, todo: Todo) -> Result<bool>;

    /// Delete a todo matching both id and owner; false if none matched
    async fn delete_todo(&self, todo_id: TodoId, owner_id: UserId) -> Result<bool>;
}

/// A per-request handle onto the store
pub trait StorageSession: UserStorage + TodoStorage {}

impl<T: UserStorage + TodoStorage> StorageSession for T {}

/// Storage backend that hands out request sessions
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Open a session; it is closed when the returned value is dropped
    async fn open_session(&self) -> Result<Box<dyn StorageSession>>;

    /// Health check for the storage backend
    async fn health_check(&self) -> Result<bool>;

    /// Get the provider name for logging/debugging
    fn provider_name(&self) -> &'static str;
}
