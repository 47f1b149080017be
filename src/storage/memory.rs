//! In-memory storage implementation for development and testing
//!
//! Keeps users and todos in memory behind a single `RwLock`, which gives
//! record-level atomicity for every operation. Open sessions are counted so
//! callers can check that every request released its handle.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::*;
use crate::auth::user::{NewUser, User, UserId};
use crate::error::{Result, RustyTodoError};
use crate::todos::model::{NewTodo, Todo, TodoId};

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    usernames: HashMap<String, UserId>,
    todos: BTreeMap<TodoId, Todo>,
    next_user_id: UserId,
    next_todo_id: TodoId,
}

impl Tables {
    fn new() -> Self {
        Self {
            next_user_id: 1,
            next_todo_id: 1,
            ..Default::default()
        }
    }
}

/// In-memory storage backend
pub struct MemoryStorage {
    tables: Arc<RwLock<Tables>>,
    open_sessions: Arc<AtomicUsize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::new())),
            open_sessions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of sessions currently held by requests
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    async fn open_session(&self) -> Result<Box<dyn StorageSession>> {
        let open = self.open_sessions.fetch_add(1, Ordering::SeqCst) + 1;
        log::trace!("Storage session opened ({} open)", open);

        Ok(Box::new(MemorySession {
            tables: self.tables.clone(),
            _lease: SessionLease {
                open_sessions: self.open_sessions.clone(),
            },
        }))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

/// Releases the session slot when dropped
struct SessionLease {
    open_sessions: Arc<AtomicUsize>,
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        let open = self.open_sessions.fetch_sub(1, Ordering::SeqCst) - 1;
        log::trace!("Storage session closed ({} open)", open);
    }
}

/// A request's handle onto the in-memory tables
pub struct MemorySession {
    tables: Arc<RwLock<Tables>>,
    _lease: SessionLease,
}

#[async_trait]
impl UserStorage for MemorySession {
    async fn create_user(&self, user: NewUser) -> Result<UserId> {
        let mut tables = self.tables.write().await;

        if tables.usernames.contains_key(&user.username) {
            return Err(RustyTodoError::DuplicateUsername(user.username));
        }

        let id = tables.next_user_id;
        tables.next_user_id += 1;
        tables.usernames.insert(user.username.clone(), id);
        tables.users.insert(id, user.into_user(id));

        Ok(id)
    }

    async fn get_user(&self, user_id: UserId) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .usernames
            .get(username)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }
}

#[async_trait]
impl TodoStorage for MemorySession {
    async fn insert_todo(&self, todo: NewTodo) -> Result<TodoId> {
        let mut tables = self.tables.write().await;

        let id = tables.next_todo_id;
        tables.next_todo_id += 1;
        tables.todos.insert(id, todo.into_todo(id));

        Ok(id)
    }

    async fn find_todo(&self, todo_id: TodoId, owner_id: UserId) -> Result<Option<Todo>> {
        Ok(self
            .tables
            .read()
            .await
            .todos
            .get(&todo_id)
            .filter(|todo| todo.owner_id == owner_id)
            .cloned())
    }

    async fn list_todos(&self, owner_id: UserId) -> Result<Vec<Todo>> {
        Ok(self
            .tables
            .read()
            .await
            .todos
            .values()
            .filter(|todo| todo.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update_todo(&self, todo: Todo) -> Result<bool> {
        let mut tables = self.tables.write().await;

        match tables.todos.get_mut(&todo.id) {
            Some(stored) if stored.owner_id == todo.owner_id => {
                *stored = todo;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_todo(&self, todo_id: TodoId, owner_id: UserId) -> Result<bool> {
        let mut tables = self.tables.write().await;

        let owned = tables
            .todos
            .get(&todo_id)
            .map_or(false, |todo| todo.owner_id == owner_id);
        if owned {
            tables.todos.remove(&todo_id);
        }
        Ok(owned)
    }
}
