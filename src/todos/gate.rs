//! Ownership scoping for todo operations
//!
//! A gate can only be built from a validated `IdentityContext`, and every
//! operation it exposes is filtered by the caller's user id. A todo that
//! exists but belongs to someone else is reported exactly like one that
//! does not exist.

use crate::auth::token::IdentityContext;
use crate::error::{Result, RustyTodoError};
use crate::storage::StorageSession;
use crate::todos::enrichment::{enrich_or_original, Enricher};
use crate::todos::model::{NewTodo, Todo, TodoFields, TodoId};

/// Todo operations scoped to a single caller
pub struct TodoGate<'a> {
    session: &'a dyn StorageSession,
    caller: &'a IdentityContext,
}

impl<'a> TodoGate<'a> {
    pub fn new(session: &'a dyn StorageSession, caller: &'a IdentityContext) -> Self {
        Self { session, caller }
    }

    fn not_found(&self, todo_id: TodoId) -> RustyTodoError {
        log::debug!(
            target: "security",
            "Todo {} not visible to user {}",
            todo_id,
            self.caller.user_id()
        );
        RustyTodoError::NotFound("Todo".to_string())
    }

    /// All todos owned by the caller
    pub async fn list(&self) -> Result<Vec<Todo>> {
        self.session.list_todos(self.caller.user_id()).await
    }

    /// A single todo, if the caller owns it
    pub async fn get(&self, todo_id: TodoId) -> Result<Todo> {
        self.session
            .find_todo(todo_id, self.caller.user_id())
            .await?
            .ok_or_else(|| self.not_found(todo_id))
    }

    /// Create a todo owned by the caller
    ///
    /// The description is offered to the enricher first; its failure never
    /// fails the create.
    pub async fn create(&self, fields: TodoFields, enricher: &dyn Enricher) -> Result<TodoId> {
        let description = enrich_or_original(enricher, &fields.description).await;

        let id = self
            .session
            .insert_todo(NewTodo {
                title: fields.title,
                description,
                priority: fields.priority,
                complete: fields.complete,
                owner_id: self.caller.user_id(),
            })
            .await?;

        log::info!("User {} created todo {}", self.caller.user_id(), id);
        Ok(id)
    }

    /// Overwrite a todo the caller owns with the submitted fields
    pub async fn update(&self, todo_id: TodoId, fields: TodoFields) -> Result<()> {
        let mut todo = self.get(todo_id).await?;

        todo.title = fields.title;
        todo.description = fields.description;
        todo.priority = fields.priority;
        todo.complete = fields.complete;

        if self.session.update_todo(todo).await? {
            Ok(())
        } else {
            Err(self.not_found(todo_id))
        }
    }

    /// Delete a todo the caller owns
    pub async fn delete(&self, todo_id: TodoId) -> Result<()> {
        if self
            .session
            .delete_todo(todo_id, self.caller.user_id())
            .await?
        {
            log::info!("User {} deleted todo {}", self.caller.user_id(), todo_id);
            Ok(())
        } else {
            Err(self.not_found(todo_id))
        }
    }
}
