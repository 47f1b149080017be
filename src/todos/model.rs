use serde::{Deserialize, Serialize};

use crate::auth::user::UserId;
use crate::constants::{
    DESCRIPTION_MAX_LEN, DESCRIPTION_MIN_LEN, PRIORITY_MAX, PRIORITY_MIN, TITLE_MAX_LEN,
    TITLE_MIN_LEN,
};
use crate::error::{Result, RustyTodoError};

/// Store-assigned todo identifier
pub type TodoId = u64;

/// A stored todo item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub priority: u8,
    pub complete: bool,
    pub owner_id: UserId,
}

/// A todo before the store assigns its id
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub priority: u8,
    pub complete: bool,
    pub owner_id: UserId,
}

impl NewTodo {
    pub fn into_todo(self, id: TodoId) -> Todo {
        Todo {
            id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            complete: self.complete,
            owner_id: self.owner_id,
        }
    }
}

/// Client payload for creating or updating a todo
#[derive(Debug, Clone, Deserialize)]
pub struct TodoRequest {
    pub title: String,
    pub description: String,
    pub priority: i64,
    pub complete: bool,
}

/// Todo fields that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFields {
    pub title: String,
    pub description: String,
    pub priority: u8,
    pub complete: bool,
}

impl TodoRequest {
    /// Check field bounds; lengths are counted in characters
    pub fn validate(self) -> Result<TodoFields> {
        check_length("title", &self.title, TITLE_MIN_LEN, TITLE_MAX_LEN)?;
        check_length(
            "description",
            &self.description,
            DESCRIPTION_MIN_LEN,
            DESCRIPTION_MAX_LEN,
        )?;

        if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&self.priority) {
            return Err(RustyTodoError::ValidationError(format!(
                "priority must be between {} and {}",
                PRIORITY_MIN, PRIORITY_MAX
            )));
        }

        Ok(TodoFields {
            title: self.title,
            description: self.description,
            priority: self.priority as u8,
            complete: self.complete,
        })
    }
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(RustyTodoError::ValidationError(format!(
            "{} must be between {} and {} characters",
            field, min, max
        )));
    }
    Ok(())
}
