use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::TodoError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl FromStr for TodoId {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(TodoId)
            .map_err(|_| TodoError::Validation(format!("invalid todo id: {s:?}")))
    }
}

/// Closed set of states a todo can be in. Any state may move to any other.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TodoStatus {
    pub const ALL: [TodoStatus; 3] = [TodoStatus::Pending, TodoStatus::InProgress, TodoStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Pending => "pending",
            TodoStatus::InProgress => "in_progress",
            TodoStatus::Completed => "completed",
        }
    }

    /// Next status in display order, wrapping around. Used by the terminal front end.
    pub fn cycle(self) -> Self {
        match self {
            TodoStatus::Pending => TodoStatus::InProgress,
            TodoStatus::InProgress => TodoStatus::Completed,
            TodoStatus::Completed => TodoStatus::Pending,
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for TodoStatus {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TodoStatus::Pending),
            "in_progress" => Ok(TodoStatus::InProgress),
            "completed" => Ok(TodoStatus::Completed),
            other => Err(TodoError::Validation(format!(
                "invalid status {other:?}, expected one of: pending, in_progress, completed"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn new(id: TodoId, input: CreateTodo, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the supplied fields only. `updated_at` never moves backwards.
    pub fn apply(&mut self, input: UpdateTodo, now: DateTime<Utc>) {
        if let Some(title) = input.title { self.title = title; }
        if let Some(description) = input.description { self.description = description; }
        if let Some(status) = input.status { self.status = status; }
        self.updated_at = now.max(self.updated_at);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
}

impl CreateTodo {
    pub fn validate(&self) -> Result<(), TodoError> { validate_title(&self.title) }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
}

impl UpdateTodo {
    pub fn validate(&self) -> Result<(), TodoError> {
        match &self.title {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }
}

fn validate_title(title: &str) -> Result<(), TodoError> {
    if title.trim().is_empty() {
        return Err(TodoError::Validation("title must not be empty".into()));
    }
    Ok(())
}
