use async_trait::async_trait;
use super::error::TodoError;
use super::todo::{Todo, TodoId, CreateTodo, UpdateTodo};

/// Storage behind the store. Inputs arrive already validated.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn create(&self, input: CreateTodo) -> Result<Todo, TodoError>;
    async fn get(&self, id: TodoId) -> Result<Todo, TodoError>;
    async fn list(&self) -> Result<Vec<Todo>, TodoError>;
    async fn update(&self, id: TodoId, input: UpdateTodo) -> Result<Todo, TodoError>;
    async fn delete(&self, id: TodoId) -> Result<(), TodoError>;
}
