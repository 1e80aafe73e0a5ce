use crate::domain::error::TodoError;
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{CreateTodo, Todo, TodoId, UpdateTodo};
use async_trait::async_trait;

/// The todo store contract shared by every front end.
///
/// Validation failures are reported before the repository is touched, so a
/// rejected call never leaves a partial mutation behind.
#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn create(&self, input: CreateTodo) -> Result<Todo, TodoError>;
    async fn get(&self, id: TodoId) -> Result<Todo, TodoError>;
    async fn list(&self) -> Result<Vec<Todo>, TodoError>;
    async fn update(&self, id: TodoId, input: UpdateTodo) -> Result<Todo, TodoError>;
    async fn delete(&self, id: TodoId) -> Result<bool, TodoError>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn create(&self, input: CreateTodo) -> Result<Todo, TodoError> {
        input.validate()?;
        let todo = self.repo.create(input).await?;
        tracing::info!(id = %todo.id, status = %todo.status, "todo created");
        Ok(todo)
    }

    async fn get(&self, id: TodoId) -> Result<Todo, TodoError> {
        tracing::debug!(%id, "get todo");
        self.repo.get(id).await
    }

    async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        let todos = self.repo.list().await?;
        tracing::debug!(count = todos.len(), "list todos");
        Ok(todos)
    }

    async fn update(&self, id: TodoId, input: UpdateTodo) -> Result<Todo, TodoError> {
        input.validate()?;
        let todo = self.repo.update(id, input).await?;
        tracing::info!(%id, status = %todo.status, "todo updated");
        Ok(todo)
    }

    async fn delete(&self, id: TodoId) -> Result<bool, TodoError> {
        self.repo.delete(id).await?;
        tracing::info!(%id, "todo deleted");
        Ok(true)
    }
}
