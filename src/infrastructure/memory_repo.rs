use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::{
    error::TodoError,
    repository::TodoRepository,
    todo::{CreateTodo, Todo, TodoId, UpdateTodo},
};

#[derive(Debug)]
struct Inner {
    next_id: i64,
    // Insertion order; ids only grow so the vec is also sorted by id.
    todos: Vec<Todo>,
}

impl Default for Inner {
    fn default() -> Self { Self { next_id: 1, todos: Vec::new() } }
}

impl Inner {
    fn position(&self, id: TodoId) -> Result<usize, TodoError> {
        self.todos
            .binary_search_by_key(&id, |t| t.id)
            .map_err(|_| TodoError::NotFound(id))
    }
}

/// Process-lifetime store. Cloning shares the same collection.
#[derive(Clone, Default)]
pub struct InMemoryTodoRepository {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, input: CreateTodo) -> Result<Todo, TodoError> {
        let mut inner = self.inner.lock().await;
        let id = TodoId(inner.next_id);
        inner.next_id += 1;
        let todo = Todo::new(id, input, Utc::now());
        inner.todos.push(todo.clone());
        Ok(todo)
    }

    async fn get(&self, id: TodoId) -> Result<Todo, TodoError> {
        let inner = self.inner.lock().await;
        let idx = inner.position(id)?;
        Ok(inner.todos[idx].clone())
    }

    async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        Ok(self.inner.lock().await.todos.clone())
    }

    async fn update(&self, id: TodoId, input: UpdateTodo) -> Result<Todo, TodoError> {
        let mut inner = self.inner.lock().await;
        let idx = inner.position(id)?;
        let todo = &mut inner.todos[idx];
        todo.apply(input, Utc::now());
        Ok(todo.clone())
    }

    async fn delete(&self, id: TodoId) -> Result<(), TodoError> {
        let mut inner = self.inner.lock().await;
        let idx = inner.position(id)?;
        inner.todos.remove(idx);
        Ok(())
    }
}
