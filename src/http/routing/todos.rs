use axum::extract::{rejection::JsonRejection, Path, State};
use axum::{routing::get, Json, Router};
use serde::Deserialize;

use crate::{
    application::todo_service::TodoService,
    domain::todo::{CreateTodo, Todo, TodoId, TodoStatus, UpdateTodo},
    http::types::{ApiError, Message},
};

#[derive(Clone)]
pub struct AppState<S: TodoService> { pub service: S }

pub fn router<S: TodoService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/todos", get(list_todos::<S>).post(create_todo::<S>))
        .route("/todos/:id", get(get_todo::<S>).put(update_todo::<S>).delete(delete_todo::<S>))
        .with_state(state)
}

// Bodies take status as a raw string so an unknown value is a 400 with a
// readable message instead of a generic deserialization failure.
#[derive(Deserialize)]
struct CreateBody { title: String, description: Option<String>, status: Option<String> }

#[derive(Deserialize)]
struct UpdateBody { title: Option<String>, description: Option<String>, status: Option<String> }

async fn list_todos<S: TodoService>(State(state): State<AppState<S>>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.service.list().await?))
}

async fn get_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.get(id).await?))
}

async fn create_todo<S: TodoService>(State(state): State<AppState<S>>, payload: Result<Json<CreateBody>, JsonRejection>) -> Result<Json<Todo>, ApiError> {
    let Json(body) = payload?;
    let input = CreateTodo { title: body.title, description: body.description, status: parse_status(body.status)? };
    Ok(Json(state.service.create(input).await?))
}

async fn update_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>, payload: Result<Json<UpdateBody>, JsonRejection>) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = payload?;
    let input = UpdateTodo { title: body.title, description: body.description, status: parse_status(body.status)? };
    Ok(Json(state.service.update(id, input).await?))
}

async fn delete_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<Message>, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete(id).await?;
    Ok(Json(Message::new("Todo deleted successfully")))
}

fn parse_id(s: &str) -> Result<TodoId, ApiError> { s.parse::<TodoId>().map_err(|_| ApiError::bad_request("invalid id")) }

fn parse_status(raw: Option<String>) -> Result<Option<TodoStatus>, ApiError> {
    Ok(raw.map(|s| s.parse::<TodoStatus>()).transpose()?)
}
