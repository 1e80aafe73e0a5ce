//! The five todo tools and their mapping onto [`TodoService`].

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::application::todo_service::TodoService;
use crate::domain::error::TodoError;
use crate::domain::todo::{CreateTodo, TodoId, TodoStatus, UpdateTodo};

pub const LIST_TODOS: &str = "list_todos";
pub const GET_TODO: &str = "get_todo";
pub const CREATE_TODO: &str = "create_todo";
pub const UPDATE_TODO: &str = "update_todo";
pub const DELETE_TODO: &str = "delete_todo";

/// Failures that never reached the store. Store errors travel inside a
/// [`CallToolResult`] instead.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<Content>,
    pub is_error: bool,
}

impl CallToolResult {
    fn success(value: &impl Serialize) -> Self {
        let text = serde_json::to_string_pretty(value).unwrap_or_else(|e| e.to_string());
        Self { content: vec![Content::Text { text }], is_error: false }
    }

    fn error(err: &TodoError) -> Self {
        Self { content: vec![Content::Text { text: err.to_string() }], is_error: true }
    }
}

#[derive(Debug, Deserialize)]
struct TodoIdArgs { todo_id: i64 }

#[derive(Debug, Deserialize)]
struct CreateArgs { title: String, description: Option<String>, status: Option<String> }

#[derive(Debug, Deserialize)]
struct UpdateArgs { todo_id: i64, title: Option<String>, description: Option<String>, status: Option<String> }

/// `tools/list` payload: names, descriptions and JSON Schema inputs.
pub fn definitions() -> Value {
    let status = json!({ "type": "string", "enum": TodoStatus::ALL.map(|s| s.as_str()) });
    let todo_id = json!({ "type": "integer", "description": "ID of the todo" });
    json!({
        "tools": [
            {
                "name": LIST_TODOS,
                "description": "List all todos in creation order",
                "inputSchema": { "type": "object", "properties": {} }
            },
            {
                "name": GET_TODO,
                "description": "Get a specific todo by ID",
                "inputSchema": {
                    "type": "object",
                    "properties": { "todo_id": todo_id },
                    "required": ["todo_id"]
                }
            },
            {
                "name": CREATE_TODO,
                "description": "Create a new todo",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "minLength": 1 },
                        "description": { "type": "string" },
                        "status": status
                    },
                    "required": ["title"]
                }
            },
            {
                "name": UPDATE_TODO,
                "description": "Update fields of an existing todo; omitted fields are kept",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "todo_id": todo_id,
                        "title": { "type": "string", "minLength": 1 },
                        "description": { "type": "string" },
                        "status": status
                    },
                    "required": ["todo_id"]
                }
            },
            {
                "name": DELETE_TODO,
                "description": "Delete a todo",
                "inputSchema": {
                    "type": "object",
                    "properties": { "todo_id": todo_id },
                    "required": ["todo_id"]
                }
            }
        ]
    })
}

fn args<T: DeserializeOwned>(tool: &'static str, arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|source| ToolError::InvalidArguments { tool, source })
}

fn parse_status(raw: Option<String>) -> Result<Option<TodoStatus>, TodoError> {
    raw.map(|s| s.parse()).transpose()
}

enum Failure {
    Tool(ToolError),
    Store(TodoError),
}

impl From<ToolError> for Failure {
    fn from(err: ToolError) -> Self { Failure::Tool(err) }
}

impl From<TodoError> for Failure {
    fn from(err: TodoError) -> Self { Failure::Store(err) }
}

async fn dispatch<S: TodoService>(service: &S, name: &str, arguments: Value) -> Result<CallToolResult, Failure> {
    match name {
        LIST_TODOS => Ok(CallToolResult::success(&service.list().await?)),
        GET_TODO => {
            let a: TodoIdArgs = args(GET_TODO, arguments)?;
            Ok(CallToolResult::success(&service.get(TodoId(a.todo_id)).await?))
        }
        CREATE_TODO => {
            let a: CreateArgs = args(CREATE_TODO, arguments)?;
            let input = CreateTodo { title: a.title, description: a.description, status: parse_status(a.status)? };
            Ok(CallToolResult::success(&service.create(input).await?))
        }
        UPDATE_TODO => {
            let a: UpdateArgs = args(UPDATE_TODO, arguments)?;
            let input = UpdateTodo { title: a.title, description: a.description, status: parse_status(a.status)? };
            Ok(CallToolResult::success(&service.update(TodoId(a.todo_id), input).await?))
        }
        DELETE_TODO => {
            let a: TodoIdArgs = args(DELETE_TODO, arguments)?;
            let deleted = service.delete(TodoId(a.todo_id)).await?;
            Ok(CallToolResult::success(&json!({ "deleted": deleted, "todo_id": a.todo_id })))
        }
        other => Err(ToolError::UnknownTool(other.to_string()).into()),
    }
}

/// Runs one tool call against the store.
pub async fn call<S: TodoService>(service: &S, name: &str, arguments: Value) -> Result<CallToolResult, ToolError> {
    // Hosts may send `null` or omit arguments for list_todos.
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    match dispatch(service, name, arguments).await {
        Ok(result) => Ok(result),
        Err(Failure::Store(err)) => {
            tracing::warn!(tool = name, error = %err, "tool call failed");
            Ok(CallToolResult::error(&err))
        }
        Err(Failure::Tool(err)) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definitions_name_all_five_tools() {
        let defs = definitions();
        let names: Vec<_> = defs["tools"].as_array().unwrap().iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, [LIST_TODOS, GET_TODO, CREATE_TODO, UPDATE_TODO, DELETE_TODO]);
        assert_eq!(defs["tools"][2]["inputSchema"]["properties"]["status"]["enum"], json!(["pending", "in_progress", "completed"]));
    }

    #[test]
    fn call_result_uses_camel_case_flag() {
        let value = serde_json::to_value(CallToolResult::error(&TodoError::NotFound(TodoId(4)))).unwrap();
        assert_eq!(value, json!({ "content": [{ "type": "text", "text": "Todo not found: 4" }], "isError": true }));
    }
}
