use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::error::TodoError;

#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, detail: detail.into() }
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        let status = match err {
            TodoError::NotFound(_) => StatusCode::NOT_FOUND,
            TodoError::Validation(_) => StatusCode::BAD_REQUEST,
        };
        Self { status, detail: err.to_string() }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self { Self::bad_request(rejection.body_text()) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(status = %self.status, detail = %self.detail, "request failed");
        (self.status, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct Message { pub message: String }

impl Message {
    pub fn new(message: impl Into<String>) -> Self { Self { message: message.into() } }
}
