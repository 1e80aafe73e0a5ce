pub mod todos;

use axum::{routing::get, Json, Router};
use tower_http::trace::TraceLayer;

use super::types::Message;

pub fn app(router: Router) -> Router {
    Router::new()
        .route("/", get(|| async { Json(Message::new("Welcome to Todo API")) }))
        .route("/health", get(|| async { "ok" }))
        .merge(router)
        .layer(TraceLayer::new_for_http())
}
