use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
}

async fn home() -> Json<Value> {
    Json(json!({
        "status": "running",
        "message": "LLM App Builder API is live!",
        "endpoints": ["/build-app"],
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "alive" }))
}
