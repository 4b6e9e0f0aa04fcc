pub mod chat;
pub mod ingest;
pub mod stats;

use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/chat", chat::router())
        .nest("/ingest", ingest::router())
        .nest("/stats", stats::router())
        .route("/health", get(health))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
