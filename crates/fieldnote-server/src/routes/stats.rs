use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use fieldnote_schema::PlatformStats;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(stats))
}

async fn stats(State(state): State<AppState>) -> Result<Json<PlatformStats>, StatusCode> {
    match state.store.platform_stats().await {
        Ok(stats) => Ok(Json(stats)),
        Err(e) => {
            tracing::error!("stats query failed: {e:#}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
