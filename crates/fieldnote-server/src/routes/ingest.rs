//! Ingestion endpoint the out-of-process news scraper POSTs batches to.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;

use fieldnote_schema::NewArticle;

use crate::state::AppState;

#[derive(Serialize)]
pub struct IngestResponse {
    pub inserted: usize,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/articles", post(ingest_articles))
}

async fn ingest_articles(
    State(state): State<AppState>,
    Json(articles): Json<Vec<NewArticle>>,
) -> Result<Json<IngestResponse>, StatusCode> {
    match state.store.insert_articles(articles).await {
        Ok(inserted) => Ok(Json(IngestResponse { inserted })),
        Err(e) => {
            tracing::error!("article ingest failed: {e:#}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
