use axum::{extract::State, response::{IntoResponse, Response}, Json};

use super::AppState;
use crate::error::QueryError;
use crate::format::format_hits;
use crate::model::SearchRequest;

/// POST /api/search - semantic search with optional metadata filters
pub async fn search(State(state): State<AppState>, body: String) -> Response {
    if body.trim().is_empty() {
        return QueryError::InvalidQuery("Query text is required".to_string()).into_response();
    }
    let req: SearchRequest = match serde_json::from_str(&body) {
        Ok(req) => req,
        Err(e) => {
            return QueryError::InvalidQuery(format!("Invalid request body: {e}")).into_response()
        }
    };

    match state.query.search(req.into()).await {
        Ok(hits) => Json(format_hits(hits)).into_response(),
        Err(e) => e.into_response(),
    }
}
