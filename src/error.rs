use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::embedding::EmbeddingError;
use crate::format::ErrorBody;
use crate::store::StoreError;

/// Failures surfaced by the query pipeline. Every variant aborts the request.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("{0}")]
    InvalidQuery(String),

    #[error("Invalid offset: {0}")]
    InvalidCursor(String),

    #[error("Embedding provider unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Vector store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type QueryResult<T> = Result<T, QueryError>;

impl QueryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            QueryError::InvalidQuery(_) | QueryError::InvalidCursor(_) => StatusCode::BAD_REQUEST,
            QueryError::EmbeddingUnavailable(_) | QueryError::StoreUnavailable(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl From<EmbeddingError> for QueryError {
    fn from(err: EmbeddingError) -> Self {
        QueryError::EmbeddingUnavailable(err.to_string())
    }
}

impl From<StoreError> for QueryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidOffset(msg) => QueryError::InvalidCursor(msg),
            other => QueryError::StoreUnavailable(other.to_string()),
        }
    }
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "request failed: {}", self);
        } else {
            tracing::warn!(status = status.as_u16(), "request rejected: {}", self);
        }
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
