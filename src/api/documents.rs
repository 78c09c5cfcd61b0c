use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    Json,
};

use super::AppState;
use crate::error::{QueryError, QueryResult};
use crate::format::format_page;
use crate::listing::ListingService;
use crate::model::ListParams;

fn parse_limit(raw: Option<&str>) -> QueryResult<Option<i64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<i64>()
            .map(Some)
            .map_err(|_| QueryError::InvalidQuery(format!("limit must be an integer, got '{s}'"))),
    }
}

/// GET /api/documents - page through stored documents
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => return QueryError::InvalidQuery(rejection.body_text()).into_response(),
    };
    let limit = match parse_limit(params.limit.as_deref()) {
        Ok(limit) => limit,
        Err(e) => return e.into_response(),
    };
    let offset = match ListingService::parse_offset(params.offset.as_deref()) {
        Ok(offset) => offset,
        Err(e) => return e.into_response(),
    };

    match state.listing.list(limit, offset).await {
        Ok(page) => Json(format_page(page)).into_response(),
        Err(e) => e.into_response(),
    }
}
