use std::sync::Arc;

use crate::error::{QueryError, QueryResult};
use crate::metrics::track_metric;
use crate::model::{Page, PointId};
use crate::store::VectorStore;

#[derive(Debug, Clone)]
pub struct ListingConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: crate::defaults::DEFAULT_PAGE_SIZE,
            max_page_size: crate::defaults::MAX_PAGE_SIZE,
        }
    }
}

impl From<&crate::config::Config> for ListingConfig {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        }
    }
}

/// Cursor-based enumeration of stored documents.
pub struct ListingService {
    store: Arc<dyn VectorStore>,
    config: ListingConfig,
}

impl ListingService {
    pub fn new(store: Arc<dyn VectorStore>, config: ListingConfig) -> Self {
        Self { store, config }
    }

    /// Parse the raw query-string cursor. `null` and empty mean first page.
    pub fn parse_offset(raw: Option<&str>) -> QueryResult<Option<PointId>> {
        match raw.map(str::trim) {
            None | Some("") | Some("null") => Ok(None),
            Some(s) => PointId::parse(s)
                .map(Some)
                .ok_or_else(|| QueryError::InvalidCursor(format!("'{s}' is not a valid page offset"))),
        }
    }

    pub fn effective_limit(&self, requested: Option<i64>) -> QueryResult<usize> {
        match requested {
            None => Ok(self.config.default_page_size.min(self.config.max_page_size)),
            Some(n) if n <= 0 => Err(QueryError::InvalidQuery(format!(
                "limit must be a positive integer, got {n}"
            ))),
            Some(n) => Ok(usize::try_from(n)
                .unwrap_or(usize::MAX)
                .min(self.config.max_page_size)),
        }
    }

    pub async fn list(&self, limit: Option<i64>, offset: Option<PointId>) -> QueryResult<Page> {
        let _measurement = crate::measure_operation!("listing.list");
        let limit = self.effective_limit(limit)?;

        let page = self.store.scroll(limit, offset.as_ref()).await?;

        tracing::info!(
            store = self.store.name(),
            limit,
            returned = page.points.len(),
            has_next = page.next_offset.is_some(),
            "listing completed"
        );
        track_metric("listing.documents_returned", page.points.len() as f64);

        Ok(Page {
            documents: page.points,
            next_offset: page.next_offset,
        })
    }
}
