use std::sync::Arc;

use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::error::{QueryError, QueryResult};
use crate::filter;
use crate::metrics::track_metric;
use crate::model::{SearchHit, SearchQuery};
use crate::store::VectorStore;

#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub default_limit: usize,
    pub max_limit: usize,
    /// When set, embeddings of any other length are rejected.
    pub dimension: Option<usize>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: crate::defaults::DEFAULT_SEARCH_LIMIT,
            max_limit: crate::defaults::MAX_SEARCH_LIMIT,
            dimension: None,
        }
    }
}

impl From<&crate::config::Config> for QueryConfig {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            default_limit: config.default_search_limit,
            max_limit: config.max_search_limit,
            dimension: config.embedding_dimension,
        }
    }
}

/// Embed, filter-translate, search. Holds no per-request state.
pub struct QueryService {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    config: QueryConfig,
}

impl QueryService {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        config: QueryConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            config,
        }
    }

    /// Resolve the effective limit: default when absent, clamped to the max.
    pub fn effective_limit(&self, requested: Option<i64>) -> QueryResult<usize> {
        match requested {
            None => Ok(self.config.default_limit.min(self.config.max_limit)),
            Some(n) if n <= 0 => Err(QueryError::InvalidQuery(format!(
                "limit must be a positive integer, got {n}"
            ))),
            Some(n) => Ok(usize::try_from(n)
                .unwrap_or(usize::MAX)
                .min(self.config.max_limit)),
        }
    }

    pub async fn search(&self, query: SearchQuery) -> QueryResult<Vec<SearchHit>> {
        let _measurement = crate::measure_operation!("query.search");

        if query.text.trim().is_empty() {
            return Err(QueryError::InvalidQuery("Query text is required".to_string()));
        }
        let limit = self.effective_limit(query.limit)?;
        let filter = filter::translate(&query.filters)?;

        track_metric("query.limit", limit as f64);
        track_metric(
            "query.filter_conditions",
            filter.as_ref().map(|f| f.len()).unwrap_or(0) as f64,
        );

        let vector = self.embedder.embed(&query.text).await?;
        if let Some(expected) = self.config.dimension {
            if vector.len() != expected {
                return Err(EmbeddingError::InvalidDimension {
                    expected,
                    actual: vector.len(),
                }
                .into());
            }
        }

        let hits = self.store.search(&vector, filter.as_ref(), limit).await?;

        tracing::info!(
            embedder = self.embedder.name(),
            store = self.store.name(),
            limit,
            hits = hits.len(),
            filtered = filter.is_some(),
            "search completed"
        );
        track_metric("query.results_returned", hits.len() as f64);

        Ok(hits)
    }
}
