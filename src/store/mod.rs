//! Vector store abstraction. The store owns storage, indexing and similarity;
//! this crate only issues search and scroll calls against it.

use async_trait::async_trait;

use crate::filter::FilterExpression;
use crate::model::{Document, PointId, SearchHit};

mod memory;
mod qdrant;

pub use memory::InMemoryStore;
pub use qdrant::QdrantStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("{0}")]
    InvalidOffset(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Points returned by one scroll call plus the cursor for the next call.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollPage {
    pub points: Vec<Document>,
    pub next_offset: Option<PointId>,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Nearest neighbours of `vector`, most similar first.
    async fn search(
        &self,
        vector: &[f32],
        filter: Option<&FilterExpression>,
        limit: usize,
    ) -> StoreResult<Vec<SearchHit>>;

    /// Enumerate points in the store's native order starting at `offset`.
    async fn scroll(&self, limit: usize, offset: Option<&PointId>) -> StoreResult<ScrollPage>;

    fn name(&self) -> &'static str;
}
