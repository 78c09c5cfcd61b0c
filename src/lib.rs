//! Resume Search
//!
//! HTTP query layer over a vector database of indexed candidate resumes:
//! paginated document listing and semantic search with metadata filters.

pub mod api;
pub mod config;
pub mod embedding;
pub mod error;
pub mod facets;
pub mod filter;
pub mod format;
pub mod listing;
pub mod metrics;
pub mod model;
pub mod query;
pub mod store;

pub use config::Config;
pub use error::{QueryError, QueryResult};
pub use model::*;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    pub const DEFAULT_SEARCH_LIMIT: usize = 10;
    pub const MAX_SEARCH_LIMIT: usize = 100;
    pub const DEFAULT_PAGE_SIZE: usize = 100;
    pub const MAX_PAGE_SIZE: usize = 1000;
}
