use clap::Args;

use crate::defaults;

/// Service configuration. Every field can come from a flag or the matching
/// environment variable.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Base URL of the OpenAI-compatible API serving `/embeddings`
    #[arg(long, env = "API_BASE_URL", default_value = "http://localhost:11434/v1")]
    pub api_base_url: String,

    /// Bearer token for the embedding API
    #[arg(long, env = "API_KEY")]
    pub api_key: Option<String>,

    #[arg(long, env = "DEFAULT_EMBEDDING_MODEL", default_value = "snowflake-arctic-embed:latest")]
    pub embedding_model: String,

    /// Expected embedding length; mismatching vectors are rejected
    #[arg(long, env = "EMBEDDING_DIMENSION")]
    pub embedding_dimension: Option<usize>,

    #[arg(long, env = "QDRANT_URL", default_value = "http://localhost:6333")]
    pub qdrant_url: String,

    #[arg(long, env = "QDRANT_API_KEY")]
    pub qdrant_api_key: Option<String>,

    #[arg(long, env = "QDRANT_COLLECTION", default_value = "documents")]
    pub collection: String,

    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:5000")]
    pub bind_addr: String,

    /// Allowed CORS origin; any origin when unset
    #[arg(long, env = "CORS_ORIGIN")]
    pub cors_origin: Option<String>,

    #[arg(long, env = "EMBEDDING_TIMEOUT_SECS", default_value_t = 30)]
    pub embedding_timeout_secs: u64,

    #[arg(long, env = "STORE_TIMEOUT_SECS", default_value_t = 10)]
    pub store_timeout_secs: u64,

    #[arg(long, env = "DEFAULT_SEARCH_LIMIT", default_value_t = defaults::DEFAULT_SEARCH_LIMIT)]
    pub default_search_limit: usize,

    #[arg(long, env = "MAX_SEARCH_LIMIT", default_value_t = defaults::MAX_SEARCH_LIMIT)]
    pub max_search_limit: usize,

    #[arg(long, env = "DEFAULT_PAGE_SIZE", default_value_t = defaults::DEFAULT_PAGE_SIZE)]
    pub default_page_size: usize,

    #[arg(long, env = "MAX_PAGE_SIZE", default_value_t = defaults::MAX_PAGE_SIZE)]
    pub max_page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:11434/v1".to_string(),
            api_key: None,
            embedding_model: "snowflake-arctic-embed:latest".to_string(),
            embedding_dimension: None,
            qdrant_url: "http://localhost:6333".to_string(),
            qdrant_api_key: None,
            collection: "documents".to_string(),
            bind_addr: "0.0.0.0:5000".to_string(),
            cors_origin: None,
            embedding_timeout_secs: 30,
            store_timeout_secs: 10,
            default_search_limit: defaults::DEFAULT_SEARCH_LIMIT,
            max_search_limit: defaults::MAX_SEARCH_LIMIT,
            default_page_size: defaults::DEFAULT_PAGE_SIZE,
            max_page_size: defaults::MAX_PAGE_SIZE,
        }
    }
}
