use axum::{
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    serve, Json, Router,
};
use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::embedding::OpenAiEmbedder;
use crate::listing::{ListingConfig, ListingService};
use crate::query::{QueryConfig, QueryService};
use crate::store::QdrantStore;

mod documents;
mod search;

#[derive(Clone)]
pub struct AppState {
    pub query: Arc<QueryService>,
    pub listing: Arc<ListingService>,
}

// GET /health - Health check
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "healthy"}))
}

fn cors_layer(origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let Some(origin) = origin else {
        return Ok(CorsLayer::permissive());
    };
    let origin = HeaderValue::from_str(origin).context("Invalid CORS origin")?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::ACCEPT]))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/documents", get(documents::list))
        .route("/api/search", post(search::search))
        .with_state(state)
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let embedder = OpenAiEmbedder::from_config(&config).context("Failed to build embedding client")?;
    let store = Arc::new(QdrantStore::from_config(&config).context("Failed to build vector store client")?);

    let state = AppState {
        query: Arc::new(QueryService::new(
            Arc::new(embedder),
            store.clone(),
            QueryConfig::from(&config),
        )),
        listing: Arc::new(ListingService::new(store, ListingConfig::from(&config))),
    };

    let app = router(state)
        .layer(cors_layer(config.cors_origin.as_deref())?)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!(
        collection = %config.collection,
        qdrant = %config.qdrant_url,
        embedding_model = %config.embedding_model,
        "API listening on {}",
        config.bind_addr
    );
    serve(listener, app).await?;
    Ok(())
}
