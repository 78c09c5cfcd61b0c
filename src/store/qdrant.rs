//! Qdrant REST implementation of [`VectorStore`].

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use super::{ScrollPage, StoreError, StoreResult, VectorStore};
use crate::config::Config;
use crate::filter::FilterExpression;
use crate::model::{Document, Payload, PointId, SearchHit};

pub struct QdrantStore {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    collection: String,
}

impl QdrantStore {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        collection: String,
        timeout: Duration,
    ) -> StoreResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            collection,
        })
    }

    pub fn from_config(config: &Config) -> StoreResult<Self> {
        Self::new(
            &config.qdrant_url,
            config.qdrant_api_key.clone(),
            config.collection.clone(),
            Duration::from_secs(config.store_timeout_secs),
        )
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/collections/{}{}", self.base_url, self.collection, path);
        let mut req = self.client.request(method, &url);
        if let Some(key) = &self.api_key {
            req = req.header("api-key", key);
        }
        req
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a FilterExpression>,
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ScoredPoint {
    id: PointId,
    score: f32,
    #[serde(default)]
    payload: Option<Payload>,
}

#[derive(Serialize)]
struct ScrollRequest<'a> {
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<&'a PointId>,
    with_payload: bool,
    with_vector: bool,
}

#[derive(Deserialize)]
struct ScrollResponse {
    result: ScrollResult,
}

#[derive(Deserialize)]
struct ScrollResult {
    points: Vec<RecordPoint>,
    #[serde(default)]
    next_page_offset: Option<PointId>,
}

#[derive(Deserialize)]
struct RecordPoint {
    id: PointId,
    #[serde(default)]
    payload: Option<Payload>,
    #[serde(default)]
    vector: Option<Vec<f32>>,
}

#[async_trait]
impl VectorStore for QdrantStore {
    #[instrument(skip(self, vector, filter), fields(backend = "qdrant", collection = %self.collection))]
    async fn search(
        &self,
        vector: &[f32],
        filter: Option<&FilterExpression>,
        limit: usize,
    ) -> StoreResult<Vec<SearchHit>> {
        let start = Instant::now();
        let resp = self
            .request(Method::POST, "/points/search")
            .json(&SearchRequest {
                vector,
                filter,
                limit,
                with_payload: true,
            })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "qdrant search request failed");
                StoreError::Http(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "qdrant search rejected");
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        debug!(
            hits = parsed.result.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "qdrant search completed"
        );

        Ok(parsed
            .result
            .into_iter()
            .map(|p| SearchHit {
                id: p.id,
                score: p.score,
                payload: p.payload.unwrap_or_default(),
            })
            .collect())
    }

    #[instrument(skip(self), fields(backend = "qdrant", collection = %self.collection))]
    async fn scroll(&self, limit: usize, offset: Option<&PointId>) -> StoreResult<ScrollPage> {
        let start = Instant::now();
        let resp = self
            .request(Method::POST, "/points/scroll")
            .json(&ScrollRequest {
                limit,
                offset,
                with_payload: true,
                with_vector: true,
            })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "qdrant scroll request failed");
                StoreError::Http(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "qdrant scroll rejected");
            if status == StatusCode::BAD_REQUEST && offset.is_some() {
                return Err(StoreError::InvalidOffset(body));
            }
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ScrollResponse = resp
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        debug!(
            points = parsed.result.points.len(),
            has_next = parsed.result.next_page_offset.is_some(),
            duration_ms = start.elapsed().as_millis() as u64,
            "qdrant scroll completed"
        );

        Ok(ScrollPage {
            points: parsed
                .result
                .points
                .into_iter()
                .map(|p| Document {
                    id: p.id,
                    payload: p.payload.unwrap_or_default(),
                    vector: p.vector,
                })
                .collect(),
            next_offset: parsed.result.next_page_offset,
        })
    }

    fn name(&self) -> &'static str {
        "qdrant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::translate;
    use serde_json::json;

    #[test]
    fn test_search_request_omits_absent_filter() {
        let body = serde_json::to_value(SearchRequest {
            vector: &[0.5, 0.25],
            filter: None,
            limit: 4,
            with_payload: true,
        })
        .unwrap();
        assert_eq!(body, json!({"vector": [0.5, 0.25], "limit": 4, "with_payload": true}));
    }

    #[test]
    fn test_search_request_embeds_filter() {
        let filters = json!({"location": "Remote"});
        let expr = translate(filters.as_object().unwrap()).unwrap();
        let body = serde_json::to_value(SearchRequest {
            vector: &[1.0],
            filter: expr.as_ref(),
            limit: 2,
            with_payload: true,
        })
        .unwrap();
        assert_eq!(
            body["filter"],
            json!({"must": [{"key": "metadata.location", "match": {"value": "Remote"}}]})
        );
    }

    #[test]
    fn test_scroll_response_parsing() {
        let resp: ScrollResponse = serde_json::from_value(json!({
            "result": {
                "points": [
                    {"id": 1, "payload": {"metadata": {"name": "A"}}, "vector": [0.1, 0.2]},
                    {"id": "8f3a5c1e-0b7d-4e2a-9c61-2d4b8e7f1a90", "payload": null}
                ],
                "next_page_offset": 3
            },
            "status": "ok",
            "time": 0.001
        }))
        .unwrap();
        assert_eq!(resp.result.points.len(), 2);
        assert_eq!(resp.result.points[0].id, PointId::Num(1));
        assert!(resp.result.points[1].payload.is_none());
        assert_eq!(resp.result.next_page_offset, Some(PointId::Num(3)));
    }

    #[test]
    fn test_search_response_keeps_order() {
        let resp: SearchResponse = serde_json::from_value(json!({
            "result": [
                {"id": "b", "version": 0, "score": 0.91, "payload": {}},
                {"id": "a", "version": 0, "score": 0.42, "payload": {}}
            ]
        }))
        .unwrap();
        let ids: Vec<String> = resp.result.iter().map(|p| p.id.to_string()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_unreachable_store_is_http_error() {
        let store = QdrantStore::new("http://127.0.0.1:1", None, "documents".into(), Duration::from_secs(2)).unwrap();
        let err = store.scroll(10, None).await.unwrap_err();
        assert!(matches!(err, StoreError::Http(_)));
    }
}
