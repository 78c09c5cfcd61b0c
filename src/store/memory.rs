use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{ScrollPage, StoreError, StoreResult, VectorStore};
use crate::filter::FilterExpression;
use crate::model::{Document, Payload, PointId, SearchHit};

/// In-memory implementation of VectorStore (for development/testing).
///
/// Scroll order is insertion order; a cursor is the id of the first point
/// of the next page.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    points: Arc<RwLock<Vec<Document>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a point.
    pub async fn upsert(&self, id: PointId, vector: Vec<f32>, payload: Payload) {
        let mut points = self.points.write().await;
        let doc = Document {
            id,
            payload,
            vector: Some(vector),
        };
        match points.iter_mut().find(|p| p.id == doc.id) {
            Some(existing) => *existing = doc,
            None => points.push(doc),
        }
    }

    pub async fn len(&self) -> usize {
        self.points.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.points.read().await.is_empty()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na * nb)
}

#[async_trait]
impl VectorStore for InMemoryStore {
    async fn search(
        &self,
        vector: &[f32],
        filter: Option<&FilterExpression>,
        limit: usize,
    ) -> StoreResult<Vec<SearchHit>> {
        let points = self.points.read().await;
        let mut hits = Vec::new();
        for point in points.iter() {
            if let Some(f) = filter {
                if !f.matches(&point.payload) {
                    continue;
                }
            }
            let Some(stored) = point.vector.as_deref() else {
                continue;
            };
            if stored.len() != vector.len() {
                return Err(StoreError::Api {
                    status: 400,
                    body: format!(
                        "Wrong input: Vector dimension error: expected dim: {}, got {}",
                        stored.len(),
                        vector.len()
                    ),
                });
            }
            hits.push(SearchHit {
                id: point.id.clone(),
                score: cosine_similarity(stored, vector),
                payload: point.payload.clone(),
            });
        }

        // stable: equal scores keep insertion order
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn scroll(&self, limit: usize, offset: Option<&PointId>) -> StoreResult<ScrollPage> {
        let points = self.points.read().await;
        let start = match offset {
            None => 0,
            Some(id) => points
                .iter()
                .position(|p| &p.id == id)
                .ok_or_else(|| StoreError::InvalidOffset(format!("No point with id {id}")))?,
        };

        let end = start.saturating_add(limit).min(points.len());
        Ok(ScrollPage {
            points: points[start..end].to_vec(),
            next_offset: points.get(end).map(|p| p.id.clone()),
        })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
