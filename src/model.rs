use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Open payload map attached to every stored point. The schema is not
/// enforced here; resumes conventionally nest a `metadata` object.
pub type Payload = Map<String, Value>;

/// Point identifier as used by the vector store: unsigned integer or UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointId {
    Num(u64),
    Uuid(String),
}

impl PointId {
    /// Parse a cursor echoed back by a client. Returns `None` for anything
    /// that is neither an unsigned integer nor a UUID.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(n) = raw.parse::<u64>() {
            return Some(PointId::Num(n));
        }
        uuid::Uuid::parse_str(raw)
            .ok()
            .map(|u| PointId::Uuid(u.hyphenated().to_string()))
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointId::Num(n) => write!(f, "{n}"),
            PointId::Uuid(s) => f.write_str(s),
        }
    }
}

impl From<u64> for PointId {
    fn from(n: u64) -> Self {
        PointId::Num(n)
    }
}

/// A stored point as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: PointId,
    pub payload: Payload,
    pub vector: Option<Vec<f32>>,
}

/// Transient search request, built per call.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub text: String,
    pub limit: Option<i64>,
    pub filters: Map<String, Value>,
}

/// A ranked hit. Scores are descending across a result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: PointId,
    pub score: f32,
    pub payload: Payload,
}

/// One page of a cursor-based listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub documents: Vec<Document>,
    pub next_offset: Option<PointId>,
}

/// Body of `POST /api/search`.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub filters: Option<Map<String, Value>>,
}

impl From<SearchRequest> for SearchQuery {
    fn from(req: SearchRequest) -> Self {
        SearchQuery {
            text: req.query.unwrap_or_default(),
            limit: req.limit,
            filters: req.filters.unwrap_or_default(),
        }
    }
}

/// Query string of `GET /api/documents`. Kept as raw strings so malformed
/// values surface as our own error envelope.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}
