//! Stable JSON shapes returned by the HTTP API.

use serde::Serialize;

use crate::model::{Document, Page, PointId, SearchHit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// `{"status":"success","data":[{"id","score","payload"}...]}`
#[derive(Debug, Serialize)]
pub struct SearchBody {
    pub status: Status,
    pub data: Vec<SearchHit>,
}

/// `{"status":"success","data":[...],"next_page_offset": cursor | null}`
#[derive(Debug, Serialize)]
pub struct DocumentsBody {
    pub status: Status,
    pub data: Vec<Document>,
    pub next_page_offset: Option<PointId>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: Status,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
        }
    }
}

pub fn format_hits(hits: Vec<SearchHit>) -> SearchBody {
    SearchBody {
        status: Status::Success,
        data: hits,
    }
}

pub fn format_page(page: Page) -> DocumentsBody {
    DocumentsBody {
        status: Status::Success,
        data: page.documents,
        next_page_offset: page.next_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hit_formatting_preserves_fields() {
        let hit = SearchHit {
            id: PointId::Uuid("x42".to_string()),
            score: 0.87,
            payload: json!({"metadata": {"name": "A"}}).as_object().cloned().unwrap(),
        };
        let body = serde_json::to_string(&format_hits(vec![hit])).unwrap();
        assert_eq!(
            body,
            r#"{"status":"success","data":[{"id":"x42","score":0.87,"payload":{"metadata":{"name":"A"}}}]}"#
        );
    }

    #[test]
    fn test_payload_key_order_survives() {
        let raw = r#"{"metadata":{"name":"A","location":"Remote","current_role":"SRE","age":null}}"#;
        let payload: crate::model::Payload = serde_json::from_str(raw).unwrap();
        let hit = SearchHit {
            id: PointId::Num(1),
            score: 0.5,
            payload,
        };
        let out = serde_json::to_string(&hit.payload).unwrap();
        assert_eq!(out, raw);
    }

    #[test]
    fn test_last_page_has_null_offset() {
        let body = serde_json::to_value(format_page(Page {
            documents: vec![],
            next_offset: None,
        }))
        .unwrap();
        assert_eq!(body, json!({"status": "success", "data": [], "next_page_offset": null}));
    }

    #[test]
    fn test_document_fields() {
        let body = serde_json::to_value(format_page(Page {
            documents: vec![Document {
                id: PointId::Num(3),
                payload: Default::default(),
                vector: Some(vec![0.5]),
            }],
            next_offset: Some(PointId::Num(4)),
        }))
        .unwrap();
        assert_eq!(body["data"][0], json!({"id": 3, "payload": {}, "vector": [0.5]}));
        assert_eq!(body["next_page_offset"], 4);
    }

    #[test]
    fn test_error_body() {
        let body = serde_json::to_value(ErrorBody::new("Query text is required")).unwrap();
        assert_eq!(body, json!({"status": "error", "message": "Query text is required"}));
    }
}
