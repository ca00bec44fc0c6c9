//! Qdrant vector index backend.
//!
//! Talks to Qdrant's REST API directly:
//! https://api.qdrant.tech/api-reference/search/points

use crate::rag::types::{DocumentPayload, SearchHit};
use crate::vector_index::{SearchRequest, VectorIndex};
use assistant_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct SearchBody<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
    score_threshold: f32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<ScoredPoint>,
}

#[derive(Debug, Deserialize)]
struct ScoredPoint {
    id: PointId,
    score: f32,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PointId {
    Num(u64),
    Uuid(String),
}

impl PointId {
    fn to_id_string(&self) -> String {
        match self {
            PointId::Num(n) => n.to_string(),
            PointId::Uuid(s) => s.clone(),
        }
    }
}

/// A [`VectorIndex`] backed by a Qdrant server.
pub struct QdrantIndex {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl QdrantIndex {
    /// Create a new Qdrant index client for the given REST URL.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn search_url(&self, collection: &str) -> String {
        format!(
            "{}/collections/{}/points/search",
            self.base_url, collection
        )
    }

    fn convert_point(point: ScoredPoint) -> AppResult<SearchHit> {
        let mut payload: DocumentPayload = match point.payload {
            Some(value) => serde_json::from_value(value).map_err(|e| {
                AppError::provider("qdrant", None, format!("Malformed point payload: {}", e))
            })?,
            None => DocumentPayload::default(),
        };

        // Points indexed without a record id are their own document
        if payload.record_id.is_empty() {
            payload.record_id = point.id.to_id_string();
        }

        Ok(SearchHit {
            score: point.score,
            payload,
        })
    }
}

#[async_trait::async_trait]
impl VectorIndex for QdrantIndex {
    fn backend_name(&self) -> &str {
        "qdrant"
    }

    async fn search(&self, request: &SearchRequest<'_>) -> AppResult<Vec<SearchHit>> {
        let url = self.search_url(request.collection);
        tracing::debug!(
            collection = request.collection,
            limit = request.limit,
            score_threshold = request.score_threshold,
            "Searching Qdrant"
        );

        let body = SearchBody {
            vector: request.vector,
            limit: request.limit,
            with_payload: true,
            score_threshold: request.score_threshold,
        };

        let mut builder = self.client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            builder = builder.header("api-key", key);
        }

        let response = builder.send().await.map_err(|e| {
            AppError::provider("qdrant", None, format!("Failed to send search request: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(status = status.as_u16(), body = %error_text, "Qdrant API error");
            return Err(AppError::provider(
                "qdrant",
                Some(status.as_u16()),
                format!("Qdrant search error: {}", status.as_u16()),
            ));
        }

        let parsed: SearchResponse = response.json().await.map_err(|e| {
            AppError::provider("qdrant", None, format!("Failed to parse search response: {}", e))
        })?;

        parsed.result.into_iter().map(Self::convert_point).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let index = QdrantIndex::new("https://qdrant.example.org:6333/", None);
        assert_eq!(
            index.search_url("geant_documents"),
            "https://qdrant.example.org:6333/collections/geant_documents/points/search"
        );
    }

    #[test]
    fn test_search_body_shape() {
        let vector = [0.1_f32, 0.2, 0.3];
        let body = SearchBody {
            vector: &vector,
            limit: 5,
            with_payload: true,
            score_threshold: 0.3,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["limit"], 5);
        assert_eq!(json["with_payload"], true);
        assert_eq!(json["vector"].as_array().unwrap().len(), 3);
        assert!((json["score_threshold"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_parse_search_response_preserves_order() {
        let raw = serde_json::json!({
            "result": [
                {"id": 11, "version": 3, "score": 0.81, "payload": {
                    "record_id": "A", "title": "eduroam", "content": "Roaming."
                }},
                {"id": "9b1d7c1e-3b7f-4a59-9d3b-8f7f0e4c2a11", "version": 3, "score": 0.42, "payload": {
                    "title": "No record id", "content": "Orphan passage."
                }}
            ],
            "status": "ok",
            "time": 0.002
        });

        let parsed: SearchResponse = serde_json::from_value(raw).unwrap();
        let hits: Vec<SearchHit> = parsed
            .result
            .into_iter()
            .map(QdrantIndex::convert_point)
            .collect::<AppResult<_>>()
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].payload.record_id, "A");
        assert!((hits[0].score - 0.81).abs() < 1e-6);
        assert_eq!(
            hits[1].payload.record_id,
            "9b1d7c1e-3b7f-4a59-9d3b-8f7f0e4c2a11"
        );
    }
}
