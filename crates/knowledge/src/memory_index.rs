//! In-memory vector index.
//!
//! Brute-force cosine search over points loaded up front. Used for offline
//! runs against a JSONL snapshot and as the index in tests. The index is
//! immutable once shared, so concurrent searches need no locking.

use crate::rag::types::{DocumentPayload, SearchHit};
use crate::vector_index::{cosine_similarity, SearchRequest, VectorIndex};
use assistant_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A stored point: one passage with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPoint {
    pub vector: Vec<f32>,
    pub payload: DocumentPayload,
}

/// A [`VectorIndex`] holding every point in memory.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    collections: HashMap<String, Vec<StoredPoint>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a point to a collection.
    pub fn insert(&mut self, collection: &str, point: StoredPoint) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(point);
    }

    /// Number of points in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Load a JSONL snapshot (one `StoredPoint` per line) into a collection.
    pub fn load_jsonl(path: &Path, collection: &str) -> AppResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            AppError::Config(format!("Failed to open index snapshot {:?}: {}", path, e))
        })?;

        let mut index = Self::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let mut point: StoredPoint = serde_json::from_str(&line).map_err(|e| {
                AppError::Serialization(format!(
                    "Failed to parse line {} of {:?}: {}",
                    line_num + 1,
                    path,
                    e
                ))
            })?;

            // Passages without a record id are their own document
            if point.payload.record_id.is_empty() {
                point.payload.record_id = format!("line-{}", line_num + 1);
            }
            index.insert(collection, point);
        }

        tracing::info!(
            "Loaded {} points into in-memory collection '{}'",
            index.len(collection),
            collection
        );
        Ok(index)
    }
}

#[async_trait::async_trait]
impl VectorIndex for MemoryIndex {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn search(&self, request: &SearchRequest<'_>) -> AppResult<Vec<SearchHit>> {
        let Some(points) = self.collections.get(request.collection) else {
            return Err(AppError::provider(
                "memory",
                Some(404),
                format!("Collection '{}' not found", request.collection),
            ));
        };

        let mut hits: Vec<SearchHit> = points
            .iter()
            .map(|point| SearchHit {
                score: cosine_similarity(request.vector, &point.vector),
                payload: point.payload.clone(),
            })
            .filter(|hit| hit.score >= request.score_threshold)
            .collect();

        // Stable sort keeps insertion order between equal scores
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(request.limit);

        Ok(hits)
    }
}
