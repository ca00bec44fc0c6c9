//! Similarity search with a relevance cutoff.

use crate::rag::types::{SearchHit, DEFAULT_TOP_K, SIMILARITY_THRESHOLD};
use crate::vector_index::{SearchRequest, VectorIndex};
use assistant_core::{AppError, AppResult, FailurePolicy};
use std::sync::Arc;

/// Searches one collection of a [`VectorIndex`].
///
/// Under [`FailurePolicy::Degrade`] (the default) any backend failure is
/// logged and reported as "no evidence", so the caller can still answer.
#[derive(Clone)]
pub struct Retriever {
    index: Arc<dyn VectorIndex>,
    collection: String,
    threshold: f32,
    top_k: usize,
    policy: FailurePolicy,
}

impl Retriever {
    pub fn new(index: Arc<dyn VectorIndex>, collection: impl Into<String>) -> Self {
        Self {
            index,
            collection: collection.into(),
            threshold: SIMILARITY_THRESHOLD,
            top_k: DEFAULT_TOP_K,
            policy: FailurePolicy::Degrade,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Search with the configured result cap.
    pub async fn search(&self, vector: &[f32]) -> AppResult<Vec<SearchHit>> {
        self.search_top_k(vector, self.top_k).await
    }

    /// Search returning at most `top_k` hits scoring at or above the threshold,
    /// best first.
    pub async fn search_top_k(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<SearchHit>> {
        let request = SearchRequest {
            collection: &self.collection,
            vector,
            limit: top_k,
            score_threshold: self.threshold,
        };

        match self.index.search(&request).await {
            Ok(mut hits) => {
                // Backends are trusted for order, not for the cutoff
                hits.retain(|hit| hit.score >= self.threshold);
                hits.truncate(top_k);

                tracing::debug!(
                    backend = self.index.backend_name(),
                    collection = %self.collection,
                    hits = hits.len(),
                    "Vector search complete"
                );
                Ok(hits)
            }
            Err(e) if self.policy.degrades() => {
                tracing::warn!(
                    backend = self.index.backend_name(),
                    error = %e,
                    "Vector search failed, continuing without context"
                );
                Ok(Vec::new())
            }
            Err(e) => Err(AppError::Retrieval(e.to_string())),
        }
    }
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("backend", &self.index.backend_name())
            .field("collection", &self.collection)
            .field("threshold", &self.threshold)
            .field("top_k", &self.top_k)
            .field("policy", &self.policy)
            .finish()
    }
}
