//! Vector index abstraction.
//!
//! Defines a trait for provider-agnostic similarity search over an already
//! populated collection.

use crate::rag::types::SearchHit;
use assistant_core::AppResult;

/// Parameters of a single similarity search.
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'a> {
    pub collection: &'a str,
    pub vector: &'a [f32],
    pub limit: usize,
    /// Hits scoring below this are excluded by the backend
    pub score_threshold: f32,
}

/// Trait for vector index backends.
///
/// Implementations must return at most `limit` hits, all scoring at or above
/// `score_threshold`, ordered by descending score.
#[async_trait::async_trait]
pub trait VectorIndex: Send + Sync {
    /// Backend name used in logs and errors (e.g., "qdrant").
    fn backend_name(&self) -> &str;

    async fn search(&self, request: &SearchRequest<'_>) -> AppResult<Vec<SearchHit>>;
}

/// Cosine similarity between two vectors; 0.0 for mismatched or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_bounds() {
        assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
