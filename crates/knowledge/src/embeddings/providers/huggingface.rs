//! HuggingFace Inference embedding provider.
//!
//! Calls the hosted feature-extraction pipeline of a sentence-transformers
//! model. The router endpoint requires a bearer token.
//!
//! # Example
//! ```no_run
//! use assistant_knowledge::embeddings::EmbeddingProvider;
//! use assistant_knowledge::embeddings::providers::huggingface::HuggingFaceProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = HuggingFaceProvider::new(
//!     assistant_core::config::DEFAULT_EMBEDDING_ENDPOINT,
//!     std::env::var("HF_API_KEY").ok(),
//!     384,
//! );
//! let embedding = provider.embed("What is eduroam?").await?;
//! assert_eq!(embedding.len(), 384);
//! # Ok(())
//! # }
//! ```

use crate::embeddings::EmbeddingProvider;
use assistant_core::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

/// Request payload for the feature-extraction pipeline
#[derive(Debug, Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a str,
}

/// Shape of a feature-extraction response.
///
/// Depending on the model and router version the vector comes back flat or
/// wrapped in a single-row matrix.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingShape {
    Flat(Vec<f32>),
    Nested(Vec<Vec<f32>>),
}

impl EmbeddingShape {
    /// Resolve to a flat vector. A nested response must hold exactly one row.
    pub fn into_vector(self) -> AppResult<Vec<f32>> {
        match self {
            EmbeddingShape::Flat(vector) => Ok(vector),
            EmbeddingShape::Nested(mut rows) => {
                if rows.len() != 1 {
                    return Err(AppError::provider(
                        "huggingface",
                        None,
                        format!("Expected one embedding row, got {}", rows.len()),
                    ));
                }
                Ok(rows.remove(0))
            }
        }
    }
}

/// HuggingFace feature-extraction provider.
#[derive(Debug, Clone)]
pub struct HuggingFaceProvider {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    dimensions: usize,
}

impl HuggingFaceProvider {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, dimensions: usize) -> Self {
        let endpoint = endpoint.into();
        let model = model_from_endpoint(&endpoint);
        Self {
            client: Client::new(),
            endpoint,
            api_key,
            model,
            dimensions,
        }
    }
}

/// Extract `org/model` from `.../models/<org>/<model>/pipeline/...`.
fn model_from_endpoint(endpoint: &str) -> String {
    endpoint
        .split_once("/models/")
        .map(|(_, rest)| rest.split("/pipeline").next().unwrap_or(rest))
        .unwrap_or(endpoint)
        .to_string()
}

#[async_trait]
impl EmbeddingProvider for HuggingFaceProvider {
    fn provider_name(&self) -> &str {
        "huggingface"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[instrument(skip(self, text), fields(text_len = text.len(), model = %self.model))]
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Config(
                "HF_API_KEY is required. Get a free key at https://huggingface.co/settings/tokens"
                    .to_string(),
            )
        })?;

        debug!("Sending embedding request to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&FeatureExtractionRequest { inputs: text })
            .send()
            .await
            .map_err(|e| {
                AppError::provider("huggingface", None, format!("Failed to send request: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = status.as_u16(), body = %error_text, "HuggingFace API error");
            return Err(AppError::provider(
                "huggingface",
                Some(status.as_u16()),
                format!("Embedding API error: {}", status.as_u16()),
            ));
        }

        let shape: EmbeddingShape = response.json().await.map_err(|e| {
            AppError::provider("huggingface", None, format!("Failed to parse response: {}", e))
        })?;

        let embedding = shape.into_vector()?;

        if embedding.len() != self.dimensions {
            return Err(AppError::provider(
                "huggingface",
                None,
                format!(
                    "Unexpected embedding dimensions: got {}, expected {}",
                    embedding.len(),
                    self.dimensions
                ),
            ));
        }

        debug!("Generated {} dimensional embedding", embedding.len());
        Ok(embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_shape() {
        let shape: EmbeddingShape = serde_json::from_str("[0.1, 0.2, 0.3]").unwrap();
        assert_eq!(shape.into_vector().unwrap(), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_nested_single_row_is_unwrapped() {
        let shape: EmbeddingShape = serde_json::from_str("[[0.1, 0.2, 0.3]]").unwrap();
        assert!(matches!(shape, EmbeddingShape::Nested(_)));
        assert_eq!(shape.into_vector().unwrap(), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_nested_multi_row_is_rejected() {
        let shape: EmbeddingShape = serde_json::from_str("[[0.1], [0.2]]").unwrap();
        assert!(shape.into_vector().is_err());
    }

    #[test]
    fn test_model_from_endpoint() {
        assert_eq!(
            model_from_endpoint(assistant_core::config::DEFAULT_EMBEDDING_ENDPOINT),
            "sentence-transformers/all-MiniLM-L6-v2"
        );
        assert_eq!(model_from_endpoint("http://localhost:8080/embed"), "http://localhost:8080/embed");
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        // Unroutable endpoint: reaching the network would surface a provider error instead
        let provider = HuggingFaceProvider::new("http://192.0.2.1:9/embed", None, 384);
        let result = provider.embed("What is eduroam?").await;
        match result {
            Err(AppError::Config(msg)) => assert!(msg.contains("HF_API_KEY")),
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }
}
