//! Embedding provider trait and factory.

use assistant_core::config::EmbeddingSettings;
use assistant_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "mock", "huggingface")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate the embedding for a single text.
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>>;
}

/// Create an embedding provider from configuration.
///
/// A missing credential is not an error here; the provider refuses at first
/// use instead, before any request is sent.
pub fn create_provider(settings: &EmbeddingSettings) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match settings.provider.as_str() {
        "huggingface" | "hf" => {
            let provider = super::providers::huggingface::HuggingFaceProvider::new(
                settings.endpoint.clone(),
                settings.api_key.clone(),
                settings.dimensions,
            );
            Ok(Arc::new(provider))
        }

        "mock" => {
            let provider = super::providers::mock::MockProvider::new(settings.dimensions);
            Ok(Arc::new(provider))
        }

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: huggingface, mock",
            settings.provider
        ))),
    }
}
