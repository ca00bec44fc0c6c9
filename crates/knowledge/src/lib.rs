//! Retrieval-augmented answering over a pre-indexed document corpus.
//!
//! A query is embedded, matched against a vector collection with a relevance
//! cutoff, rendered into an evidence block with deduplicated citations, and
//! answered by a completion model under grounding rules.
//!
//! # Example
//! ```no_run
//! use assistant_core::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load(None)?;
//! let pipeline = assistant_knowledge::build_pipeline(&config)?;
//! let response = pipeline.answer("What is eduroam?").await?;
//! println!("{}", response.answer);
//! # Ok(())
//! # }
//! ```

pub mod embeddings;
pub mod memory_index;
pub mod qdrant_index;
pub mod rag;
pub mod vector_index;

#[cfg(test)]
mod tests;

pub use embeddings::{create_provider, EmbeddingProvider};
pub use memory_index::{MemoryIndex, StoredPoint};
pub use qdrant_index::QdrantIndex;
pub use rag::{
    AnswerGenerator, DocumentPayload, Query, RagPipeline, RagResponse, Retriever, SearchHit,
    SourceRef,
};
pub use vector_index::{SearchRequest, VectorIndex};

use assistant_core::config::VectorIndexSettings;
use assistant_core::{AppConfig, AppError, AppResult};
use assistant_prompt::{load_prompt_set, PromptSet};
use std::sync::Arc;

/// Create the vector index backend named in the settings.
pub fn create_index(settings: &VectorIndexSettings) -> AppResult<Arc<dyn VectorIndex>> {
    match settings.backend.as_str() {
        "qdrant" => {
            let url = settings
                .url
                .as_deref()
                .ok_or_else(|| AppError::Config("QDRANT_URL is required".to_string()))?;
            Ok(Arc::new(QdrantIndex::new(url, settings.api_key.clone())))
        }
        "memory" => {
            let index = match &settings.snapshot {
                Some(path) => MemoryIndex::load_jsonl(path, &settings.collection)?,
                None => {
                    tracing::warn!("In-memory index has no snapshot; every search will fail");
                    MemoryIndex::new()
                }
            };
            Ok(Arc::new(index))
        }
        other => Err(AppError::Config(format!(
            "Unknown vector index backend: '{}'. Supported backends: qdrant, memory",
            other
        ))),
    }
}

/// Wire a [`RagPipeline`] from configuration.
///
/// Missing credentials for the completion provider are reported here; a
/// missing embedding credential is reported on first use.
pub fn build_pipeline(config: &AppConfig) -> AppResult<RagPipeline> {
    let embedder = create_provider(&config.embedding)?;
    let index = create_index(&config.vector_index)?;

    let retriever = Retriever::new(index, config.vector_index.collection.as_str())
        .with_threshold(config.retrieval.similarity_threshold)
        .with_top_k(config.retrieval.top_k)
        .with_policy(config.retrieval.failure_policy);

    let client = assistant_llm::create_client(
        &config.provider,
        config.generation.endpoint.as_deref(),
        config.generation.api_key.as_deref(),
    )?;

    let prompts = match &config.prompts_file {
        Some(path) => load_prompt_set(path)?,
        None => PromptSet::default(),
    };

    let generator = AnswerGenerator::new(client, config.model.as_str())
        .with_temperature(config.generation.temperature)
        .with_max_tokens(config.generation.max_tokens)
        .with_prompts(prompts);

    tracing::debug!(
        embedder = embedder.provider_name(),
        backend = %config.vector_index.backend,
        collection = %config.vector_index.collection,
        provider = %config.provider,
        model = %config.model,
        embed_policy = config.embedding.failure_policy.as_str(),
        retrieval_policy = config.retrieval.failure_policy.as_str(),
        "Pipeline configured"
    );

    Ok(RagPipeline::new(embedder, retriever, generator)
        .with_embed_policy(config.embedding.failure_policy)
        .with_max_sources(config.retrieval.max_sources))
}
