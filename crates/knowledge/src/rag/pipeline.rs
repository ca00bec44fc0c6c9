//! Per-query orchestration of the answering stages.

use crate::embeddings::EmbeddingProvider;
use crate::rag::context::assemble;
use crate::rag::generator::AnswerGenerator;
use crate::rag::retriever::Retriever;
use crate::rag::sources::extract_sources;
use crate::rag::types::{Query, RagResponse, SearchHit, MAX_SOURCES};
use assistant_core::{AppResult, FailurePolicy};
use std::sync::Arc;

/// The answering pipeline: embed, retrieve, assemble, cite, generate.
///
/// Holds only shared, stateless handles, so one instance can serve any
/// number of concurrent requests.
#[derive(Debug)]
pub struct RagPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    embed_policy: FailurePolicy,
    retriever: Retriever,
    generator: AnswerGenerator,
    max_sources: usize,
}

impl RagPipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        retriever: Retriever,
        generator: AnswerGenerator,
    ) -> Self {
        Self {
            embedder,
            embed_policy: FailurePolicy::Propagate,
            retriever,
            generator,
            max_sources: MAX_SOURCES,
        }
    }

    /// How embedding failures are handled. `Degrade` answers ungrounded.
    pub fn with_embed_policy(mut self, policy: FailurePolicy) -> Self {
        self.embed_policy = policy;
        self
    }

    pub fn with_max_sources(mut self, max_sources: usize) -> Self {
        self.max_sources = max_sources;
        self
    }

    /// Answer a raw caller query.
    ///
    /// Blank input fails with `InvalidInput` before any service is contacted.
    /// Errors returned here may carry upstream detail; surfaces must map them
    /// through `AppError::public_message`.
    pub async fn answer(&self, raw: &str) -> AppResult<RagResponse> {
        let query = Query::parse(raw)?;
        self.answer_query(&query).await
    }

    pub async fn answer_query(&self, query: &Query) -> AppResult<RagResponse> {
        tracing::info!(query_len = query.as_str().len(), "Answering query");

        let hits = match self.embedder.embed(query.as_str()).await {
            Ok(vector) => self.retriever.search(&vector).await?,
            Err(e) if self.embed_policy.degrades() => {
                tracing::warn!(
                    provider = self.embedder.provider_name(),
                    error = %e,
                    "Embedding failed, answering without context"
                );
                Vec::new()
            }
            Err(e) => {
                tracing::error!(
                    provider = self.embedder.provider_name(),
                    error = %e,
                    "Embedding failed"
                );
                return Err(e);
            }
        };

        log_hits(&hits);

        let context = assemble(&hits);
        let sources = extract_sources(&hits, self.max_sources);

        let response = self
            .generator
            .generate(query.as_str(), context.as_deref(), sources)
            .await?;

        tracing::info!(
            grounded = response.is_grounded(),
            sources = response.sources.len(),
            "Answer generated"
        );
        Ok(response)
    }
}

fn log_hits(hits: &[SearchHit]) {
    match hits.first() {
        Some(best) => tracing::info!(
            hits = hits.len(),
            best_score = best.score,
            "Retrieved relevant passages"
        ),
        None => tracing::info!("No passages above the relevance threshold"),
    }
}
