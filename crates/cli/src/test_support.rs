//! Offline pipeline used by the command and server tests.

use assistant_core::{AppError, AppResult};
use assistant_knowledge::embeddings::providers::mock::MockProvider;
use assistant_knowledge::{
    AnswerGenerator, DocumentPayload, EmbeddingProvider, MemoryIndex, RagPipeline, Retriever,
    StoredPoint,
};
use assistant_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::sync::Arc;

const DIMENSIONS: usize = 64;

/// Upstream detail carried by the failing doubles. Must never reach a user.
pub const UPSTREAM_DETAIL: &str = "stack trace: boom at 10.0.0.7";

pub struct EchoLlm {
    pub fail: bool,
}

#[async_trait::async_trait]
impl LlmClient for EchoLlm {
    fn provider_name(&self) -> &str {
        "echo"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        if self.fail {
            return Err(AppError::provider("echo", Some(500), UPSTREAM_DETAIL));
        }
        Ok(LlmResponse {
            content: "eduroam lets you roam.".to_string(),
            model: request.model.clone(),
            usage: LlmUsage::new(1, 1),
        })
    }
}

#[derive(Debug)]
pub struct BrokenEmbedder;

#[async_trait::async_trait]
impl EmbeddingProvider for BrokenEmbedder {
    fn provider_name(&self) -> &str {
        "broken"
    }

    fn model_name(&self) -> &str {
        "broken"
    }

    fn dimensions(&self) -> usize {
        DIMENSIONS
    }

    async fn embed(&self, _text: &str) -> AppResult<Vec<f32>> {
        Err(AppError::provider("huggingface", Some(503), UPSTREAM_DETAIL))
    }
}

async fn eduroam_index(embedder: &MockProvider) -> MemoryIndex {
    let mut index = MemoryIndex::new();
    for (record_id, text) in [
        ("A", "eduroam roaming access for research and education"),
        ("A", "eduroam roaming credentials for visitors"),
    ] {
        index.insert(
            "docs",
            StoredPoint {
                vector: embedder.embed(text).await.unwrap(),
                payload: DocumentPayload {
                    record_id: record_id.to_string(),
                    title: Some("eduroam Overview".to_string()),
                    content: text.to_string(),
                    ..Default::default()
                },
            },
        );
    }
    index
}

/// Pipeline over a two-passage eduroam corpus, answering with [`EchoLlm`].
pub async fn pipeline(fail_llm: bool) -> RagPipeline {
    let embedder = MockProvider::new(DIMENSIONS);
    let index = eduroam_index(&embedder).await;
    RagPipeline::new(
        Arc::new(embedder),
        Retriever::new(Arc::new(index), "docs"),
        AnswerGenerator::new(Arc::new(EchoLlm { fail: fail_llm }), "test-model"),
    )
}

/// Same corpus, but every embedding call fails upstream.
pub async fn pipeline_with_broken_embedder() -> RagPipeline {
    let index = eduroam_index(&MockProvider::new(DIMENSIONS)).await;
    RagPipeline::new(
        Arc::new(BrokenEmbedder),
        Retriever::new(Arc::new(index), "docs"),
        AnswerGenerator::new(Arc::new(EchoLlm { fail: false }), "test-model"),
    )
}
