use super::doubles::{hit, CountingEmbedder, FailingLlm, ScriptedIndex, ScriptedLlm};
use crate::embeddings::providers::huggingface::HuggingFaceProvider;
use crate::embeddings::EmbeddingProvider;
use crate::rag::{AnswerGenerator, RagPipeline, Retriever};
use crate::vector_index::VectorIndex;
use assistant_core::error::SERVER_ERROR_MESSAGE;
use assistant_core::{AppConfig, AppError, FailurePolicy};
use assistant_llm::LlmClient;
use std::sync::Arc;

struct Harness {
    embedder: Arc<CountingEmbedder>,
    index: Arc<ScriptedIndex>,
    llm: Arc<ScriptedLlm>,
    pipeline: RagPipeline,
}

fn harness(embedder: CountingEmbedder, index: ScriptedIndex) -> Harness {
    let embedder = Arc::new(embedder);
    let index = Arc::new(index);
    let llm = Arc::new(ScriptedLlm::new("Here is what the documents say."));

    let pipeline = pipeline_with(embedder.clone(), index.clone(), llm.clone());
    Harness {
        embedder,
        index,
        llm,
        pipeline,
    }
}

fn pipeline_with(
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    llm: Arc<dyn LlmClient>,
) -> RagPipeline {
    RagPipeline::new(
        embedder,
        Retriever::new(index, "geant_documents"),
        AnswerGenerator::new(llm, "test-model"),
    )
}

fn eduroam_hits() -> Vec<crate::rag::SearchHit> {
    vec![
        hit("A", "eduroam Overview", "eduroam gives secure network access.", 0.81),
        hit("A", "eduroam Overview", "Visitors log in with home credentials.", 0.55),
        hit("B", "Roaming Security", "802.1X protects the exchange.", 0.32),
    ]
}

#[tokio::test]
async fn test_duplicate_record_is_cited_once() {
    let h = harness(
        CountingEmbedder::returning(vec![0.1, 0.2]),
        ScriptedIndex::returning(eduroam_hits()),
    );

    let response = h.pipeline.answer("What is eduroam?").await.unwrap();

    assert!(response.is_grounded());
    let titles: Vec<&str> = response.sources.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["eduroam Overview", "Roaming Security"]);

    let prompt = h.llm.last_request().unwrap().prompt;
    let first = prompt.find("[Source 1] Title: eduroam Overview").unwrap();
    let second = prompt.find("[Source 2] Title: eduroam Overview").unwrap();
    let third = prompt.find("[Source 3] Title: Roaming Security").unwrap();
    assert!(first < second && second < third);
}

#[tokio::test]
async fn test_no_hits_takes_ungrounded_branch() {
    let h = harness(
        CountingEmbedder::returning(vec![0.1, 0.2]),
        ScriptedIndex::returning(Vec::new()),
    );

    let response = h.pipeline.answer("What is eduroam?").await.unwrap();

    assert!(!response.is_grounded());
    assert!(response.sources.is_empty());
    let prompt = h.llm.last_request().unwrap().prompt;
    assert!(prompt.contains("No relevant documents were found"));
    assert!(!prompt.contains("[Source"));
}

#[tokio::test]
async fn test_blank_query_contacts_nothing() {
    let h = harness(
        CountingEmbedder::returning(vec![0.1]),
        ScriptedIndex::returning(eduroam_hits()),
    );

    for raw in ["", "   ", "\n\t"] {
        let err = h.pipeline.answer(raw).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(err.is_client_error());
    }

    assert_eq!(h.embedder.calls(), 0);
    assert_eq!(h.index.calls(), 0);
    assert_eq!(h.llm.calls(), 0);
}

#[tokio::test]
async fn test_index_outage_still_answers() {
    let h = harness(
        CountingEmbedder::returning(vec![0.1, 0.2]),
        ScriptedIndex::failing(),
    );

    let response = h.pipeline.answer("What is eduroam?").await.unwrap();

    assert_eq!(h.index.calls(), 1);
    assert!(!response.is_grounded());
    assert!(response.sources.is_empty());
    assert_eq!(response.answer, "Here is what the documents say.");
}

#[tokio::test]
async fn test_completion_failure_is_generic_server_error() {
    let index = Arc::new(ScriptedIndex::returning(eduroam_hits()));
    let pipeline = pipeline_with(
        Arc::new(CountingEmbedder::returning(vec![0.1, 0.2])),
        index.clone(),
        Arc::new(FailingLlm),
    );

    let err = pipeline.answer("What is eduroam?").await.unwrap_err();

    assert!(matches!(err, AppError::Generation(_)));
    assert!(!err.is_client_error());
    assert_eq!(err.public_message(), SERVER_ERROR_MESSAGE);
    assert!(!err.to_string().contains("exploded"));
    assert!(!err.to_string().contains("Bad Gateway"));
}

#[tokio::test]
async fn test_embedding_failure_propagates_by_default() {
    let h = harness(CountingEmbedder::failing(), ScriptedIndex::returning(eduroam_hits()));

    let err = h.pipeline.answer("What is eduroam?").await.unwrap_err();

    assert_eq!(err.upstream_status(), Some(503));
    assert_eq!(err.public_message(), SERVER_ERROR_MESSAGE);
    assert_eq!(h.index.calls(), 0);
    assert_eq!(h.llm.calls(), 0);
}

#[tokio::test]
async fn test_embedding_failure_can_degrade() {
    let embedder = Arc::new(CountingEmbedder::failing());
    let index = Arc::new(ScriptedIndex::returning(eduroam_hits()));
    let llm = Arc::new(ScriptedLlm::new("Nothing found."));
    let pipeline = pipeline_with(embedder, index.clone(), llm.clone())
        .with_embed_policy(FailurePolicy::Degrade);

    let response = pipeline.answer("What is eduroam?").await.unwrap();

    assert!(!response.is_grounded());
    assert!(response.sources.is_empty());
    assert_eq!(index.calls(), 0);
    assert_eq!(llm.calls(), 1);
}

#[tokio::test]
async fn test_missing_embedding_key_is_config_error() {
    let index = Arc::new(ScriptedIndex::returning(eduroam_hits()));
    let llm = Arc::new(ScriptedLlm::new("unused"));
    let embedder = Arc::new(HuggingFaceProvider::new("http://192.0.2.1:9/embed", None, 384));
    let pipeline = pipeline_with(embedder, index.clone(), llm.clone());

    let err = pipeline.answer("What is eduroam?").await.unwrap_err();

    assert!(matches!(err, AppError::Config(_)));
    assert_eq!(index.calls(), 0);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_max_sources_is_configurable() {
    let hits = vec![
        hit("1", "One", "a", 0.9),
        hit("2", "Two", "b", 0.8),
        hit("3", "Three", "c", 0.7),
    ];
    let h = harness(CountingEmbedder::returning(vec![1.0]), ScriptedIndex::returning(hits));
    let pipeline = h.pipeline.with_max_sources(1);

    let response = pipeline.answer("q").await.unwrap();
    assert_eq!(response.sources.len(), 1);
    assert_eq!(response.sources[0].title, "One");
}

#[tokio::test]
async fn test_build_pipeline_offline() {
    let mut snapshot = tempfile::NamedTempFile::new().unwrap();
    let embedder = crate::embeddings::providers::mock::MockProvider::new(64);
    let vector = embedder
        .embed("eduroam roaming access for research and education")
        .await
        .unwrap();
    let point = serde_json::json!({
        "vector": vector,
        "payload": {
            "record_id": "A",
            "title": "eduroam Overview",
            "content": "eduroam is a roaming access service for research and education."
        }
    });
    std::io::Write::write_all(&mut snapshot, format!("{}\n", point).as_bytes()).unwrap();

    let mut config = AppConfig::default();
    config.provider = "ollama".to_string();
    config.embedding.provider = "mock".to_string();
    config.embedding.dimensions = 64;
    config.vector_index.backend = "memory".to_string();
    config.vector_index.snapshot = Some(snapshot.path().to_path_buf());

    assert!(crate::build_pipeline(&config).is_ok());
}

#[test]
fn test_build_pipeline_requires_qdrant_url() {
    let mut config = AppConfig::default();
    config.provider = "ollama".to_string();
    config.embedding.provider = "mock".to_string();

    let err = crate::build_pipeline(&config).unwrap_err();
    assert!(err.to_string().contains("QDRANT_URL"));
}

#[test]
fn test_build_pipeline_requires_groq_key() {
    let mut config = AppConfig::default();
    config.embedding.provider = "mock".to_string();
    config.vector_index.backend = "memory".to_string();

    let err = crate::build_pipeline(&config).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
    assert!(err.to_string().contains("GROQ_API_KEY"));
}
