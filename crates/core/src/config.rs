//! Configuration management for the knowledge assistant.
//!
//! This module handles loading and merging configuration from multiple sources,
//! lowest precedence first:
//! - Built-in defaults
//! - Config file (YAML, via `ASSISTANT_CONFIG` or `--config`)
//! - Environment variables
//! - Command-line flags
//!
//! Credentials are only ever read from the environment; they are never
//! deserialized from or serialized to config files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::policy::FailurePolicy;

/// Default Qdrant collection holding the document corpus.
pub const DEFAULT_COLLECTION: &str = "geant_documents";

/// Default HuggingFace feature-extraction endpoint (all-MiniLM-L6-v2, 384 dims).
pub const DEFAULT_EMBEDDING_ENDPOINT: &str = "https://router.huggingface.co/hf-inference/models/sentence-transformers/all-MiniLM-L6-v2/pipeline/feature-extraction";

/// Default completion model served by Groq.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Completion providers the factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 2] = ["groq", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Completion provider ("groq" or "ollama")
    pub provider: String,

    /// Completion model identifier
    pub model: String,

    /// Address the HTTP API binds to
    pub bind: String,

    /// Optional YAML file overriding the built-in prompts
    pub prompts_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    pub embedding: EmbeddingSettings,
    pub vector_index: VectorIndexSettings,
    pub retrieval: RetrievalSettings,
    pub generation: GenerationSettings,
    pub session: SessionSettings,
}

/// Embedding service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbeddingSettings {
    /// "huggingface" or "mock"
    pub provider: String,

    pub endpoint: String,

    /// Expected vector dimensionality
    pub dimensions: usize,

    /// Whether an embedding failure aborts the request or degrades to an
    /// ungrounded answer
    pub failure_policy: FailurePolicy,

    /// Bearer credential (`HF_API_KEY`)
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "huggingface".to_string(),
            endpoint: DEFAULT_EMBEDDING_ENDPOINT.to_string(),
            dimensions: 384,
            failure_policy: FailurePolicy::Propagate,
            api_key: None,
        }
    }
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VectorIndexSettings {
    /// "qdrant" or "memory"
    pub backend: String,

    /// Qdrant REST endpoint (`QDRANT_URL`)
    pub url: Option<String>,

    pub collection: String,

    /// JSONL point snapshot loaded by the in-memory backend
    pub snapshot: Option<PathBuf>,

    /// Qdrant credential (`QDRANT_API_KEY`)
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for VectorIndexSettings {
    fn default() -> Self {
        Self {
            backend: "qdrant".to_string(),
            url: None,
            collection: DEFAULT_COLLECTION.to_string(),
            snapshot: None,
            api_key: None,
        }
    }
}

/// Retrieval tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetrievalSettings {
    /// Minimum similarity score a hit must reach to count as evidence
    pub similarity_threshold: f32,

    /// Maximum number of hits requested from the index
    pub top_k: usize,

    /// Maximum number of unique sources cited per answer
    pub max_sources: usize,

    pub failure_policy: FailurePolicy,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.3,
            top_k: 5,
            max_sources: 3,
            failure_policy: FailurePolicy::Degrade,
        }
    }
}

/// Completion call tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationSettings {
    /// Custom provider endpoint
    pub endpoint: Option<String>,

    pub temperature: f32,

    pub max_tokens: u32,

    /// Completion credential (`GROQ_API_KEY`)
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            temperature: 0.4,
            max_tokens: 1024,
            api_key: None,
        }
    }
}

/// Caller-side session limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Questions allowed per session before a reset is required
    pub max_questions: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { max_questions: 5 }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    provider: Option<String>,
    model: Option<String>,
    bind: Option<String>,
    prompts_file: Option<PathBuf>,
    logging: Option<LoggingConfig>,
    embedding: Option<EmbeddingSettings>,
    vector_index: Option<VectorIndexSettings>,
    retrieval: Option<RetrievalSettings>,
    generation: Option<GenerationSettings>,
    session: Option<SessionSettings>,
}

#[derive(Debug, Clone, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            provider: "groq".to_string(),
            model: DEFAULT_MODEL.to_string(),
            bind: "127.0.0.1:3000".to_string(),
            prompts_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
            embedding: EmbeddingSettings::default(),
            vector_index: VectorIndexSettings::default(),
            retrieval: RetrievalSettings::default(),
            generation: GenerationSettings::default(),
            session: SessionSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment and defaults.
    ///
    /// Environment variables:
    /// - `ASSISTANT_CONFIG`: Path to a YAML config file
    /// - `ASSISTANT_PROVIDER`: Completion provider
    /// - `ASSISTANT_MODEL`: Completion model
    /// - `ASSISTANT_BIND`: HTTP bind address
    /// - `QDRANT_URL`, `QDRANT_API_KEY`, `QDRANT_COLLECTION`: Vector index
    /// - `HF_API_KEY`: Embedding credential
    /// - `GROQ_API_KEY`: Completion credential
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use assistant_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None).expect("Failed to load config");
    /// println!("Collection: {}", config.vector_index.collection);
    /// ```
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        Self::load_with(config_file, |key| std::env::var(key).ok())
    }

    /// Load configuration using an arbitrary environment lookup.
    pub fn load_with<F>(config_file: Option<&Path>, env: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let config_path = config_file
            .map(Path::to_path_buf)
            .or_else(|| env("ASSISTANT_CONFIG").map(PathBuf::from));

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Config file does not exist: {:?}",
                    path
                )));
            }
            config = config.merge_yaml(&path)?;
            config.config_file = Some(path);
        }

        // Environment variables override YAML config
        if let Some(provider) = env("ASSISTANT_PROVIDER") {
            config.provider = provider;
        }

        if let Some(model) = env("ASSISTANT_MODEL") {
            config.model = model;
        }

        if let Some(bind) = env("ASSISTANT_BIND") {
            config.bind = bind;
        }

        if let Some(url) = env("QDRANT_URL") {
            config.vector_index.url = Some(url);
        }

        if let Some(collection) = env("QDRANT_COLLECTION") {
            config.vector_index.collection = collection;
        }

        if let Some(policy) = env("ASSISTANT_EMBEDDING_FAILURE_POLICY") {
            config.embedding.failure_policy = FailurePolicy::parse(&policy).ok_or_else(|| {
                AppError::Config(format!("Unknown failure policy: {}", policy))
            })?;
        }

        config.vector_index.api_key = non_empty(env("QDRANT_API_KEY"));
        config.embedding.api_key = non_empty(env("HF_API_KEY"));
        config.generation.api_key = non_empty(env("GROQ_API_KEY"));

        if let Some(level) = env("RUST_LOG") {
            config.log_level = Some(level);
        }

        // Check for NO_COLOR environment variable
        if env("NO_COLOR").is_some() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(provider) = config_file.provider {
            result.provider = provider;
        }
        if let Some(model) = config_file.model {
            result.model = model;
        }
        if let Some(bind) = config_file.bind {
            result.bind = bind;
        }
        if let Some(prompts_file) = config_file.prompts_file {
            result.prompts_file = Some(prompts_file);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(embedding) = config_file.embedding {
            result.embedding = embedding;
        }
        if let Some(vector_index) = config_file.vector_index {
            result.vector_index = vector_index;
        }
        if let Some(retrieval) = config_file.retrieval {
            result.retrieval = retrieval;
        }
        if let Some(generation) = config_file.generation {
            result.generation = generation;
        }
        if let Some(session) = config_file.session {
            result.session = session;
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        collection: Option<String>,
        bind: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(collection) = collection {
            self.vector_index.collection = collection;
        }

        if let Some(bind) = bind {
            self.bind = bind;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate configuration before serving requests.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();
        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if provider == "groq" && self.generation.api_key.is_none() {
            return Err(AppError::Config(
                "API key not found in environment variable: GROQ_API_KEY".to_string(),
            ));
        }

        match self.embedding.provider.as_str() {
            "huggingface" => {
                if self.embedding.api_key.is_none() {
                    return Err(AppError::Config(
                        "HF_API_KEY is required. Get a free key at https://huggingface.co/settings/tokens"
                            .to_string(),
                    ));
                }
            }
            "mock" => {}
            other => {
                return Err(AppError::Config(format!(
                    "Unknown embedding provider: {}. Supported: huggingface, mock",
                    other
                )));
            }
        }

        match self.vector_index.backend.as_str() {
            "qdrant" => {
                if self.vector_index.url.is_none() {
                    return Err(AppError::Config(
                        "Vector index URL not found in environment variable: QDRANT_URL"
                            .to_string(),
                    ));
                }
            }
            "memory" => {}
            other => {
                return Err(AppError::Config(format!(
                    "Unknown vector index backend: {}. Supported: qdrant, memory",
                    other
                )));
            }
        }

        let threshold = self.retrieval.similarity_threshold;
        if !(-1.0..=1.0).contains(&threshold) {
            return Err(AppError::Config(format!(
                "similarityThreshold must be within [-1, 1], got {}",
                threshold
            )));
        }

        if self.retrieval.top_k == 0 || self.retrieval.max_sources == 0 {
            return Err(AppError::Config(
                "topK and maxSources must be greater than zero".to_string(),
            ));
        }

        if self.session.max_questions == 0 {
            return Err(AppError::Config(
                "maxQuestions must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
