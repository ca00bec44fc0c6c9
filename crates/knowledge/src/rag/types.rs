//! RAG data model: queries, search hits, source references and responses.

use assistant_core::{AppError, AppResult};
use assistant_prompt::Grounding;
use serde::{Deserialize, Deserializer, Serialize};

/// Minimum similarity score for a hit to count as usable evidence.
pub const SIMILARITY_THRESHOLD: f32 = 0.3;

/// Default number of hits requested from the vector index.
pub const DEFAULT_TOP_K: usize = 5;

/// Maximum number of unique sources cited per answer.
pub const MAX_SOURCES: usize = 3;

/// A validated, non-blank user question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Validate raw caller input.
    ///
    /// Rejects empty and whitespace-only input. The text is kept as given.
    pub fn parse(raw: &str) -> AppResult<Self> {
        if raw.trim().is_empty() {
            return Err(AppError::InvalidInput("Query must not be empty".to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Payload stored alongside each indexed passage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPayload {
    /// Stable identity of the source work; several passages may share it
    #[serde(default, deserialize_with = "string_or_number")]
    pub record_id: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub content: String,

    #[serde(default, deserialize_with = "authors_list")]
    pub authors: Option<String>,

    /// Canonical landing page of the work
    #[serde(default, alias = "url")]
    pub zenodo_url: Option<String>,

    #[serde(default)]
    pub doi: Option<String>,

    #[serde(default)]
    pub file_name: Option<String>,
}

impl DocumentPayload {
    /// Display title, falling back to the file name.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or(self.file_name.as_deref())
            .unwrap_or("Untitled document")
    }
}

/// A single ranked match returned by the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Similarity score, higher is more relevant
    pub score: f32,

    pub payload: DocumentPayload,
}

/// A cited work, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

impl From<&DocumentPayload> for SourceRef {
    fn from(payload: &DocumentPayload) -> Self {
        Self {
            title: payload.display_title().to_string(),
            authors: payload.authors.clone(),
            url: payload.zenodo_url.clone(),
            doi: payload.doi.clone(),
        }
    }
}

/// Response from the answering pipeline.
///
/// Serializes to exactly `{answer, sources}`; the remaining fields are for
/// logging and tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResponse {
    /// Natural language answer synthesized by the LLM
    pub answer: String,

    /// Cited works, empty when the answer is ungrounded
    pub sources: Vec<SourceRef>,

    /// Internal: which prompt branch produced the answer
    #[serde(skip)]
    pub grounding: Option<Grounding>,
}

impl RagResponse {
    pub fn new(answer: String, sources: Vec<SourceRef>, grounding: Grounding) -> Self {
        Self {
            answer,
            sources,
            grounding: Some(grounding),
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.grounding == Some(Grounding::Grounded)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Int(i64),
    Float(f64),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<StringOrNumber> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(StringOrNumber::Str(s)) => s,
        Some(StringOrNumber::Int(n)) => n.to_string(),
        Some(StringOrNumber::Float(f)) => f.to_string(),
        None => String::new(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Authors {
    One(String),
    Many(Vec<String>),
}

fn authors_list<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Authors> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Authors::One(s)) => Some(s),
        Some(Authors::Many(names)) => Some(names.join(", ")),
        None => None,
    }
    .filter(|s| !s.trim().is_empty()))
}
