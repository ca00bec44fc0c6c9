//! LLM provider factory.
//!
//! Resolves a provider name from configuration into a shared client handle,
//! failing fast when a required credential is missing.

use crate::client::LlmClient;
use crate::providers::{GroqClient, OllamaClient};
use assistant_core::{AppError, AppResult};
use std::sync::Arc;

/// Provider type enum for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Groq,
    Ollama,
}

impl ProviderType {
    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "groq" => Some(Self::Groq),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::Ollama => "ollama",
        }
    }
}

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("groq", "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key (required by Groq)
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or its credential is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    tracing::debug!(provider = provider_type.as_str(), ?endpoint, "Creating completion client");

    match provider_type {
        ProviderType::Groq => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config("Groq provider requires GROQ_API_KEY".to_string())
            })?;
            let client = match endpoint {
                Some(url) => GroqClient::with_base_url(url, api_key),
                None => GroqClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        ProviderType::Ollama => {
            let client = match endpoint {
                Some(url) => OllamaClient::with_base_url(url),
                None => OllamaClient::new(),
            };
            Ok(Arc::new(client))
        }
    }
}
