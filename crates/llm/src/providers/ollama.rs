//! Ollama completion provider.
//!
//! Local alternative to the hosted provider, using Ollama's chat endpoint.
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md#generate-a-chat-completion

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use assistant_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Ollama chat request format.
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Ollama chat response format.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    model: String,
    message: OllamaMessage,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

/// Ollama LLM client.
pub struct OllamaClient {
    /// Base URL for Ollama API
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a new Ollama client with default settings.
    ///
    /// Default URL: http://localhost:11434
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_OLLAMA_URL)
    }

    /// Create a new Ollama client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn to_ollama_request(&self, request: &LlmRequest) -> OllamaChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(ref system) = request.system {
            messages.push(OllamaMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.push(OllamaMessage {
            role: "user".to_string(),
            content: request.prompt.clone(),
        });

        OllamaChatRequest {
            model: request.model.clone(),
            messages,
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        }
    }

    fn convert_response(&self, response: OllamaChatResponse) -> LlmResponse {
        LlmResponse {
            content: response.message.content,
            model: response.model,
            usage: LlmUsage::new(
                response.prompt_eval_count.unwrap_or(0),
                response.eval_count.unwrap_or(0),
            ),
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!(model = %request.model, "Sending completion request to Ollama");

        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&self.to_ollama_request(request))
            .send()
            .await
            .map_err(|e| {
                AppError::provider("ollama", None, format!("Failed to send request: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(status = status.as_u16(), body = %error_text, "Ollama API error");
            return Err(AppError::provider(
                "ollama",
                Some(status.as_u16()),
                format!("Ollama API error: {}", error_text),
            ));
        }

        let ollama_response: OllamaChatResponse = response.json().await.map_err(|e| {
            AppError::provider("ollama", None, format!("Failed to parse response: {}", e))
        })?;

        tracing::debug!("Received completion from Ollama");

        Ok(self.convert_response(ollama_response))
    }
}
