//! Groq completion provider.
//!
//! Groq exposes an OpenAI-compatible chat completions API:
//! https://console.groq.com/docs/api-reference#chat-create

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use assistant_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const DEFAULT_GROQ_URL: &str = "https://api.groq.com/openai/v1";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: String,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Groq chat completions client.
pub struct GroqClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GroqClient {
    /// Create a client against the public Groq endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_GROQ_URL, api_key)
    }

    /// Create a client against a custom OpenAI-compatible endpoint.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn to_chat_request<'a>(&self, request: &'a LlmRequest) -> ChatCompletionRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        ChatCompletionRequest {
            model: &request.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    fn convert_response(
        &self,
        request: &LlmRequest,
        response: ChatCompletionResponse,
    ) -> AppResult<LlmResponse> {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::provider("groq", None, "Response contained no choices"))?;

        let usage = response
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let model = if response.model.is_empty() {
            request.model.clone()
        } else {
            response.model
        };

        Ok(LlmResponse {
            content,
            model,
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for GroqClient {
    fn provider_name(&self) -> &str {
        "groq"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!(model = %request.model, "Sending completion request to Groq");

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.to_chat_request(request))
            .send()
            .await
            .map_err(|e| AppError::provider("groq", None, format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(status = status.as_u16(), body = %error_text, "Groq API error");
            return Err(AppError::provider(
                "groq",
                Some(status.as_u16()),
                format!("Groq API error: {}", error_text),
            ));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            AppError::provider("groq", None, format!("Failed to parse response: {}", e))
        })?;

        let converted = self.convert_response(request, body)?;
        tracing::debug!(
            "Token usage - Prompt: {}, Completion: {}, Total: {}",
            converted.usage.prompt_tokens,
            converted.usage.completion_tokens,
            converted.usage.total_tokens
        );

        Ok(converted)
    }
}
