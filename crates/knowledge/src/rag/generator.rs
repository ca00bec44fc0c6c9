//! Grounding-aware answer generation.

use crate::rag::types::{RagResponse, SourceRef};
use assistant_core::{AppError, AppResult};
use assistant_llm::{LlmClient, LlmRequest};
use assistant_prompt::{build_prompt, Grounding, PromptSet};
use std::sync::Arc;

/// Default sampling temperature for answers.
pub const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Default cap on generated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Generic message carried by [`AppError::Generation`]; upstream detail stays in the logs.
const GENERATION_FAILED: &str = "Failed to generate response";

/// Composes the prompt pair for a turn and calls the completion service.
///
/// Failures are never absorbed here: a broken answer channel leaves nothing
/// useful to return.
pub struct AnswerGenerator {
    client: Arc<dyn LlmClient>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    prompts: PromptSet,
}

impl AnswerGenerator {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            prompts: PromptSet::default(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_prompts(mut self, prompts: PromptSet) -> Self {
        self.prompts = prompts;
        self
    }

    /// Generate an answer.
    ///
    /// With `context` the grounded template is used and `sources` are
    /// returned as-is. Without it the ungrounded template is used and the
    /// returned source list is empty whatever was passed in.
    pub async fn generate(
        &self,
        query: &str,
        context: Option<&str>,
        sources: Vec<SourceRef>,
    ) -> AppResult<RagResponse> {
        let prompt = build_prompt(&self.prompts, query, context)?;
        let grounding = prompt.metadata.grounding;

        let request = LlmRequest::new(prompt.user, self.model.as_str())
            .with_system(prompt.system)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        tracing::debug!(
            provider = self.client.provider_name(),
            model = %self.model,
            prompt_id = %prompt.metadata.source_prompt_id,
            ?grounding,
            "Requesting completion"
        );

        let response = self.client.complete(&request).await.map_err(|e| {
            tracing::error!(
                provider = self.client.provider_name(),
                error = %e,
                "Completion request failed"
            );
            AppError::Generation(GENERATION_FAILED.to_string())
        })?;

        tracing::debug!(
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "Completion usage"
        );

        let sources = match grounding {
            Grounding::Grounded => sources,
            Grounding::Ungrounded => Vec::new(),
        };

        Ok(RagResponse::new(response.content, sources, grounding))
    }
}

impl std::fmt::Debug for AnswerGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerGenerator")
            .field("provider", &self.client.provider_name())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("prompt_set", &self.prompts.id)
            .finish()
    }
}
