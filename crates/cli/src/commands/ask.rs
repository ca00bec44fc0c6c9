//! Ask command handler.
//!
//! Answers one question and prints the answer with its sources.

use crate::session::TURN_FAILED_MESSAGE;
use assistant_core::{config::AppConfig, AppError, AppResult};
use assistant_knowledge::{build_pipeline, RagPipeline, RagResponse, SourceRef};
use clap::Args;
use std::path::PathBuf;

/// Ask a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// Output the `{answer, sources}` response as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let question = self.get_question()?;
        let pipeline = build_pipeline(config)?;

        match self.respond(&pipeline, &question).await {
            Ok(output) => {
                print!("{}", output);
                Ok(())
            }
            Err(failure) => {
                println!("{}", failure.output);
                Err(failure.error)
            }
        }
    }

    /// Answer one question and render it for the terminal.
    ///
    /// On failure the full error is logged and only a fixed message is
    /// rendered. The returned error carries the caller-safe text so the
    /// process still exits non-zero.
    pub(crate) async fn respond(
        &self,
        pipeline: &RagPipeline,
        question: &str,
    ) -> Result<String, AskFailure> {
        match pipeline.answer(question).await {
            Ok(response) => self.render(&response).map_err(|e| self.failure(e)),
            Err(e) => Err(self.failure(e)),
        }
    }

    fn render(&self, response: &RagResponse) -> AppResult<String> {
        if self.json {
            Ok(format!("{}\n", serde_json::to_string_pretty(response)?))
        } else {
            Ok(render_response(response))
        }
    }

    fn failure(&self, error: AppError) -> AskFailure {
        tracing::error!(error = %error, "Question failed");

        let message = failure_message(&error);
        let output = if self.json {
            serde_json::json!({ "error": error.public_message() }).to_string()
        } else {
            message.to_string()
        };

        AskFailure {
            output,
            error: AppError::Other(error.public_message().to_string()),
        }
    }

    /// Get the question text from the argument or file.
    fn get_question(&self) -> AppResult<String> {
        if let Some(question) = &self.question {
            return Ok(question.clone());
        }

        match &self.file {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                AppError::InvalidInput(format!("Failed to read question file {:?}: {}", path, e))
            }),
            None => Err(AppError::InvalidInput("No question provided".to_string())),
        }
    }
}

/// A failed question: what to print, and the error to exit with.
#[derive(Debug)]
pub(crate) struct AskFailure {
    pub output: String,
    pub error: AppError,
}

/// Terminal text for a failed question.
pub(crate) fn failure_message(error: &AppError) -> &'static str {
    if error.is_client_error() {
        error.public_message()
    } else {
        TURN_FAILED_MESSAGE
    }
}

/// Plain-text rendering shared by `ask` and `chat`.
pub(crate) fn render_response(response: &RagResponse) -> String {
    let mut out = format!("{}\n", response.answer.trim_end());

    if !response.sources.is_empty() {
        out.push_str("\nSources:\n");
        for (i, source) in response.sources.iter().enumerate() {
            out.push_str(&format!("  [{}] {}\n", i + 1, render_source(source)));
        }
    }

    out
}

fn render_source(source: &SourceRef) -> String {
    let mut line = source.title.clone();
    if let Some(authors) = &source.authors {
        line.push_str(&format!(" ({})", authors));
    }
    if let Some(url) = &source.url {
        line.push_str(&format!("\n      {}", url));
    }
    if let Some(doi) = &source.doi {
        line.push_str(&format!("\n      DOI: {}", doi));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, UPSTREAM_DETAIL};

    fn ask(json: bool) -> AskCommand {
        AskCommand {
            question: None,
            file: None,
            json,
        }
    }

    #[test]
    fn test_render_without_sources() {
        let response = RagResponse {
            answer: "I could not find anything on that.\n".to_string(),
            sources: Vec::new(),
            grounding: None,
        };
        assert_eq!(render_response(&response), "I could not find anything on that.\n");
    }

    #[test]
    fn test_render_with_sources() {
        let response = RagResponse {
            answer: "eduroam is a roaming service.".to_string(),
            sources: vec![
                SourceRef {
                    title: "eduroam Overview".to_string(),
                    authors: Some("J. Doe".to_string()),
                    url: Some("https://zenodo.org/records/1".to_string()),
                    doi: Some("10.5281/zenodo.1".to_string()),
                },
                SourceRef {
                    title: "report.pdf".to_string(),
                    authors: None,
                    url: None,
                    doi: None,
                },
            ],
            grounding: None,
        };

        let text = render_response(&response);
        assert!(text.contains("Sources:"));
        assert!(text.contains("[1] eduroam Overview (J. Doe)"));
        assert!(text.contains("https://zenodo.org/records/1"));
        assert!(text.contains("DOI: 10.5281/zenodo.1"));
        assert!(text.contains("[2] report.pdf\n"));
    }

    #[test]
    fn test_missing_question_is_invalid_input() {
        let cmd = AskCommand {
            question: None,
            file: None,
            json: false,
        };
        assert!(matches!(cmd.get_question(), Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_answer_is_rendered_with_sources() {
        let pipeline = test_support::pipeline(false).await;
        let output = ask(false)
            .respond(&pipeline, "eduroam roaming access")
            .await
            .unwrap();

        assert!(output.starts_with("eduroam lets you roam.\n"));
        assert!(output.contains("[1] eduroam Overview"));
    }

    #[tokio::test]
    async fn test_generation_failure_prints_fixed_message() {
        let pipeline = test_support::pipeline(true).await;
        let failure = ask(false)
            .respond(&pipeline, "eduroam roaming access")
            .await
            .unwrap_err();

        assert_eq!(failure.output, TURN_FAILED_MESSAGE);
        assert!(!failure.error.to_string().contains("boom"));
        assert!(!format!("{:?}", failure.error).contains(UPSTREAM_DETAIL));
    }

    #[tokio::test]
    async fn test_embedding_failure_hides_upstream_detail() {
        let pipeline = test_support::pipeline_with_broken_embedder().await;

        for json in [false, true] {
            let failure = ask(json)
                .respond(&pipeline, "eduroam roaming access")
                .await
                .unwrap_err();

            assert!(!failure.output.contains(UPSTREAM_DETAIL), "json: {}", json);
            assert!(!failure.output.contains("huggingface"), "json: {}", json);
            assert!(!format!("{:?}", failure.error).contains(UPSTREAM_DETAIL));
            assert!(matches!(failure.error, AppError::Other(_)));
        }
    }

    #[tokio::test]
    async fn test_json_failure_uses_public_message() {
        let pipeline = test_support::pipeline_with_broken_embedder().await;
        let failure = ask(true)
            .respond(&pipeline, "eduroam roaming access")
            .await
            .unwrap_err();

        let body: serde_json::Value = serde_json::from_str(&failure.output).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"error": assistant_core::error::SERVER_ERROR_MESSAGE})
        );
    }

    #[tokio::test]
    async fn test_blank_question_prints_invalid_message() {
        let pipeline = test_support::pipeline(false).await;
        let failure = ask(false).respond(&pipeline, "   ").await.unwrap_err();

        assert_eq!(failure.output, "Invalid message");
        assert_eq!(failure.error.to_string(), "Invalid message");
    }
}
