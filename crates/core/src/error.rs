//! Error types for the knowledge assistant.
//!
//! This module defines a unified error enum covering every failure class the
//! answering pipeline distinguishes: bad caller input, missing configuration,
//! upstream provider failures, generation failures and degraded retrieval.

use thiserror::Error;

/// Unified error type for the knowledge assistant.
///
/// All fallible functions return `Result<T, AppError>`.
/// Display strings may contain upstream detail and are meant for logs only;
/// outward-facing surfaces map errors through [`AppError::public_message`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or missing query supplied by the caller
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing credential or invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream HTTP or network failure from an external service
    #[error("{provider} provider error{}: {message}", fmt_status(.status))]
    Provider {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    /// Completion service failed to produce an answer
    #[error("Generation error: {0}")]
    Generation(String),

    /// Vector search failed; normally absorbed into an empty result set
    #[error("Retrieval degraded: {0}")]
    Retrieval(String),

    /// Prompt rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

/// Message returned to callers for malformed queries.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid message";

/// Message returned to callers for every server-side failure.
pub const SERVER_ERROR_MESSAGE: &str = "An error occurred processing your request";

impl AppError {
    /// Build a provider error with an optional upstream status code.
    pub fn provider(
        provider: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        AppError::Provider {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Whether the caller caused this error (4xx class).
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::InvalidInput(_))
    }

    /// Upstream status code, when the error came from an HTTP response.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AppError::Provider { status, .. } => *status,
            _ => None,
        }
    }

    /// Caller-safe message. Never includes upstream payloads or internals.
    pub fn public_message(&self) -> &'static str {
        if self.is_client_error() {
            INVALID_INPUT_MESSAGE
        } else {
            SERVER_ERROR_MESSAGE
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display_includes_status() {
        let err = AppError::provider("huggingface", Some(503), "Service Unavailable");
        assert_eq!(
            err.to_string(),
            "huggingface provider error (503): Service Unavailable"
        );
        assert_eq!(err.upstream_status(), Some(503));
    }

    #[test]
    fn test_provider_error_display_without_status() {
        let err = AppError::provider("qdrant", None, "connection refused");
        assert_eq!(err.to_string(), "qdrant provider error: connection refused");
        assert_eq!(err.upstream_status(), None);
    }

    #[test]
    fn test_public_message_hides_detail() {
        let err = AppError::Generation("upstream said: secret stack trace".to_string());
        assert!(!err.is_client_error());
        assert_eq!(err.public_message(), SERVER_ERROR_MESSAGE);

        let err = AppError::InvalidInput("empty query".to_string());
        assert!(err.is_client_error());
        assert_eq!(err.public_message(), INVALID_INPUT_MESSAGE);
    }
}
