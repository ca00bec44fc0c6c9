//! LLM integration crate for the knowledge assistant.
//!
//! Provides a provider-agnostic abstraction over chat completion services.
//!
//! # Providers
//! - **Groq**: hosted, OpenAI-compatible chat completions (default)
//! - **Ollama**: local LLM runtime
//!
//! # Example
//! ```no_run
//! use assistant_llm::{LlmClient, LlmRequest, providers::GroqClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GroqClient::new("gsk_...");
//! let request = LlmRequest::new("Hello, world!", "llama-3.1-8b-instant");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::{create_client, ProviderType};
pub use providers::{GroqClient, OllamaClient};
