//! Query embedding.
//!
//! Turns a user question into a dense vector using the same model that
//! produced the indexed passages.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
