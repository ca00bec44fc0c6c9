//! Prompt system for the knowledge assistant.
//!
//! This crate owns the grounding prompts:
//! - A shared system prompt with the answering rules
//! - Grounded and ungrounded user templates (Handlebars)
//! - Optional YAML overrides for deployments with a different corpus

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{load_prompt_set, validate_prompt_set};
pub use types::{BuiltPrompt, BuiltPromptMetadata, Grounding, PromptSet};
