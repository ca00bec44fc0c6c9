//! Knowledge Assistant Core Library
//!
//! This crate provides the foundational utilities shared by every other crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - Failure policies for external dependencies

pub mod config;
pub mod error;
pub mod logging;
pub mod policy;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use policy::FailurePolicy;
