//! Serve command handler.

use crate::server::run_server;
use assistant_core::{config::AppConfig, AppError, AppResult};
use assistant_knowledge::build_pipeline;
use clap::Args;
use std::sync::Arc;

/// Serve the chat API over HTTP
#[derive(Args, Debug)]
pub struct ServeCommand {}

impl ServeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        // Refuse to start with missing credentials rather than failing per request
        config.validate()?;

        let pipeline = Arc::new(build_pipeline(config)?);
        tracing::info!(
            collection = %config.vector_index.collection,
            provider = %config.provider,
            "Starting HTTP server"
        );

        run_server(&config.bind, pipeline)
            .await
            .map_err(|e| AppError::Other(format!("{:#}", e)))
    }
}
