//! Knowledge Assistant CLI
//!
//! Main entry point for the `assistant` command-line tool.
//! Answers questions about a document corpus with cited sources, one-shot,
//! interactively, or over HTTP.

mod commands;
mod server;
mod session;
#[cfg(test)]
mod test_support;

use assistant_core::{config::AppConfig, logging, AppResult};
use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, ServeCommand};
use std::path::PathBuf;

/// Knowledge Assistant - grounded answers from your document collection
#[derive(Parser, Debug)]
#[command(name = "assistant")]
#[command(about = "Grounded answers from an indexed document collection", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "ASSISTANT_CONFIG")]
    config: Option<PathBuf>,

    /// Completion provider (groq, ollama)
    #[arg(short, long, global = true, env = "ASSISTANT_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "ASSISTANT_MODEL")]
    model: Option<String>,

    /// Vector collection to search
    #[arg(long, global = true, env = "QDRANT_COLLECTION")]
    collection: Option<String>,

    /// Address the HTTP server binds to
    #[arg(long, global = true, env = "ASSISTANT_BIND")]
    bind: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question
    Ask(AskCommand),

    /// Interactive session with a per-session question limit
    Chat(ChatCommand),

    /// Serve the chat API over HTTP
    Serve(ServeCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?.with_overrides(
        cli.provider,
        cli.model,
        cli.collection,
        cli.bind,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Knowledge assistant starting");
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);
    tracing::debug!("Collection: {}", config.vector_index.collection);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
        Commands::Serve(_) => "serve",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Serve(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
