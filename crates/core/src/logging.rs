//! Logging infrastructure for the knowledge assistant.
//!
//! Initializes the tracing subscriber for structured logging. All logs go to
//! stderr so that `ask --json` output on stdout stays machine-readable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Default filter when neither `RUST_LOG` nor an override is given.
///
/// Keeps our crates at info while silencing chatty HTTP internals.
const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn";

/// Initialize the tracing subscriber with stderr output.
///
/// # Arguments
/// * `log_level` - Optional filter override (e.g., "debug", "assistant_knowledge=trace")
/// * `no_color` - Disable colored output
///
/// # Example
/// ```no_run
/// use assistant_core::logging::init_logging;
///
/// init_logging(None, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: Option<&str>, no_color: bool) -> AppResult<()> {
    let env_filter = build_filter(log_level)?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(!no_color && supports_color());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

/// Resolve the filter directive from the override, `RUST_LOG`, or the default.
fn build_filter(log_level: Option<&str>) -> AppResult<EnvFilter> {
    let filter_str = match log_level {
        Some(level) => level.to_string(),
        None => std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string()),
    };

    EnvFilter::try_new(&filter_str)
        .map_err(|e| AppError::Config(format!("Invalid log filter '{}': {}", filter_str, e)))
}

fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}
