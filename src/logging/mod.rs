use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::nginx::env::{EnvProvider, LOG_LEVEL_ENV};

/// Picks the level to log at: `BP_LOG_LEVEL=DEBUG` overrides the configured one.
pub fn effective_level(configured: &str, env: &dyn EnvProvider) -> String {
    match env.var_os(LOG_LEVEL_ENV) {
        Some(level) if level.eq_ignore_ascii_case("debug") => "debug".to_string(),
        _ => configured.to_string(),
    }
}

/// Installs the global subscriber. Logs go to stderr so rendered output on
/// stdout stays clean.
pub fn init_logging(level: &str, format: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init()
        }
    }
    .context("Failed to initialize logging")
}
