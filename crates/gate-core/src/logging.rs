//! Logging setup for toolgate
//!
//! Structured logging via the `tracing` crate. Library crates only emit
//! events; hosts call [`init_logging`] once at startup to install a
//! subscriber.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level (e.g., "info", "debug", "trace")
    pub level: String,
    /// Whether to use JSON format (vs. human-readable)
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Initialize logging for the host application
///
/// Should be called once at startup. `RUST_LOG` takes precedence over the
/// configured level when set.
pub fn init_logging(config: LogConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty())
            .init();
    }

    tracing::info!("Logging initialized at level: {}", config.level);
}
