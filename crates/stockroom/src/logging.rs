//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{GatewayError, Result};

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG`, when set, overrides `config.level`. Only one subscriber can be
/// installed per process; later calls return [`GatewayError::Logging`] and
/// leave the first one in place.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| GatewayError::Logging(e.to_string()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match config.format {
        LogFormat::Text => builder.with_ansi(config.ansi).try_init(),
        LogFormat::Json => builder.json().with_ansi(false).try_init(),
    };

    installed.map_err(|e| GatewayError::Logging(e.to_string()))
}
