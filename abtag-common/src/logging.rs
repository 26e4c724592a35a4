//! Tracing subscriber setup

use crate::config::LoggingConfig;
use crate::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// `RUST_LOG` takes priority over the configured level. Returns an error if a
/// global subscriber is already installed.
///
/// ```no_run
/// use abtag_common::{logging::init_tracing, TomlConfig};
///
/// let config = TomlConfig::load_resolved(None)?;
/// init_tracing(&config.logging)?;
/// # Ok::<(), abtag_common::Error>(())
/// ```
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {}", e)))
}
