//! Tracing subscriber setup.

use crate::config::LoggingConfig;
use crate::errors::ConfigError;
use tracing_subscriber::EnvFilter;

/// Builds the filter: `RUST_LOG` if set, otherwise the configured directive.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, ConfigError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.filter).map_err(|e| ConfigError::LogFilter {
        filter: config.filter.clone(),
        message: e.to_string(),
    })
}

/// Installs a global fmt subscriber.
///
/// Returns `Ok(false)` if another subscriber was already installed, which is
/// common in tests and embedding hosts.
pub fn init_logging(config: &LoggingConfig) -> Result<bool, ConfigError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };
    Ok(installed)
}
