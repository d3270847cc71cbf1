//! # Observability Infrastructure
//!
//! Structured logging for the documentation engine. The engine itself only
//! emits `tracing` events; hosts that want them on stdout call
//! [`init_logging`] once at startup.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};

/// Initialize the global tracing subscriber
///
/// The filter honors `RUST_LOG` when set and falls back to the configured
/// log level otherwise. Fails when a global subscriber is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let result = if config.json_logging {
        fmt().with_env_filter(filter).json().try_init()
    } else {
        fmt().with_env_filter(filter).try_init()
    };

    result.map_err(|e| Error::validation(format!("Failed to initialize logging: {}", e)))?;

    tracing::info!(
        log_level = %config.log_level,
        json_logging = config.json_logging,
        "Logging initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_not_reentrant() {
        let config = ObservabilityConfig::default();
        let first = init_logging(&config);
        let second = init_logging(&config);
        // Exactly one global subscriber install can succeed per process;
        // other tests may have installed one first.
        assert!(first.is_ok() || second.is_err());
    }
}
