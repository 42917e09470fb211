//! Tracing subscriber setup for hosts and demos.

use tracing_subscriber::EnvFilter;

use crate::config::CoreConfig;
use crate::error::{Error, Result};

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins over the configured filter when set. Fails if a global
/// subscriber is already installed.
pub fn init(config: &CoreConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.effective_log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to install subscriber: {}", e)))?;

    tracing::debug!("Logging initialized");
    Ok(())
}
