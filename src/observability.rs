//! Structured logging setup

use tracing_subscriber::EnvFilter;

use crate::{config::ApiConfig, error::Result};

/// Initialize JSON-formatted tracing
///
/// The filter comes from `config.log_level`; an unparseable level
/// falls back to `info`. A second call in the same process is a no-op
/// because the global subscriber is already installed.
pub fn init_tracing(config: &ApiConfig) -> Result<()> {
    let log_level = config.log_level.clone();

    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();

    tracing::info!("Tracing initialized");

    Ok(())
}
