//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::{Result, StoreLocatorError};

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` is used.
pub fn init_tracing(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| StoreLocatorError::Config {
            var: "RUST_LOG".to_string(),
            reason: e.to_string(),
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| StoreLocatorError::Config {
            var: "RUST_LOG".to_string(),
            reason: e.to_string(),
        })
}
