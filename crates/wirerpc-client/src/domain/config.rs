//! Client configuration with validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Correlation core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Deadline applied when a synchronous call does not specify one
    pub default_timeout: Duration,
    /// Interval for the background sweep of expired pending calls
    pub sweep_interval: Duration,
    /// Maximum outstanding correlated calls (0 = unlimited)
    pub max_pending: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_millis(1000),
            sweep_interval: Duration::from_secs(30),
            max_pending: 0,
        }
    }
}

impl ClientConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::ZeroSweepInterval);
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// default_timeout must be non-zero
    #[error("default_timeout cannot be zero")]
    ZeroTimeout,

    /// sweep_interval must be non-zero
    #[error("sweep_interval cannot be zero")]
    ZeroSweepInterval,
}
