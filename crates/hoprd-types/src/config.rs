//! Application configuration with sensible defaults.
//!
//! Values shared by the API server and the admin CLI live here. Every
//! value has a documented default.

use serde::{Deserialize, Serialize};

use crate::{HoprdError, Result};

/// Global diagnostic configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Upper bound for a single reachability probe, in milliseconds.
    pub ping_timeout_ms: u64,

    /// Maximum length of an alias name after sanitising.
    pub max_alias_len: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ping_timeout_ms: 10_000,
            max_alias_len: 64,
        }
    }
}

impl AppConfig {
    /// Probe timeout as a [`std::time::Duration`].
    pub fn ping_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.ping_timeout_ms)
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.ping_timeout_ms == 0 {
            return Err(HoprdError::ConfigError {
                reason: "ping_timeout_ms must be greater than 0".into(),
            });
        }

        if self.max_alias_len == 0 {
            return Err(HoprdError::ConfigError {
                reason: "max_alias_len must be greater than 0".into(),
            });
        }

        Ok(())
    }
}
