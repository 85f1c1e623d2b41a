//! API server configuration.
//!
//! Defaults to a loopback bind without a token. Binding to any other
//! interface is **off by default**: it requires `allow_remote` and a
//! non-empty API token.

use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use hoprd_types::config::AppConfig;
use hoprd_types::{HoprdError, Result};

/// Configuration for the HTTP API server.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Address to bind. Default: `127.0.0.1:3001`.
    pub bind_addr: SocketAddr,

    /// Token every request must carry. Compared in constant time.
    pub api_token: Option<String>,

    /// Permit a non-loopback `bind_addr`.
    pub allow_remote: bool,

    /// Probe timeout and alias limits.
    pub diagnostics: AppConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            api_token: None,
            allow_remote: false,
            diagnostics: AppConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Loads a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| HoprdError::ConfigError {
            reason: format!("cannot read '{}': {e}", path.display()),
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| HoprdError::ConfigError {
            reason: format!("invalid config '{}': {e}", path.display()),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// - Empty API token.
    /// - Non-loopback address without `allow_remote` or without a token.
    /// - Invalid diagnostics values.
    pub fn validate(&self) -> Result<()> {
        if matches!(self.api_token.as_deref(), Some("")) {
            return Err(HoprdError::ConfigError {
                reason: "API token must not be empty".into(),
            });
        }

        if !self.bind_addr.ip().is_loopback() {
            if !self.allow_remote {
                return Err(HoprdError::ConfigError {
                    reason: format!(
                        "binding to {} requires allow_remote",
                        self.bind_addr.ip()
                    ),
                });
            }
            if self.api_token.is_none() {
                return Err(HoprdError::ConfigError {
                    reason: "remote binding requires an API token".into(),
                });
            }
        }

        self.diagnostics.validate()
    }
}
