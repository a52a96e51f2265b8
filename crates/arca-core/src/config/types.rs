use serde::{Deserialize, Serialize};

use super::defaults::*;
use crate::error::{ArcaError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArcaConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dir_info: DirInfoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the archive server, e.g. "https://backup.example.com".
    #[serde(default = "default_server_url")]
    pub url: String,
    /// Bearer token for authenticated servers.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            token: None,
        }
    }
}

/// Tuning for the background directory size/count fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirInfoConfig {
    /// Live toggle: when false the worker drops queued requests without
    /// contacting the server.
    #[serde(default = "default_dir_info_enabled")]
    pub enabled: bool,
    /// Budget given to the first attempt for a directory.
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,
    /// Added to the budget each time the server reports a truncated result.
    #[serde(default = "default_timeout_step_ms")]
    pub timeout_step_ms: u64,
    /// Ceiling for the budget; capped requests keep retrying at this value.
    #[serde(default = "default_max_timeout_ms")]
    pub max_timeout_ms: u64,
}

impl Default for DirInfoConfig {
    fn default() -> Self {
        Self {
            enabled: default_dir_info_enabled(),
            default_timeout_ms: default_timeout_ms(),
            timeout_step_ms: default_timeout_step_ms(),
            max_timeout_ms: default_max_timeout_ms(),
        }
    }
}

impl DirInfoConfig {
    pub fn validate(&self) -> Result<()> {
        if self.default_timeout_ms == 0 {
            return Err(ArcaError::Config(
                "dir_info.default_timeout_ms must be at least 1".into(),
            ));
        }
        if self.timeout_step_ms == 0 {
            return Err(ArcaError::Config(
                "dir_info.timeout_step_ms must be at least 1".into(),
            ));
        }
        if self.max_timeout_ms < self.default_timeout_ms {
            return Err(ArcaError::Config(format!(
                "dir_info.max_timeout_ms ({}) must be >= default_timeout_ms ({})",
                self.max_timeout_ms, self.default_timeout_ms
            )));
        }
        Ok(())
    }
}
