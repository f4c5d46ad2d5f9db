//! Server configuration loaded from `~/.streams/config.toml`.
//!
//! The file is optional; missing sections and fields fall back to their
//! defaults. Command-line flags cover listen address, storage and logging;
//! this file holds the tunables that rarely change.

mod loader;

pub use loader::{config_path, load_config, load_config_from};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid duration '{value}' for {field}: {reason}")]
    InvalidDuration {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field} = '{value}' is longer than the maximum of {max}")]
    DurationTooLong {
        field: &'static str,
        value: String,
        max: &'static str,
    },

    #[error("Invalid limit {field} = {value}: must be positive")]
    InvalidLimit { field: &'static str, value: i64 },
}

/// Longest session lifetime the config accepts.
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(366 * 24 * 60 * 60);

/// `[server]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    /// Session lifetime, e.g. `"30days"` or `"12h"`
    pub session_ttl: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            session_ttl: "30days".to_string(),
        }
    }
}

/// `[limits]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsSection {
    pub max_blocks_per_parent: i64,
    pub max_gallery_images: i64,
    pub max_search_results: i64,
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            max_blocks_per_parent: 200,
            max_gallery_images: 50,
            max_search_results: 50,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub limits: LimitsSection,
}

impl ServerConfig {
    /// Session lifetime as a [`Duration`].
    pub fn session_ttl(&self) -> Result<Duration, ConfigError> {
        humantime::parse_duration(&self.server.session_ttl).map_err(|e| {
            ConfigError::InvalidDuration {
                field: "server.session_ttl",
                value: self.server.session_ttl.clone(),
                reason: e.to_string(),
            }
        })
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_ttl()? > MAX_SESSION_TTL {
            return Err(ConfigError::DurationTooLong {
                field: "server.session_ttl",
                value: self.server.session_ttl.clone(),
                max: "366days",
            });
        }
        let limits = [
            ("limits.max_blocks_per_parent", self.limits.max_blocks_per_parent),
            ("limits.max_gallery_images", self.limits.max_gallery_images),
            ("limits.max_search_results", self.limits.max_search_results),
        ];
        for (field, value) in limits {
            if value <= 0 {
                return Err(ConfigError::InvalidLimit { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
