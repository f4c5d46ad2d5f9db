use super::{ConfigError, ServerConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Canonical config location, next to the default data and log directories.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".streams").join("config.toml"))
}

/// Load the config from the default location.
pub fn load_config() -> Result<ServerConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory; using default config");
        return Ok(ServerConfig::default());
    };
    load_config_from(&path)
}

/// Load and validate the config at `path`. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<ServerConfig, ConfigError> {
    if !path.exists() {
        debug!("Config not found at {}; using defaults", path.display());
        return Ok(ServerConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;
    config.validate()?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}
