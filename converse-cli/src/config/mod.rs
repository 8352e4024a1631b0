//! Configuration management for the converse CLI.
//!
//! Settings are layered:
//! 1. Default values
//! 2. Config file (`~/.converse/config.toml`)
//! 3. Environment variables (`OLLAMA_BASE_URL`, `OLLAMA_MODEL`)
//! 4. Command-line flags

mod schema;

pub use schema::{AppConfig, ChatSettings, RetrySettings, ServerConfig};

use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Get the default config directory path.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".converse")
}

/// Get the default config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Load configuration from the default path.
///
/// # Errors
///
/// See [`load_config_from`].
pub async fn load_config() -> ConfigResult<AppConfig> {
    load_config_from(&config_path()).await
}

/// Load configuration from a specific path. A missing file yields defaults.
///
/// # Errors
///
/// Fails if the file exists but cannot be read or is not valid TOML for
/// [`AppConfig`].
pub async fn load_config_from(path: &Path) -> ConfigResult<AppConfig> {
    if !path.exists() {
        info!(path = %path.display(), "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config: AppConfig = toml::from_str(&content)?;
    debug!(path = %path.display(), "loaded config file");

    Ok(config)
}
