//! Configuration for the TaxMate client.
//!
//! Configuration lives in a small JSON file under the platform config
//! directory. Every field has a default, so a missing file or a partial
//! file both work.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::client::DEFAULT_ENDPOINT;

/// Main configuration for the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the assistant service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Color theme name for the terminal UI.
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

fn default_theme() -> String {
    "mocha".into()
}

impl Config {
    /// Load configuration from a file.
    ///
    /// A missing file is not an error: defaults are returned so a fresh
    /// install works without writing anything first.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Save configuration to a file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Default config file location under the platform config directory.
    ///
    /// `None` when the platform reports no config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taxmate").join("config.json"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            theme: default_theme(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.endpoint, "http://localhost:8000");
        assert_eq!(config.theme, "mocha");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"theme": "latte"}"#).unwrap();
        assert_eq!(config.theme, "latte");
        assert_eq!(config.endpoint, "http://localhost:8000");
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.endpoint, "http://localhost:8000");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            endpoint: "http://10.0.0.5:9000".into(),
            theme: "high-contrast".into(),
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.endpoint, config.endpoint);
        assert_eq!(loaded.theme, config.theme);
    }

    #[test]
    fn test_garbage_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }
}
