//! Application settings persisted as TOML in the app directory.
//!
//! The settings file is optional; a missing file yields defaults so a fresh
//! install talks to a local server without any setup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;

/// File name of the settings file inside the app directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Base address used when no configuration overrides it.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Settings loaded from `config.toml`.
///
/// Config keys (TOML): `[api] base_url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Inventory server connection settings.
    #[serde(default)]
    pub api: ApiSettings,
}

/// Connection settings for the inventory server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base address for both endpoints.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

/// Errors that can occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The application directory could not be resolved.
    #[error(transparent)]
    Dir(#[from] app_dirs::AppDirError),
    /// Reading the settings file failed.
    #[error("Failed to read settings at {path}: {source}")]
    Read {
        /// Settings file path.
        path: PathBuf,
        /// Underlying filesystem error.
        source: std::io::Error,
    },
    /// The settings file is not valid TOML for this schema.
    #[error("Failed to parse settings at {path}: {source}")]
    Parse {
        /// Settings file path.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// Serializing settings to TOML failed.
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Writing the settings file failed.
    #[error("Failed to write settings at {path}: {source}")]
    Write {
        /// Settings file path.
        path: PathBuf,
        /// Underlying filesystem error.
        source: std::io::Error,
    },
}

/// Resolve the settings file path, ensuring the app directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load settings from the app directory, returning defaults if missing.
pub fn load_or_default() -> Result<Settings, ConfigError> {
    load_from(&config_path()?)
}

/// Load settings from a specific path, returning defaults if missing.
pub fn load_from(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Persist settings to the app directory, overwriting previous contents.
pub fn save(settings: &Settings) -> Result<(), ConfigError> {
    save_to_path(settings, &config_path()?)
}

/// Save settings to a specific path, creating parent directories as needed.
pub fn save_to_path(settings: &Settings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let text = toml::to_string_pretty(settings)?;
    std::fs::write(path, text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(settings.api.base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn empty_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "").unwrap();
        assert_eq!(load_from(&path).unwrap(), Settings::default());
    }

    #[test]
    fn base_url_override_is_honored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[api]\nbase_url = \"http://10.0.0.5:9000\"\n").unwrap();
        let settings = load_from(&path).unwrap();
        assert_eq!(settings.api.base_url, "http://10.0.0.5:9000");
    }

    #[test]
    fn settings_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let settings = Settings {
            api: ApiSettings {
                base_url: "http://inventory.internal:8000".to_string(),
            },
        };
        save_to_path(&settings, &path).unwrap();
        assert_eq!(load_from(&path).unwrap(), settings);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "api = \"not a table\"").unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::Parse { .. })));
    }
}
