//! Configuration file handling
//!
//! Settings live in `config.toml` under the platform config directory
//! (`~/.config/wxdash/config.toml` on Linux). Every field is optional; a
//! missing file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::data::openweather::DEFAULT_BASE_URL;
use crate::location::DEFAULT_GEOLOCATION_URL;
use crate::map::{DEFAULT_OVERLAY_LAYER, DEFAULT_TILE_BASE_URL, DEFAULT_ZOOM};

/// Environment variable consulted for the provider API key
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("No API key configured. Pass --api-key, set {}, or add api_key to the config file.", API_KEY_ENV)]
    MissingApiKey,
}

/// Settings read from the config file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub tile_base_url: String,
    pub geolocation_url: String,
    /// Look up the position from the public IP on startup
    pub geolocate: bool,
    pub geolocation_timeout_secs: u64,
    pub overlay_layer: String,
    pub map_zoom: u8,
    /// Start with temperatures in Fahrenheit
    pub fahrenheit: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            tile_base_url: DEFAULT_TILE_BASE_URL.to_string(),
            geolocation_url: DEFAULT_GEOLOCATION_URL.to_string(),
            geolocate: true,
            geolocation_timeout_secs: 10,
            overlay_layer: DEFAULT_OVERLAY_LAYER.to_string(),
            map_zoom: DEFAULT_ZOOM,
            fahrenheit: false,
            log_file: None,
        }
    }
}

impl Config {
    /// Loads the config file at `path`, or at the default location when no
    /// path is given. A file that does not exist yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
    }
}

/// `<config_dir>/config.toml`, if a home directory can be determined
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "wxdash").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Picks the API key: command line first, then environment, then file.
/// Blank values are ignored.
pub fn resolve_api_key(
    cli: Option<&str>,
    env: Option<&str>,
    file: Option<&str>,
) -> Result<String, ConfigError> {
    [cli, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|key| !key.is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::MissingApiKey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();

        assert_eq!(config, Config::default());
        assert!(config.geolocate);
        assert_eq!(config.geolocation_timeout_secs, 10);
        assert_eq!(config.overlay_layer, "temp_new");
        assert_eq!(config.map_zoom, 10);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api_key = \"abc123\"").unwrap();
        writeln!(file, "fahrenheit = true").unwrap();
        writeln!(file, "overlay_layer = \"precipitation_new\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.api_key.as_deref(), Some("abc123"));
        assert!(config.fahrenheit);
        assert_eq!(config.overlay_layer, "precipitation_new");
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_invalid_file_is_a_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "map_zoom = \"very close\"").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_api_key_precedence() {
        assert_eq!(
            resolve_api_key(Some("cli"), Some("env"), Some("file")).unwrap(),
            "cli"
        );
        assert_eq!(resolve_api_key(None, Some("env"), Some("file")).unwrap(), "env");
        assert_eq!(resolve_api_key(None, None, Some("file")).unwrap(), "file");
        assert_eq!(resolve_api_key(Some("  "), None, Some("file")).unwrap(), "file");
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let err = resolve_api_key(None, Some(""), None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
        assert!(err.to_string().contains(API_KEY_ENV));
    }
}
