//! Configuration loading
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! Arguments and environment variables arrive together as [`Overrides`]
//! (the binary parses both with clap). A missing or unreadable TOML file is
//! never fatal: the problem is recorded in [`AppConfig::config_warning`] and
//! the defaults apply.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit TOML config file
pub const CONFIG_ENV_VAR: &str = "AGT_CONFIG";

const APP_DIR: &str = "audio-gear-tracker";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub database_path: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Settings supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub database_path: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Compiled fallbacks for the current platform
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDefaults {
    pub database_path: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            database_path: default_data_dir().join("gear.db"),
            bind_address: "127.0.0.1".to_string(),
            port: 5080,
            log_level: "info".to_string(),
        }
    }
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub log_level: String,
    /// Config file that contributed values, if any
    pub config_file: Option<PathBuf>,
    /// Why the config file was skipped, for logging once tracing is up
    pub config_warning: Option<String>,
}

impl AppConfig {
    /// Resolve using the default config file location
    pub fn resolve(overrides: Overrides) -> Self {
        Self::resolve_with_file(overrides, config_file_path().as_deref())
    }

    /// Resolve using an explicit config file (`None` skips the file layer)
    pub fn resolve_with_file(overrides: Overrides, config_file: Option<&Path>) -> Self {
        let defaults = CompiledDefaults::for_current_platform();

        let (file, used_file, config_warning) = match config_file {
            Some(path) if path.exists() => match load_toml_config(path) {
                Ok(file) => (file, Some(path.to_path_buf()), None),
                Err(e) => (TomlConfig::default(), None, Some(e.to_string())),
            },
            Some(path) => (
                TomlConfig::default(),
                None,
                Some(format!("Config file not found: {} (using defaults)", path.display())),
            ),
            None => (TomlConfig::default(), None, None),
        };

        Self {
            database_path: overrides
                .database_path
                .or(file.database_path)
                .unwrap_or(defaults.database_path),
            bind_address: overrides
                .bind_address
                .or(file.bind_address)
                .unwrap_or(defaults.bind_address),
            port: overrides.port.or(file.port).unwrap_or(defaults.port),
            log_level: overrides
                .log_level
                .or(file.log_level)
                .unwrap_or(defaults.log_level),
            config_file: used_file,
            config_warning,
        }
    }

    /// `host:port` for the listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// `$AGT_CONFIG`, else `<config_dir>/audio-gear-tracker/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let path = dirs::config_dir()?.join(APP_DIR).join("config.toml");
    // The default location is optional; only an explicit path warns when absent
    path.exists().then_some(path)
}

/// Get OS-dependent default data folder
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("./agt_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::resolve_with_file(Overrides::default(), None);
        let defaults = CompiledDefaults::for_current_platform();

        assert_eq!(config.database_path, defaults.database_path);
        assert_eq!(config.port, 5080);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.log_level, "info");
        assert!(config.config_file.is_none());
        assert!(config.config_warning.is_none());
    }

    #[test]
    fn test_default_database_is_named_gear_db() {
        let defaults = CompiledDefaults::for_current_platform();
        assert_eq!(defaults.database_path.file_name().unwrap(), "gear.db");
    }

    #[test]
    fn test_listen_address() {
        let overrides = Overrides {
            bind_address: Some("0.0.0.0".to_string()),
            port: Some(8080),
            ..Default::default()
        };
        let config = AppConfig::resolve_with_file(overrides, None);
        assert_eq!(config.listen_address(), "0.0.0.0:8080");
    }
}
