//! Configuration file loading
//!
//! Handles loading and saving configuration as TOML or JSON. The format is
//! picked from the file extension; anything but `.json` is read as TOML.

use crate::config::Config;
use crate::error::ConfigError;

use std::path::{Path, PathBuf};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "THERMWATCH_CONFIG";

/// On-disk configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Configuration file handler
pub struct ConfigFile;

impl ConfigFile {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        Self::parse(&content, ConfigFormat::from_path(path))
    }

    /// Parse configuration text
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
        let config = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Ok(config)
    }

    /// Render configuration in the given format
    pub fn render(config: &Config, format: ConfigFormat) -> Result<String, ConfigError> {
        let content = match format {
            ConfigFormat::Toml => toml::to_string_pretty(config)?,
            ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        };
        Ok(content)
    }

    /// Write configuration to a file, creating parent directories
    pub fn save<P: AsRef<Path>>(config: &Config, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = Self::render(config, ConfigFormat::from_path(path))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::WriteError {
                path: parent.display().to_string(),
                source,
            })?;
        }

        std::fs::write(path, content).map_err(|source| ConfigError::WriteError {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load configuration from default locations
    ///
    /// `$THERMWATCH_CONFIG` must point at a readable file when set. The
    /// first existing well-known path is used otherwise.
    pub fn load_default() -> Result<Option<Config>, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            let config = Self::load(&path)?;
            log::info!("Loaded config from {}", Path::new(&path).display());
            return Ok(Some(config));
        }

        for path in Self::default_paths() {
            if path.exists() {
                let config = Self::load(&path)?;
                log::info!("Loaded config from {}", path.display());
                return Ok(Some(config));
            }
        }

        Ok(None)
    }

    /// Get default configuration file paths
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // System-wide config
        paths.push(PathBuf::from("/etc/thermwatch/config.toml"));

        // User config
        if let Some(user) = Self::user_path() {
            paths.push(user);
        }

        // Current directory
        paths.push(PathBuf::from("thermwatch.toml"));

        paths
    }

    /// Per-user config file, the target of `config init`
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("thermwatch").join("config.toml"))
    }
}
