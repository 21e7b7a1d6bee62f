//! Configuration File Loading
//!
//! Handles loading and saving configuration files from various locations
//! with support for TOML and JSON and a fallback to defaults.

use super::Config;
use crate::error::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Configuration file loader
pub struct ConfigLoader {
    /// Search paths for configuration files (without extension)
    search_paths: Vec<PathBuf>,
    /// Supported configuration file formats
    supported_formats: Vec<ConfigFormat>,
    /// Current configuration file path (if loaded)
    current_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    fn extension(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }

    fn name(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }

    /// Guess the format from a file extension, defaulting to TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Whether to fall back to the default config if none exists
    pub create_default: bool,
    /// Whether to validate configuration after loading
    pub validate: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            create_default: true,
            validate: true,
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            search_paths: Self::get_search_paths(),
            supported_formats: vec![ConfigFormat::Toml, ConfigFormat::Json],
            current_path: None,
        }
    }

    /// Create a loader that only searches the given base paths
    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths,
            supported_formats: vec![ConfigFormat::Toml, ConfigFormat::Json],
            current_path: None,
        }
    }

    /// Load configuration with default options
    pub fn load() -> Result<Config> {
        Self::new().load_with_options(LoadOptions::default())
    }

    /// Load configuration with custom options
    pub fn load_with_options(&mut self, options: LoadOptions) -> Result<Config> {
        if let Some((path, config)) = self.find_and_load_config()? {
            debug!("Configuration loaded from {}", path.display());
            self.current_path = Some(path);
            if options.validate {
                config.validate()?;
            }
            return Ok(config);
        }

        if options.create_default {
            let config = Config::default();
            if options.validate {
                config.validate()?;
            }
            Ok(config)
        } else {
            Err(Error::ConfigNotFound)
        }
    }

    /// Load a specific configuration file
    pub fn load_from_path(path: &Path) -> Result<Config> {
        let config = Self::load_config_file(path, ConfigFormat::from_path(path))?;
        config.validate()?;
        Ok(config)
    }

    /// Path of the file the last load read from
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let format = ConfigFormat::from_path(path);
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                }
            })?,
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).map_err(|e| Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })?
            }
        };

        fs::write(path, content)?;
        Ok(())
    }

    /// Find and load configuration from search paths
    fn find_and_load_config(&self) -> Result<Option<(PathBuf, Config)>> {
        for path in &self.search_paths {
            for format in &self.supported_formats {
                let config_path = path.with_extension(format.extension());

                if config_path.exists() {
                    match Self::load_config_file(&config_path, *format) {
                        Ok(config) => return Ok(Some((config_path, config))),
                        Err(e) => {
                            // Keep searching; a broken file should not block startup
                            warn!("Failed to load config from {}: {}", config_path.display(), e);
                            continue;
                        }
                    }
                }
            }
        }

        Ok(None)
    }

    fn load_config_file(path: &Path, format: ConfigFormat) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        match format {
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                format: format.name().to_string(),
                reason: e.to_string(),
            }),
            ConfigFormat::Json => {
                serde_json::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Get default search paths for configuration files
    fn get_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(explicit) = env::var("CYDER_CONFIG") {
            let explicit = PathBuf::from(explicit);
            // with_extension is applied later, so strip what the user gave us
            paths.push(explicit.with_extension(""));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("cyder").join("config"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".cyder").join("config"));
        }

        if let Ok(cwd) = env::current_dir() {
            paths.push(cwd.join(".cyder").join("config"));
        }

        paths
    }
}
