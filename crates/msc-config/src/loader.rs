//! Configuration loading utilities

use crate::Config;
use msc_common::Result as MscResult;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use validator::Validate;

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "msc-chart.toml";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "MSC_CHART_CONFIG";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        /// Variable name
        var: String,
        /// Underlying parse failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for msc_common::MscError {
    fn from(err: ConfigError) -> Self {
        msc_common::MscError::config_with_source("Invalid configuration", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::load_config_with(path, |var| env::var(var).ok())
    }

    /// Like [`ConfigLoader::load_config`], reading overrides through `lookup`
    pub fn load_config_with<P, F>(path: P, lookup: F) -> Result<Config, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading configuration file");
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        Self::apply_env_overrides(&mut config, lookup)?;
        config.validate()?;

        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load configuration from defaults, an optional file, and the environment.
    ///
    /// The file is `$MSC_CHART_CONFIG` when set, otherwise `msc-chart.toml` in
    /// the working directory if it exists. Without a file the defaults are used.
    pub fn load() -> MscResult<Config> {
        let config = match Self::locate(env::var(CONFIG_PATH_ENV).ok()) {
            Some(path) => Self::load_config(path)?,
            None => {
                debug!("No configuration file found, using defaults");
                Self::from_env_with(|var| env::var(var).ok())?
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> MscResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Defaults plus overrides read through `lookup`, validated
    pub fn from_env_with<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config, lookup)?;
        config.validate()?;
        Ok(config)
    }

    fn locate(explicit: Option<String>) -> Option<PathBuf> {
        match explicit.filter(|p| !p.is_empty()) {
            Some(path) => Some(PathBuf::from(path)),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // GitHub configuration overrides
        if let Some(token) = lookup("GITHUB_TOKEN") {
            config.github.token = token;
        }

        if let Some(repository) = lookup("MSC_REPOSITORY") {
            config.github.repository = repository;
        }

        if let Some(api_url) = lookup("GITHUB_API_URL") {
            url::Url::parse(&api_url).map_err(|e| ConfigError::EnvParseError {
                var: "GITHUB_API_URL".to_string(),
                source: Box::new(e),
            })?;
            config.github.api_url = api_url;
        }

        if let Some(timeout) = lookup("GITHUB_TIMEOUT") {
            config.github.timeout_secs = timeout.parse().map_err(|e| ConfigError::EnvParseError {
                var: "GITHUB_TIMEOUT".to_string(),
                source: Box::new(e),
            })?;
        }

        // Logging configuration overrides
        if let Some(level) = lookup("MSC_LOG") {
            config.logging.level = level;
        }

        Ok(())
    }
}
