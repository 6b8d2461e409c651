//! # MSC Config
//!
//! Type-safe configuration for msc-chart: a TOML schema with defaults,
//! environment variable overrides, and validation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validation;

pub use defaults::{DEFAULT_LABEL, DEFAULT_REPOSITORY, DEFAULT_TITLE};
pub use loader::{ConfigError, ConfigLoader, CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE};
pub use schema::{ChartSettings, Config, GitHubSettings, LoggingSettings, StageColorsSettings};
