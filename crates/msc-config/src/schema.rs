//! Configuration schema definitions using serde with validation attributes.

use msc_common::{GitHubConfig, LogFormat, LoggingConfig, Month, Stage};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Main configuration structure for msc-chart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// GitHub API configuration.
    #[validate]
    pub github: GitHubSettings,
    /// Chart styling configuration.
    #[validate]
    pub chart: ChartSettings,
    /// Logging configuration.
    #[validate]
    pub logging: LoggingSettings,
}

/// GitHub API configuration.
#[derive(Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GitHubSettings {
    /// Personal access token.
    #[validate(length(min = 1, message = "GitHub token cannot be empty"))]
    pub token: String,
    /// Repository holding the proposals, as `owner/name`.
    #[validate(custom = "crate::validation::validate_repository")]
    pub repository: String,
    /// REST API base URL.
    #[validate(url(message = "GitHub API URL must be a valid URL"))]
    pub api_url: String,
    /// Label marking an issue as a proposal.
    #[validate(length(min = 1, message = "Proposal label cannot be empty"))]
    pub label: String,
    /// Page size for issue listing.
    #[validate(range(min = 1, max = 100, message = "per_page must be between 1 and 100"))]
    pub per_page: u8,
    /// Request timeout in seconds.
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_secs: u64,
    /// Outgoing requests per second.
    #[validate(range(min = 1, message = "Rate limit must be greater than 0"))]
    pub rate_limit_per_sec: u32,
    /// Retry attempts for retryable failures.
    #[validate(range(max = 10, message = "Max retries cannot exceed 10"))]
    pub max_retries: usize,
}

impl std::fmt::Debug for GitHubSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSettings")
            .field("token", &"<redacted>")
            .field("repository", &self.repository)
            .field("api_url", &self.api_url)
            .field("label", &self.label)
            .field("per_page", &self.per_page)
            .field("timeout_secs", &self.timeout_secs)
            .field("rate_limit_per_sec", &self.rate_limit_per_sec)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl From<&GitHubSettings> for GitHubConfig {
    fn from(settings: &GitHubSettings) -> Self {
        GitHubConfig::new(settings.token.clone())
            .with_api_url(settings.api_url.clone())
            .with_timeout(settings.timeout_secs)
            .with_rate_limit(settings.rate_limit_per_sec)
            .with_max_retries(settings.max_retries)
    }
}

/// Chart styling configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChartSettings {
    /// Chart title.
    pub title: String,
    /// Image width in pixels.
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,
    /// Image height in pixels.
    #[validate(range(min = 100, max = 4000, message = "Height must be between 100 and 4000 pixels"))]
    pub height: u32,
    /// Font family for all text.
    #[validate(length(min = 1, message = "Font family cannot be empty"))]
    pub font_family: String,
    /// Title font size.
    #[validate(range(min = 8, max = 72, message = "Font size must be between 8 and 72"))]
    pub font_size: u32,
    /// Background colour.
    #[validate(custom = "crate::validation::validate_hex_color")]
    pub background: String,
    /// First month shown on the stacked-area axis, `YYYY-MM`.
    #[validate(custom = "crate::validation::validate_month")]
    pub history_start: Option<String>,
    /// Per-stage colours.
    #[validate]
    pub colors: StageColorsSettings,
}

impl ChartSettings {
    /// Parsed `history_start`; invalid values read as unset (validation reports them).
    pub fn history_start_month(&self) -> Option<Month> {
        self.history_start.as_deref().and_then(|s| s.parse().ok())
    }
}

/// Per-stage colours.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct StageColorsSettings {
    /// Colour for new proposals.
    #[validate(custom = "crate::validation::validate_hex_color")]
    pub new: String,
    /// Colour for proposals in final comment period.
    #[validate(custom = "crate::validation::validate_hex_color")]
    pub fcp: String,
    /// Colour for merged proposals.
    #[validate(custom = "crate::validation::validate_hex_color")]
    pub merged: String,
    /// Colour for postponed proposals.
    #[validate(custom = "crate::validation::validate_hex_color")]
    pub postponed: String,
    /// Colour for closed proposals.
    #[validate(custom = "crate::validation::validate_hex_color")]
    pub closed: String,
}

impl StageColorsSettings {
    /// Configured colour for `stage`
    pub fn for_stage(&self, stage: Stage) -> &str {
        match stage {
            Stage::New => &self.new,
            Stage::Fcp => &self.fcp,
            Stage::Merged => &self.merged,
            Stage::Postponed => &self.postponed,
            Stage::Closed => &self.closed,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `msc_graphs=debug`.
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub level: String,
    /// Output format: `pretty`, `compact` or `json`.
    pub format: Option<LogFormat>,
    /// Shorthand for `format = "json"`; ignored when `format` is set.
    pub json: bool,
    /// Log file; logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

impl From<&LoggingSettings> for LoggingConfig {
    fn from(settings: &LoggingSettings) -> Self {
        LoggingConfig {
            level: settings.level.clone(),
            format: settings.format.unwrap_or(if settings.json {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            }),
            file_path: settings
                .file
                .clone()
                .filter(|path| !path.as_os_str().is_empty()),
            ..LoggingConfig::default()
        }
    }
}
