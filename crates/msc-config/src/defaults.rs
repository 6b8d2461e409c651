//! Default values for every configuration section.

use crate::schema::*;
use msc_common::{Stage, DEFAULT_API_URL, MAX_PER_PAGE};

/// Repository holding the Matrix spec change proposals.
pub const DEFAULT_REPOSITORY: &str = "matrix-org/matrix-doc";

/// Label carried by every proposal issue and pull request.
pub const DEFAULT_LABEL: &str = "proposal";

/// Chart title used when none is configured.
pub const DEFAULT_TITLE: &str = "Matrix Spec Change Proposals";

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            token: String::new(),
            repository: DEFAULT_REPOSITORY.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            label: DEFAULT_LABEL.to_string(),
            per_page: MAX_PER_PAGE,
            timeout_secs: 30,
            rate_limit_per_sec: 10,
            max_retries: 0,
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            width: 1200,
            height: 800,
            font_family: "sans-serif".to_string(),
            font_size: 18,
            background: "#ffffff".to_string(),
            history_start: None,
            colors: StageColorsSettings::default(),
        }
    }
}

impl Default for StageColorsSettings {
    fn default() -> Self {
        Self {
            new: Stage::New.default_color().to_string(),
            fcp: Stage::Fcp.default_color().to_string(),
            merged: Stage::Merged.default_color().to_string(),
            postponed: Stage::Postponed.default_color().to_string(),
            closed: Stage::Closed.default_color().to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: None,
            json: false,
            file: None,
        }
    }
}
