//! Chart types and data structures

use msc_common::{Month, MscError, Stage};
use msc_config::ChartSettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Supported chart types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartType {
    /// Cumulative proposal counts per stage over time
    StackedArea,
    /// Current proposal counts per stage
    Pie,
}

impl ChartType {
    /// Canonical command-line name
    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::StackedArea => "stacked-area",
            ChartType::Pie => "pie",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = MscError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stacked-area" | "stacked_area" | "stackedarea" => Ok(ChartType::StackedArea),
            "pie" => Ok(ChartType::Pie),
            _ => Err(MscError::unsupported_chart_type(s)),
        }
    }
}

/// A single chart generation request.
#[derive(Debug, Clone)]
pub struct ChartRequest {
    /// Which chart to draw
    pub chart_type: ChartType,
    /// Where the image is written; the extension selects the format
    pub output: PathBuf,
    /// Styling; the generator's default applies when unset
    pub config: Option<GraphConfig>,
}

impl ChartRequest {
    /// Request with default styling
    pub fn new(chart_type: ChartType, output: impl Into<PathBuf>) -> Self {
        Self {
            chart_type,
            output: output.into(),
            config: None,
        }
    }

    /// Override the styling for this request
    pub fn with_config(mut self, config: GraphConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Cumulative count at the end of a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// Calendar month
    pub month: Month,
    /// Records counted up to and including `month`
    pub count: u64,
}

/// Values carried by a [`Series`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesValues {
    /// Month-ordered cumulative counts (stacked-area)
    Monthly(Vec<MonthlyCount>),
    /// A single total (pie)
    Total(u64),
}

/// Derived data for one stage of the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    /// Stage this series counts
    pub stage: Stage,
    /// Counted values
    pub values: SeriesValues,
}

impl Series {
    /// Monthly series
    pub fn monthly(stage: Stage, points: Vec<MonthlyCount>) -> Self {
        Self {
            stage,
            values: SeriesValues::Monthly(points),
        }
    }

    /// Single-total series
    pub fn total(stage: Stage, count: u64) -> Self {
        Self {
            stage,
            values: SeriesValues::Total(count),
        }
    }

    /// Display label, the stage name
    pub fn label(&self) -> &'static str {
        self.stage.display_name()
    }

    /// Monthly points; empty for a total series
    pub fn points(&self) -> &[MonthlyCount] {
        match &self.values {
            SeriesValues::Monthly(points) => points,
            SeriesValues::Total(_) => &[],
        }
    }

    /// Latest value: the total, or the last monthly count
    pub fn latest(&self) -> u64 {
        match &self.values {
            SeriesValues::Monthly(points) => points.last().map_or(0, |p| p.count),
            SeriesValues::Total(count) => *count,
        }
    }
}

/// Font configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Font family name
    pub family: String,
    /// Point size
    pub size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 14,
        }
    }
}

/// Margin configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginConfig {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: 20,
            right: 20,
            bottom: 60,
            left: 60,
        }
    }
}

/// Colour per stage, as `#rrggbb` strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageColors {
    pub new: String,
    pub fcp: String,
    pub merged: String,
    pub postponed: String,
    pub closed: String,
}

impl StageColors {
    /// Colour for `stage`
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

impl Default for StageColors {
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

/// Styling shared by all renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub background_color: String,
    pub title_font: FontConfig,
    pub label_font: FontConfig,
    pub margins: MarginConfig,
    pub stage_colors: StageColors,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            title_font: FontConfig {
                family: "sans-serif".to_string(),
                size: 18,
            },
            label_font: FontConfig::default(),
            margins: MarginConfig::default(),
            stage_colors: StageColors::default(),
        }
    }
}

/// Graph configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    /// First month kept on the stacked-area axis
    pub history_start: Option<Month>,
    pub style: StyleConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            title: msc_config::DEFAULT_TITLE.to_string(),
            width: 1200,
            height: 800,
            x_label: None,
            y_label: Some("Proposals".to_string()),
            history_start: None,
            style: StyleConfig::default(),
        }
    }
}

impl From<&ChartSettings> for GraphConfig {
    fn from(settings: &ChartSettings) -> Self {
        let label_size = (settings.font_size * 3 / 4).max(8);
        Self {
            title: settings.title.clone(),
            width: settings.width,
            height: settings.height,
            history_start: settings.history_start_month(),
            style: StyleConfig {
                background_color: settings.background.clone(),
                title_font: FontConfig {
                    family: settings.font_family.clone(),
                    size: settings.font_size,
                },
                label_font: FontConfig {
                    family: settings.font_family.clone(),
                    size: label_size,
                },
                stage_colors: StageColors {
                    new: settings.colors.new.clone(),
                    fcp: settings.colors.fcp.clone(),
                    merged: settings.colors.merged.clone(),
                    postponed: settings.colors.postponed.clone(),
                    closed: settings.colors.closed.clone(),
                },
                ..StyleConfig::default()
            },
            ..GraphConfig::default()
        }
    }
}
