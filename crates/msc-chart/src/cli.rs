//! Command-line arguments

use clap::Parser;
use msc_common::Result;
use msc_graphs::ChartType;
use std::path::PathBuf;

/// Generate a chart of Matrix Spec Change proposals.
#[derive(Parser, Debug, Clone)]
#[command(name = "msc-chart", version, about)]
pub struct Cli {
    /// Chart to draw: `pie` or `stacked-area`.
    #[arg(value_name = "CHART_TYPE")]
    pub chart_type: String,

    /// Image to write; the extension picks the format (png, jpg, bmp).
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Configuration file. Falls back to `$MSC_CHART_CONFIG`, then
    /// `msc-chart.toml` in the working directory.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parsed chart type; unknown names are an unsupported chart type error
    pub fn chart_type(&self) -> Result<ChartType> {
        self.chart_type.parse()
    }
}
