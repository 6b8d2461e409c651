//! # MSC Graphs
//!
//! Fetches Matrix spec change proposals from GitHub, aggregates them by
//! lifecycle stage, and renders pie and stacked-area charts with plotters.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod fetcher;
pub mod generator;
pub mod pie;
pub mod renderer;
pub mod stacked_area;
pub mod types;

pub use aggregator::{ChartAggregator, DataAggregator, PieAggregator, StackedAreaAggregator};
pub use fetcher::{classify_stage, Credentials, ProposalSource, RecordFetcher};
pub use generator::{renderer_for, validate_output_path, MscChart, SUPPORTED_EXTENSIONS};
pub use pie::PieRenderer;
pub use renderer::{parse_color, GraphRenderer, RenderedImage};
pub use stacked_area::StackedAreaRenderer;
pub use types::*;
