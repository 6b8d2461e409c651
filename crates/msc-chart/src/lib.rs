//! # MSC Chart
//!
//! Command-line front end for the msc-chart workspace: loads the
//! configuration, sets up logging and runs a single chart generation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;

pub use app::App;
pub use cli::Cli;
pub use error::{AppError, AppResult};
