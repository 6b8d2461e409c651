//! Main entry point for msc-chart.

use clap::Parser;
use msc_chart::{App, Cli};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let app = match App::load(cli.config.as_deref()) {
        Ok(app) => app,
        Err(e) => {
            // No subscriber yet
            eprintln!("Error: {:#}", anyhow::Error::new(e));
            return ExitCode::FAILURE;
        }
    };

    let _guard = match app.init_logging() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", anyhow::Error::new(e));
            return ExitCode::FAILURE;
        }
    };

    info!(version = env!("CARGO_PKG_VERSION"), "Starting msc-chart");

    match app.run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let e = anyhow::Error::new(e).context(format!("Failed to generate {}", cli.output.display()));
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
