//! Wiring from configuration to a single chart generation.

use crate::{AppError, AppResult, Cli};
use msc_common::{init_logging, LoggingConfig};
use msc_config::{Config, ConfigLoader};
use msc_graphs::{ChartRequest, GraphConfig, MscChart, ProposalSource, RecordFetcher};
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

/// A loaded, validated configuration ready to generate charts.
#[derive(Debug, Clone)]
pub struct App {
    config: Config,
}

impl App {
    /// Load the configuration from `path`, or from the default locations
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config = match path {
            Some(path) => ConfigLoader::load_from_file(path),
            None => ConfigLoader::load(),
        }
        .map_err(AppError::Config)?;

        Ok(Self::from_config(config))
    }

    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Install the global subscriber. Keep the guard alive until exit so
    /// buffered file output is flushed.
    pub fn init_logging(&self) -> AppResult<Option<WorkerGuard>> {
        init_logging(LoggingConfig::from(&self.config.logging)).map_err(AppError::Logging)
    }

    /// Chart generator fetching from the configured repository
    pub fn generator(&self) -> AppResult<MscChart<RecordFetcher>> {
        let fetcher = RecordFetcher::from_settings(&self.config.github)?;
        Ok(MscChart::with_config(fetcher, GraphConfig::from(&self.config.chart)))
    }

    /// Generation request for the command line; the chart type is checked here
    pub fn request(&self, cli: &Cli) -> AppResult<ChartRequest> {
        Ok(ChartRequest::new(cli.chart_type()?, &cli.output))
    }

    /// Run one generation for `cli`
    pub async fn run(&self, cli: &Cli) -> AppResult<()> {
        let request = self.request(cli)?;
        let generator = self.generator()?;
        Self::generate(&generator, &request).await
    }

    async fn generate<S: ProposalSource>(generator: &MscChart<S>, request: &ChartRequest) -> AppResult<()> {
        info!(
            chart = %request.chart_type,
            output = %request.output.display(),
            "Generating chart"
        );
        generator.generate(request).await?;
        info!(output = %request.output.display(), "Chart written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use msc_common::MscError;
    use msc_graphs::ChartType;

    fn config_with_token() -> Config {
        let mut config = Config::default();
        config.github.token = "ghp_test".to_string();
        config
    }

    #[test]
    fn test_request_from_cli() {
        let app = App::from_config(config_with_token());
        let cli = Cli::parse_from(["msc-chart", "stacked_area", "chart.png"]);

        let request = app.request(&cli).unwrap();
        assert_eq!(request.chart_type, ChartType::StackedArea);
        assert_eq!(request.output, Path::new("chart.png"));
        assert!(request.config.is_none());
    }

    #[test]
    fn test_generator_uses_chart_settings() {
        let mut config = config_with_token();
        config.chart.title = "Proposals over time".to_string();
        config.chart.width = 640;

        let generator = App::from_config(config).generator().unwrap();
        assert_eq!(generator.config().title, "Proposals over time");
        assert_eq!(generator.config().width, 640);
        assert_eq!(generator.source().label(), "proposal");
    }

    #[test]
    fn test_generator_without_token_is_auth_error() {
        let err = App::from_config(Config::default()).generator().unwrap_err();
        assert!(matches!(err.inner(), MscError::Authentication { .. }));
    }

    #[tokio::test]
    async fn test_unsupported_chart_type_fails_before_fetch() {
        // No token: reaching the fetcher would fail with an authentication error instead
        let app = App::from_config(Config::default());
        let cli = Cli::parse_from(["msc-chart", "bar", "chart.png"]);

        let err = app.run(&cli).await.unwrap_err();
        assert!(matches!(err.inner(), MscError::UnsupportedChartType { .. }));
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = App::load(Some(Path::new("/nonexistent/msc-chart.toml"))).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
