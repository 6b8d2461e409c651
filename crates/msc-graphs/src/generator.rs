//! End-to-end chart generation: fetch, aggregate, render

use crate::aggregator::ChartAggregator;
use crate::fetcher::ProposalSource;
use crate::pie::PieRenderer;
use crate::renderer::GraphRenderer;
use crate::stacked_area::StackedAreaRenderer;
use crate::{ChartRequest, ChartType, GraphConfig};
use msc_common::{MscError, Result};
use std::path::Path;
use tracing::{info, instrument};

/// Image formats the renderers can write
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Generates proposal charts from an injected record source.
///
/// Every call to [`MscChart::generate`] re-fetches the records.
#[derive(Debug, Clone)]
pub struct MscChart<S> {
    source: S,
    config: GraphConfig,
}

impl<S: ProposalSource> MscChart<S> {
    /// Chart generator with default styling
    pub fn new(source: S) -> Self {
        Self::with_config(source, GraphConfig::default())
    }

    /// Chart generator with the given default styling
    pub fn with_config(source: S, config: GraphConfig) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Fetch the records, aggregate them for the requested chart type, and
    /// write the image. Nothing is written when any step fails.
    #[instrument(skip(self, request), fields(chart = %request.chart_type, output = %request.output.display()))]
    pub async fn generate(&self, request: &ChartRequest) -> Result<()> {
        validate_output_path(&request.output)?;
        let config = request.config.as_ref().unwrap_or(&self.config);

        let records = self.source.fetch_records().await?;
        let series = ChartAggregator::new(config.history_start).aggregate(request.chart_type, &records);
        info!(records = records.len(), series = series.len(), "Aggregated proposals");

        renderer_for(request.chart_type).render_to_file(config, &series, &request.output)
    }
}

/// Renderer drawing `chart_type`
pub fn renderer_for(chart_type: ChartType) -> Box<dyn GraphRenderer> {
    match chart_type {
        ChartType::StackedArea => Box::new(StackedAreaRenderer::new()),
        ChartType::Pie => Box::new(PieRenderer::new()),
    }
}

/// Check the output has a supported image extension and an existing parent directory
pub fn validate_output_path(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| {
            MscError::validation_field(
                format!("Output path {} has no file extension", path.display()),
                "output",
            )
        })?;

    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(MscError::validation_field(
            format!(
                "Unsupported image format '{extension}', expected one of: {}",
                SUPPORTED_EXTENSIONS.join(", ")
            ),
            "output",
        ));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            return Err(MscError::validation_field(
                format!("Output directory {} does not exist", parent.display()),
                "output",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use msc_common::test_utils::sample_records;
    use msc_common::ProposalRecord;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    #[derive(Default)]
    struct CountingSource {
        records: Vec<ProposalRecord>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ProposalSource for CountingSource {
        async fn fetch_records(&self) -> Result<Vec<ProposalRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ProposalSource for FailingSource {
        async fn fetch_records(&self) -> Result<Vec<ProposalRecord>> {
            Err(MscError::transient_with_status("Server error", 502))
        }
    }

    #[test]
    fn test_validate_output_path() {
        let dir = tempdir().unwrap();

        assert!(validate_output_path(&dir.path().join("chart.png")).is_ok());
        assert!(validate_output_path(&dir.path().join("chart.JPG")).is_ok());
        assert!(validate_output_path(Path::new("chart.bmp")).is_ok());

        assert!(validate_output_path(&dir.path().join("chart")).is_err());
        assert!(validate_output_path(&dir.path().join("chart.svg")).is_err());
        assert!(validate_output_path(&dir.path().join("missing").join("chart.png")).is_err());
    }

    #[test]
    fn test_renderer_for() {
        assert_eq!(renderer_for(ChartType::Pie).name(), "pie");
        assert_eq!(renderer_for(ChartType::StackedArea).name(), "stacked-area");
    }

    #[tokio::test]
    async fn test_invalid_output_fails_before_fetch() {
        let chart = MscChart::new(CountingSource::default());
        let request = ChartRequest::new(ChartType::Pie, "chart.gif");

        let err = chart.generate(&request).await.unwrap_err();
        assert!(matches!(err, MscError::Validation { .. }));
        assert_eq!(chart.source().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_error_propagates_without_file() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("pie.png");
        let chart = MscChart::new(FailingSource);

        let err = chart.generate(&ChartRequest::new(ChartType::Pie, &output)).await.unwrap_err();
        assert_eq!(err.status_code(), Some(502));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_empty_records_are_graph_error() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("stacked.png");
        let chart = MscChart::new(CountingSource::default());

        let err = chart
            .generate(&ChartRequest::new(ChartType::StackedArea, &output))
            .await
            .unwrap_err();
        assert!(matches!(err, MscError::Graph { .. }));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_each_call_refetches() {
        let dir = tempdir().unwrap();
        let chart = MscChart::new(CountingSource::default());

        for _ in 0..2 {
            let _ = chart
                .generate(&ChartRequest::new(ChartType::Pie, dir.path().join("pie.png")))
                .await;
        }
        assert_eq!(chart.source().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_generate_both_charts() {
        let dir = tempdir().unwrap();
        let chart = MscChart::new(CountingSource {
            records: sample_records(),
            ..CountingSource::default()
        });

        for chart_type in [ChartType::Pie, ChartType::StackedArea] {
            let output = dir.path().join(format!("{chart_type}.png"));
            chart.generate(&ChartRequest::new(chart_type, &output)).await.unwrap();

            let written = image::open(&output).unwrap().to_rgb8();
            assert_eq!(written.dimensions(), (chart.config().width, chart.config().height));
            let new_pixels = written
                .pixels()
                .filter(|px| px.0 == [0x28, 0xa7, 0x45])
                .count();
            assert!(new_pixels > 1_000, "{chart_type}: {new_pixels} pixels in the New colour");
        }
    }
}
