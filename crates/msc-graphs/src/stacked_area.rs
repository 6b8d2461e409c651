//! Stacked area chart of cumulative proposal counts per stage

use crate::renderer::{ensure_drawable, render_with, stage_color, GraphRenderer, RenderedImage};
use crate::{GraphConfig, Series};
use msc_common::{Month, MscError, Result};
use plotters::prelude::*;
use tracing::debug;

/// Renders monthly series as stacked bands, first series at the bottom.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackedAreaRenderer;

impl StackedAreaRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Upper edge of each band: the running sum of the series at and below it.
    fn band_tops(series: &[Series]) -> Vec<Vec<u64>> {
        let mut tops: Vec<Vec<u64>> = Vec::with_capacity(series.len());
        for s in series {
            let band: Vec<u64> = match tops.last() {
                Some(below) => s
                    .points()
                    .iter()
                    .zip(below)
                    .map(|(p, base)| p.count + base)
                    .collect(),
                None => s.points().iter().map(|p| p.count).collect(),
            };
            tops.push(band);
        }
        tops
    }

    /// Plot points of one band. A single month is stretched across the
    /// whole `0..1` axis so the band has width.
    fn band_points(top: &[u64]) -> Vec<(u32, u64)> {
        match top {
            [only] => vec![(0, *only), (1, *only)],
            _ => (0u32..).zip(top.iter().copied()).collect(),
        }
    }

    /// Months shared by every series, checking the series agree
    fn months(series: &[Series]) -> Result<Vec<Month>> {
        let months: Vec<Month> = series[0].points().iter().map(|p| p.month).collect();
        if months.is_empty() {
            return Err(MscError::graph("Stacked area chart needs at least one month"));
        }
        let aligned = series.iter().all(|s| {
            s.points().len() == months.len()
                && s.points().iter().zip(&months).all(|(p, m)| p.month == *m)
        });
        if !aligned {
            return Err(MscError::graph("Stacked area series cover different months"));
        }
        Ok(months)
    }
}

impl GraphRenderer for StackedAreaRenderer {
    fn name(&self) -> &'static str {
        "stacked-area"
    }

    fn render(&self, config: &GraphConfig, series: &[Series]) -> Result<RenderedImage> {
        ensure_drawable(self.name(), config, series)?;
        let months = Self::months(series)?;
        let tops = Self::band_tops(series);

        let last_index = u32::try_from(months.len() - 1)
            .map_err(|_| MscError::graph("Too many months to plot"))?;
        let x_max = last_index.max(1);
        let y_max = tops
            .last()
            .and_then(|top| top.iter().copied().max())
            .unwrap_or(0);
        // Headroom above the tallest stack
        let y_max = (y_max + y_max / 10).max(1);
        debug!(months = months.len(), y_max, "Drawing stacked area chart");

        let style = &config.style;
        let label_font = (style.label_font.family.as_str(), style.label_font.size);
        let month_label = |x: &u32| {
            months
                .get(*x as usize)
                .map(|m| m.short_label())
                .unwrap_or_default()
        };

        render_with(config, |root| {
            let mut chart = ChartBuilder::on(root)
                .caption(&config.title, (style.title_font.family.as_str(), style.title_font.size))
                .margin(style.margins.top)
                .x_label_area_size(style.margins.bottom)
                .y_label_area_size(style.margins.left)
                .build_cartesian_2d(0u32..x_max, 0u64..y_max)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(months.len().min(12))
                .x_label_formatter(&month_label)
                .x_desc(config.x_label.as_deref().unwrap_or(""))
                .y_desc(config.y_label.as_deref().unwrap_or(""))
                .label_style(label_font)
                .draw()?;

            // Tallest band first so each lower band paints over its share
            for (s, top) in series.iter().zip(&tops).rev() {
                let color = stage_color(config, s.stage);
                chart
                    .draw_series(
                        AreaSeries::new(Self::band_points(top), 0u64, color.filled())
                            .border_style(&BLACK.mix(0.4)),
                    )?
                    .label(s.label())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));
            }

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font(label_font)
                .draw()?;

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MonthlyCount;
    use msc_common::Stage;
    use tempfile::tempdir;

    fn monthly(stage: Stage, start: Month, counts: &[u64]) -> Series {
        let mut month = start;
        let mut points = Vec::new();
        for &count in counts {
            points.push(MonthlyCount { month, count });
            month = month.succ();
        }
        Series::monthly(stage, points)
    }

    fn start() -> Month {
        Month::new(2018, 11).unwrap()
    }

    #[test]
    fn test_band_tops_accumulate_upwards() {
        let series = vec![
            monthly(Stage::New, start(), &[1, 2, 3]),
            monthly(Stage::Merged, start(), &[0, 1, 1]),
            monthly(Stage::Closed, start(), &[2, 2, 4]),
        ];

        let tops = StackedAreaRenderer::band_tops(&series);
        assert_eq!(tops, vec![vec![1, 2, 3], vec![1, 3, 4], vec![3, 5, 8]]);
    }

    #[test]
    fn test_months_requires_aligned_series() {
        let aligned = vec![
            monthly(Stage::New, start(), &[1, 2]),
            monthly(Stage::Merged, start(), &[0, 1]),
        ];
        let months = StackedAreaRenderer::months(&aligned).unwrap();
        assert_eq!(months, vec![start(), start().succ()]);

        let shifted = vec![
            monthly(Stage::New, start(), &[1, 2]),
            monthly(Stage::Merged, start().succ(), &[0, 1]),
        ];
        assert!(StackedAreaRenderer::months(&shifted).is_err());

        let no_months = vec![monthly(Stage::New, start(), &[])];
        assert!(StackedAreaRenderer::months(&no_months).is_err());
    }

    #[test]
    fn test_empty_series_is_graph_error_without_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.png");

        let err = StackedAreaRenderer::new()
            .render_to_file(&GraphConfig::default(), &[], &path)
            .unwrap_err();
        assert!(matches!(err, MscError::Graph { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_total_series_rejected() {
        let err = StackedAreaRenderer::new()
            .render(&GraphConfig::default(), &[Series::total(Stage::New, 3)])
            .unwrap_err();
        assert!(matches!(err, MscError::Graph { .. }));
    }

    #[test]
    fn test_band_points() {
        assert_eq!(StackedAreaRenderer::band_points(&[5]), vec![(0, 5), (1, 5)]);
        assert_eq!(StackedAreaRenderer::band_points(&[1, 3, 4]), vec![(0, 1), (1, 3), (2, 4)]);
    }

    fn single_stage_series(counts: &[u64]) -> Vec<Series> {
        Stage::ALL
            .into_iter()
            .map(|stage| {
                let stage_counts: Vec<u64> = counts
                    .iter()
                    .map(|&c| if stage == Stage::New { c } else { 0 })
                    .collect();
                monthly(stage, start(), &stage_counts)
            })
            .collect()
    }

    #[test]
    fn test_single_month_fills_plot_area() {
        let config = GraphConfig::default();
        let new_color = stage_color(&config, Stage::New);

        let one_month = StackedAreaRenderer::new()
            .render(&config, &single_stage_series(&[5]))
            .unwrap();
        let two_months = StackedAreaRenderer::new()
            .render(&config, &single_stage_series(&[5, 5]))
            .unwrap();

        // Far more than the legend swatch alone
        assert!(one_month.pixel_count(new_color) > 100_000);
        assert!(two_months.pixel_count(new_color) > 100_000);
    }

    #[test]
    fn test_render_to_file() {
        let series: Vec<Series> = Stage::ALL
            .into_iter()
            .enumerate()
            .map(|(i, stage)| monthly(stage, start(), &[i as u64, i as u64 + 1, i as u64 + 3]))
            .collect();

        let dir = tempdir().unwrap();
        let path = dir.path().join("stacked.png");
        StackedAreaRenderer::new()
            .render_to_file(&GraphConfig::default(), &series, &path)
            .unwrap();
        assert!(path.exists());
    }
}
