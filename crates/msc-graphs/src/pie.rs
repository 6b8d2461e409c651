//! Pie chart of current proposal counts per stage

use crate::renderer::{ensure_drawable, render_with, stage_color, GraphRenderer, RenderedImage};
use crate::{GraphConfig, Series, SeriesValues};
use msc_common::{MscError, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::{FRAC_PI_2, TAU};
use tracing::debug;

/// Arc resolution when approximating slice edges
const MAX_ARC_STEP: f64 = TAU / 360.0;

/// Renders total-count series as an outlined pie, one slice per series in
/// input order, labelled `"<Stage> (<count>)"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieRenderer;

impl PieRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Start and end angle of each slice, clockwise from twelve o'clock.
    ///
    /// Angles are in screen space (y grows downwards). A zero total yields
    /// no slices.
    pub fn slice_angles(counts: &[u64]) -> Vec<(f64, f64)> {
        let total: u64 = counts.iter().sum();
        if total == 0 {
            return Vec::new();
        }

        let mut start = -FRAC_PI_2;
        counts
            .iter()
            .map(|&count| {
                let end = start + TAU * count as f64 / total as f64;
                let slice = (start, end);
                start = end;
                slice
            })
            .collect()
    }

    /// Slice label in the `"Merged (12)"` style
    pub fn slice_label(series: &Series) -> String {
        format!("{} ({})", series.label(), series.latest())
    }

    /// Closed outline of a slice: centre, then the arc from `start` to `end`
    fn slice_polygon(center: (i32, i32), radius: f64, (start, end): (f64, f64)) -> Vec<(i32, i32)> {
        let steps = ((end - start) / MAX_ARC_STEP).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(steps + 2);
        points.push(center);
        for i in 0..=steps {
            let angle = start + (end - start) * i as f64 / steps as f64;
            points.push(Self::polar(center, radius, angle));
        }
        points
    }

    fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
        (
            center.0 + (radius * angle.cos()).round() as i32,
            center.1 + (radius * angle.sin()).round() as i32,
        )
    }
}

impl GraphRenderer for PieRenderer {
    fn name(&self) -> &'static str {
        "pie"
    }

    fn render(&self, config: &GraphConfig, series: &[Series]) -> Result<RenderedImage> {
        ensure_drawable(self.name(), config, series)?;
        if series.iter().any(|s| matches!(s.values, SeriesValues::Monthly(_))) {
            return Err(MscError::graph("Pie chart expects total counts, not monthly series"));
        }

        let counts: Vec<u64> = series.iter().map(Series::latest).collect();
        let angles = Self::slice_angles(&counts);
        if angles.is_empty() {
            return Err(MscError::graph("No proposals to draw in pie chart"));
        }

        let style = &config.style;
        let label_font = (style.label_font.family.as_str(), style.label_font.size);

        render_with(config, |root| {
            let area = root.titled(&config.title, (style.title_font.family.as_str(), style.title_font.size))?;
            let (width, height) = area.dim_in_pixel();
            let center = (width as i32 / 2, height as i32 / 2);
            let radius = f64::from(width.min(height)) * 0.35;
            debug!(slices = angles.len(), radius, "Drawing pie chart");

            for (s, &slice) in series.iter().zip(&angles) {
                let points = Self::slice_polygon(center, radius, slice);
                area.draw(&Polygon::new(points.clone(), stage_color(config, s.stage).filled()))?;

                let mut outline = points;
                outline.push(center);
                area.draw(&PathElement::new(outline, BLACK.stroke_width(2)))?;
            }

            for (s, &(start, end)) in series.iter().zip(&angles) {
                let mid = (start + end) / 2.0;
                let anchor = Self::polar(center, radius * 1.08, mid);
                let h_pos = if mid.cos() < 0.0 { HPos::Right } else { HPos::Left };
                let text_style = TextStyle::from(label_font).pos(Pos::new(h_pos, VPos::Center));
                area.draw(&Text::new(Self::slice_label(s), anchor, text_style))?;
            }

            Ok(())
        })
    }
}
