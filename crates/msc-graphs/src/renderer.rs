//! Graph rendering trait and shared drawing helpers

use crate::{GraphConfig, Series};
use msc_common::{MscError, Result, Stage};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

/// Trait for chart renderers.
///
/// Renderers draw into memory; [`GraphRenderer::render_to_file`] writes the
/// image only after drawing succeeded, so a failed render leaves no file.
pub trait GraphRenderer: Send + Sync {
    /// Short name of the chart
    fn name(&self) -> &'static str;

    /// Draw `series` into an RGB image
    fn render(&self, config: &GraphConfig, series: &[Series]) -> Result<RenderedImage>;

    /// Draw `series` and write the image to `path`; the extension picks the format
    fn render_to_file(&self, config: &GraphConfig, series: &[Series], path: &Path) -> Result<()> {
        let image = self.render(config, series)?;
        image.save(path)?;
        info!(chart = self.name(), path = %path.display(), "Rendered chart");
        Ok(())
    }
}

/// An RGB8 image held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB bytes, `width * height * 3` long
    pub pixels: Vec<u8>,
}

impl RenderedImage {
    /// Blank image of the given size
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 3],
        }
    }

    /// Number of pixels exactly matching `color`
    pub fn pixel_count(&self, color: RGBColor) -> usize {
        let RGBColor(r, g, b) = color;
        self.pixels
            .chunks_exact(3)
            .filter(|px| **px == [r, g, b])
            .count()
    }

    /// Encode and write the image
    pub fn save(&self, path: &Path) -> Result<()> {
        image::save_buffer(path, &self.pixels, self.width, self.height, image::ColorType::Rgb8)
            .map_err(|e| MscError::graph_with_source(format!("Failed to write {}", path.display()), e))
    }
}

/// Parse a `#rrggbb` colour, falling back to black
pub fn parse_color(color: &str) -> RGBColor {
    if let Some(hex) = color.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return RGBColor(r, g, b);
            }
        }
    }
    RGBColor(0, 0, 0)
}

/// Configured colour for a stage
pub fn stage_color(config: &GraphConfig, stage: Stage) -> RGBColor {
    parse_color(config.style.stage_colors.for_stage(stage))
}

/// Background colour from the style config
pub fn background_color(config: &GraphConfig) -> RGBColor {
    parse_color(&config.style.background_color)
}

/// Fill the background, run `draw`, and hand back the pixels
pub(crate) fn render_with<F>(config: &GraphConfig, draw: F) -> Result<RenderedImage>
where
    F: for<'a> FnOnce(&DrawingArea<BitMapBackend<'a>, Shift>) -> Result<()>,
{
    let mut image = RenderedImage::blank(config.width, config.height);
    {
        let root = BitMapBackend::with_buffer(&mut image.pixels, (config.width, config.height))
            .into_drawing_area();
        root.fill(&background_color(config))?;
        draw(&root)?;
        root.present()?;
    }
    Ok(image)
}

/// Reject empty input and degenerate image sizes before drawing anything
pub(crate) fn ensure_drawable(chart: &str, config: &GraphConfig, series: &[Series]) -> Result<()> {
    if series.is_empty() {
        return Err(MscError::graph(format!("No data available for {chart} chart")));
    }
    if config.width == 0 || config.height == 0 {
        return Err(MscError::graph(format!(
            "Invalid image size {}x{}",
            config.width, config.height
        )));
    }
    Ok(())
}
