//! Four panel latency figure.
//!
//! Panels are laid out on a 2x2 grid under a shared bold title and written
//! as a single PNG using the [`plotters`] bitmap backend. The canvas models a
//! 14x10 inch figure at 300 DPI and is filled edge to edge.

mod charts;
pub mod data;

pub use data::FigureData;

use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

pub const DPI: f64 = 300.0;
pub const FIGURE_SIZE_IN: (f64, f64) = (14.0, 10.0);

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// Convert a typographic size in points to pixels at the figure DPI.
pub(crate) fn pt(points: f64) -> f64 {
    points * DPI / 72.0
}

/// Pixel dimensions of the output image.
pub fn figure_pixels() -> (u32, u32) {
    (
        (FIGURE_SIZE_IN.0 * DPI).round() as u32,
        (FIGURE_SIZE_IN.1 * DPI).round() as u32,
    )
}

/// Render all four panels and save the figure to `output_path`.
pub fn render_figure(data: &FigureData, title: &str, output_path: &Path) -> Result<()> {
    let root = BitMapBackend::new(output_path, figure_pixels()).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let title_style = ("sans-serif", pt(16.0)).into_font().style(FontStyle::Bold);
    let body = root
        .titled(title, title_style)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let panels = body.split_evenly((2, 2));
    charts::draw_histogram(&panels[0], &data.histogram)?;
    charts::draw_time_series(&panels[1], &data.series)?;
    charts::draw_box_plot(&panels[2], &data.box_plot)?;
    charts::draw_cdf(&panels[3], &data.cdf)?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figure_pixels_match_dpi() {
        assert_eq!(figure_pixels(), (4200, 3000));
    }

    #[test]
    fn test_pt_scaling() {
        assert!((pt(72.0) - 300.0).abs() < 1e-9);
        assert!((pt(12.0) - 50.0).abs() < 1e-9);
    }

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn render_to_tempdir(samples: &[f64]) -> Vec<u8> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.png");
        let data = FigureData::from_samples(samples, 50).unwrap();
        render_figure(&data, "Test Latency", &path).unwrap();
        std::fs::read(&path).unwrap()
    }

    #[test]
    fn test_render_constant_samples() {
        let bytes = render_to_tempdir(&[7.0; 50]);
        assert!(bytes.starts_with(PNG_MAGIC));
    }

    #[test]
    fn test_render_two_samples() {
        let bytes = render_to_tempdir(&[1.0, 5.0]);
        assert!(bytes.starts_with(PNG_MAGIC));
    }

    #[test]
    fn test_render_decimated_series() {
        // More points than the time series keeps, with a long tail
        let samples: Vec<f64> = (0..25_000)
            .map(|i| if i % 997 == 0 { 40_000.0 } else { 100.0 + (i % 89) as f64 })
            .collect();
        let bytes = render_to_tempdir(&samples);
        assert!(bytes.starts_with(PNG_MAGIC));
    }
}
