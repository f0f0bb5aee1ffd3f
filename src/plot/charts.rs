use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::data::{BoxPlotData, CdfData, HistogramData, TimeSeriesData};
use super::{pt, PlotError, Result};
use crate::text_summary::format_count;

const CAPTION_PT: f64 = 12.0;
const LABEL_PT: f64 = 10.0;
const ANNOTATION_PT: f64 = 10.0;
const MARKER_LABEL_PT: f64 = 8.0;

const WHEAT: RGBColor = RGBColor(245, 222, 179);
const ORANGE: RGBColor = RGBColor(255, 127, 14);
const MARKER_RED: RGBColor = RGBColor(214, 39, 40);

fn font(points: f64) -> TextStyle<'static> {
    TextStyle::from(("sans-serif", pt(points)).into_font())
}

fn config_err(e: impl std::fmt::Display) -> PlotError {
    PlotError::ChartConfig(e.to_string())
}

fn draw_err(e: impl std::fmt::Display) -> PlotError {
    PlotError::Drawing(e.to_string())
}

/// Start a panel chart with the shared caption, margin and label areas.
fn panel_builder<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    caption: &str,
) -> ChartBuilder<'a, 'static, DB> {
    let mut builder = ChartBuilder::on(area);
    builder
        .caption(caption, font(CAPTION_PT))
        .margin(pt(8.0) as i32)
        .x_label_area_size(pt(30.0) as i32)
        .y_label_area_size(pt(48.0) as i32);
    builder
}

pub fn draw_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    hist: &HistogramData,
) -> Result<()> {
    let (x_min, x_max) = hist.range;
    let y_max = hist.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64 * 1.05;

    let caption = format!("Histogram (99.5% of data, n={})", format_count(hist.kept));
    let mut chart = panel_builder(area, &caption)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(config_err)?;

    chart
        .configure_mesh()
        .x_desc("Latency (ns)")
        .y_desc("Frequency")
        .label_style(font(LABEL_PT))
        .axis_desc_style(font(LABEL_PT))
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.15))
        .x_label_formatter(&|x| format!("{:.0}", x))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(hist.bins.iter().map(|b| {
            Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], BLUE.mix(0.7).filled())
        }))
        .map_err(draw_err)?;
    chart
        .draw_series(hist.bins.iter().filter(|b| b.count > 0).map(|b| {
            Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], BLACK.stroke_width(2))
        }))
        .map_err(draw_err)?;

    // Outlier note in the top right corner of the plotting area
    let lines = [
        format!("{} outliers removed", format_count(hist.outliers)),
        format!("Max: {:.0}ns", hist.true_max),
    ];
    let inner = chart.plotting_area().strip_coord_spec();
    let (w, h) = inner.dim_in_pixel();
    let style = font(ANNOTATION_PT).pos(Pos::new(HPos::Right, VPos::Top));
    let line_height = pt(ANNOTATION_PT * 1.3) as i32;
    let pad = pt(4.0) as i32;
    let right = (w as f64 * 0.95) as i32;
    let top = (h as f64 * 0.05) as i32;

    let mut widest = 0i32;
    for line in &lines {
        let (tw, _) = inner.estimate_text_size(line, &style).map_err(draw_err)?;
        widest = widest.max(tw as i32);
    }
    inner
        .draw(&Rectangle::new(
            [
                (right - widest - pad, top - pad),
                (right + pad, top + line_height * lines.len() as i32 + pad),
            ],
            WHEAT.mix(0.5).filled(),
        ))
        .map_err(draw_err)?;
    for (i, line) in lines.iter().enumerate() {
        inner
            .draw(&Text::new(
                line.clone(),
                (right, top + line_height * i as i32),
                style.clone(),
            ))
            .map_err(draw_err)?;
    }

    Ok(())
}

pub fn draw_time_series<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    series: &TimeSeriesData,
) -> Result<()> {
    let (x_min, x_max) = series.x_range;
    let (y_min, y_max) = series.y_range;

    let mut chart = panel_builder(area, "Time Series (sampled)")
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(config_err)?;

    chart
        .configure_mesh()
        .x_desc("Iteration")
        .y_desc("Latency (ns)")
        .label_style(font(LABEL_PT))
        .axis_desc_style(font(LABEL_PT))
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.15))
        .x_label_formatter(&|x| format!("{:.0}", x))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .draw()
        .map_err(draw_err)?;

    // Values outside the clip range are pinned to the axis edge
    chart
        .draw_series(LineSeries::new(
            series
                .points
                .iter()
                .map(|&(x, y)| (x, y.clamp(y_min, y_max))),
            BLUE.mix(0.7).stroke_width(2),
        ))
        .map_err(draw_err)?;

    Ok(())
}

pub fn draw_box_plot<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    stats: &BoxPlotData,
) -> Result<()> {
    let (y_min, y_max) = stats.y_range;

    let mut chart = panel_builder(area, "Box Plot (outliers removed)")
        .build_cartesian_2d(0.5f64..1.5f64, y_min..y_max)
        .map_err(config_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(3)
        .y_desc("Latency (ns)")
        .label_style(font(LABEL_PT))
        .axis_desc_style(font(LABEL_PT))
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.15))
        .x_label_formatter(&|x| {
            if (*x - 1.0).abs() < 1e-9 {
                "1".to_string()
            } else {
                String::new()
            }
        })
        .y_label_formatter(&|y| format!("{:.0}", y))
        .draw()
        .map_err(draw_err)?;

    let (left, right) = (0.925, 1.075);
    let (cap_left, cap_right) = (0.9625, 1.0375);
    let outline = BLACK.stroke_width(3);

    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(left, stats.q1), (right, stats.q3)],
            outline,
        )))
        .map_err(draw_err)?;

    let segments = [
        // Whiskers
        vec![(1.0, stats.q1), (1.0, stats.whisker_low)],
        vec![(1.0, stats.q3), (1.0, stats.whisker_high)],
        // Whisker caps
        vec![(cap_left, stats.whisker_low), (cap_right, stats.whisker_low)],
        vec![(cap_left, stats.whisker_high), (cap_right, stats.whisker_high)],
    ];
    chart
        .draw_series(segments.into_iter().map(|s| PathElement::new(s, outline)))
        .map_err(draw_err)?;

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(left, stats.median), (right, stats.median)],
            ORANGE.stroke_width(3),
        )))
        .map_err(draw_err)?;

    chart
        .draw_series(
            stats
                .fliers
                .iter()
                .map(|v| Circle::new((1.0, *v), pt(3.0) as i32, BLACK.stroke_width(2))),
        )
        .map_err(draw_err)?;

    Ok(())
}

pub fn draw_cdf<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, cdf: &CdfData) -> Result<()> {
    let (x_min, x_max) = cdf.x_range;

    let mut chart = panel_builder(area, "Cumulative Distribution")
        .build_cartesian_2d(x_min..x_max, 0.0f64..1.05f64)
        .map_err(config_err)?;

    chart
        .configure_mesh()
        .x_desc("Latency (ns)")
        .y_desc("CDF")
        .label_style(font(LABEL_PT))
        .axis_desc_style(font(LABEL_PT))
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.15))
        .x_label_formatter(&|x| format!("{:.0}", x))
        .y_label_formatter(&|y| format!("{:.1}", y))
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(LineSeries::new(cdf.points.iter().copied(), BLUE.stroke_width(6)))
        .map_err(draw_err)?;

    let guide = MARKER_RED.mix(0.5).stroke_width(3);
    for marker in &cdf.markers {
        let x = marker.value.clamp(x_min, x_max);
        let y = marker.fraction;
        let (dash, gap) = (pt(6.0) as i32, pt(3.0) as i32);
        chart
            .draw_series(DashedLineSeries::new(vec![(x_min, y), (x_max, y)], dash, gap, guide))
            .map_err(draw_err)?;
        chart
            .draw_series(DashedLineSeries::new(vec![(x, 0.0), (x, 1.05)], dash, gap, guide))
            .map_err(draw_err)?;
        chart
            .draw_series(std::iter::once(Text::new(
                format!(" {}={:.0}ns", marker.label, marker.value),
                (x, y),
                font(MARKER_LABEL_PT),
            )))
            .map_err(draw_err)?;
    }

    Ok(())
}
