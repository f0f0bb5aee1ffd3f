//! Panel data derivation.
//!
//! Everything the four panels show is computed here from the raw samples so
//! the drawing code in [`super::charts`] only maps values to pixels.

use super::PlotError;
use crate::stats;

/// Values above this quantile are dropped from the histogram and box plot.
pub const OUTLIER_QUANTILE: f64 = 0.995;
/// Axis clipping range for the time series and CDF panels.
pub const CLIP_QUANTILES: (f64, f64) = (0.001, 0.999);
/// Time series panel is decimated above this many points.
pub const MAX_SERIES_POINTS: usize = 10_000;
pub const WHISKER_IQR: f64 = 1.5;
/// Reference lines drawn on the CDF panel.
pub const CDF_MARKERS: [(f64, &str); 3] = [(0.50, "P50"), (0.95, "P95"), (0.99, "P99")];

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct HistogramData {
    pub bins: Vec<HistogramBin>,
    pub range: (f64, f64),
    /// Samples at or below the outlier quantile.
    pub kept: usize,
    pub outliers: usize,
    /// Maximum of the unfiltered data.
    pub true_max: f64,
}

#[derive(Debug, Clone)]
pub struct TimeSeriesData {
    /// `(original index, value)` in file order.
    pub points: Vec<(f64, f64)>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

#[derive(Debug, Clone)]
pub struct BoxPlotData {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub fliers: Vec<f64>,
    pub y_range: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PercentileMarker {
    pub label: &'static str,
    pub fraction: f64,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct CdfData {
    /// `(value, rank / n)` restricted to `x_range`.
    pub points: Vec<(f64, f64)>,
    pub x_range: (f64, f64),
    pub markers: Vec<PercentileMarker>,
}

#[derive(Debug, Clone)]
pub struct FigureData {
    pub histogram: HistogramData,
    pub series: TimeSeriesData,
    pub box_plot: BoxPlotData,
    pub cdf: CdfData,
}

impl FigureData {
    pub fn from_samples(samples: &[f64], bins: usize) -> Result<Self, PlotError> {
        if samples.is_empty() {
            return Err(PlotError::InvalidData("Data cannot be empty".to_string()));
        }
        if bins == 0 {
            return Err(PlotError::InvalidData(
                "Histogram needs at least one bin".to_string(),
            ));
        }
        if let Some(bad) = samples.iter().find(|v| !v.is_finite()) {
            return Err(PlotError::InvalidData(format!(
                "Non-finite sample {bad} cannot be plotted"
            )));
        }

        let sorted = stats::sorted(samples);
        let quantile = |q: f64| stats::quantile_sorted(&sorted, q).unwrap_or(sorted[0]);
        let clip = widen_range(quantile(CLIP_QUANTILES.0), quantile(CLIP_QUANTILES.1));

        let cutoff = quantile(OUTLIER_QUANTILE);
        let filtered: Vec<f64> = samples.iter().copied().filter(|v| *v <= cutoff).collect();

        Ok(Self {
            histogram: histogram(&filtered, samples.len(), sorted[sorted.len() - 1], bins),
            series: time_series(samples, clip),
            box_plot: box_plot(&filtered),
            cdf: cdf(&sorted, clip),
        })
    }
}

/// Give a zero-width range a unit span so axes stay valid.
pub fn widen_range(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

/// Equal-width bins over `[min, max]` of `values`; the last bin is closed.
fn histogram(values: &[f64], total: usize, true_max: f64, bins: usize) -> HistogramData {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = widen_range(lo, hi);
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: lo + width * (i + 1) as f64,
            count,
        })
        .collect();

    HistogramData {
        bins,
        range: (lo, hi),
        kept: values.len(),
        outliers: total - values.len(),
        true_max,
    }
}

/// Every `n / MAX_SERIES_POINTS`-th sample once the series is too long to draw.
fn time_series(samples: &[f64], y_range: (f64, f64)) -> TimeSeriesData {
    let step = if samples.len() > MAX_SERIES_POINTS {
        samples.len() / MAX_SERIES_POINTS
    } else {
        1
    };
    let points = samples
        .iter()
        .enumerate()
        .step_by(step)
        .map(|(i, v)| (i as f64, *v))
        .collect();

    TimeSeriesData {
        points,
        x_range: widen_range(0.0, (samples.len() - 1) as f64),
        y_range,
    }
}

fn box_plot(values: &[f64]) -> BoxPlotData {
    let sorted = stats::sorted(values);
    let quantile = |q: f64| stats::quantile_sorted(&sorted, q).unwrap_or(0.0);
    let q1 = quantile(0.25);
    let median = quantile(0.50);
    let q3 = quantile(0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - WHISKER_IQR * iqr;
    let high_fence = q3 + WHISKER_IQR * iqr;

    let whisker_low = sorted
        .iter()
        .copied()
        .find(|v| *v >= low_fence)
        .unwrap_or(q1);
    let whisker_high = sorted
        .iter()
        .rev()
        .copied()
        .find(|v| *v <= high_fence)
        .unwrap_or(q3);
    let fliers: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v < whisker_low || *v > whisker_high)
        .collect();

    let lo = sorted.first().copied().unwrap_or(0.0);
    let hi = sorted.last().copied().unwrap_or(0.0);
    let (lo, hi) = widen_range(lo, hi);
    let pad = (hi - lo) * 0.05;

    BoxPlotData {
        q1,
        median,
        q3,
        whisker_low,
        whisker_high,
        fliers,
        y_range: (lo - pad, hi + pad),
    }
}

fn cdf(sorted: &[f64], x_range: (f64, f64)) -> CdfData {
    let n = sorted.len() as f64;
    let points = sorted
        .iter()
        .enumerate()
        .map(|(i, v)| (*v, (i + 1) as f64 / n))
        .filter(|(v, _)| *v >= x_range.0 && *v <= x_range.1)
        .collect();
    let markers = CDF_MARKERS
        .iter()
        .map(|&(fraction, label)| PercentileMarker {
            label,
            fraction,
            value: stats::quantile_sorted(sorted, fraction).unwrap_or(sorted[0]),
        })
        .collect();

    CdfData {
        points,
        x_range,
        markers,
    }
}
