//! Statistical primitives shared by the summary and the plot panels.
//!
//! Percentiles use linear interpolation between the two nearest ranks
//! (`rank = q * (n - 1)`), so the median and p50 always agree.

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Return a sorted copy of the samples.
pub fn sorted(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Interpolated quantile of already sorted data, `fraction` in `[0, 1]`.
///
/// Returns `None` for empty input.
pub fn quantile_sorted(sorted: &[f64], fraction: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(sorted[0]);
    }

    let rank = fraction.clamp(0.0, 1.0) * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    Some(sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx]))
}

pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std_dev(samples: &[f64], mean: f64) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let variance =
        samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (samples.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Two-sided critical value of Student's t with `n - 1` degrees of freedom.
pub fn t_critical(confidence: f64, n: usize) -> Option<f64> {
    if n < 2 || !(confidence > 0.0 && confidence < 1.0) {
        return None;
    }
    let dist = StudentsT::new(0.0, 1.0, (n - 1) as f64).ok()?;
    Some(dist.inverse_cdf((1.0 + confidence) / 2.0))
}

/// Confidence interval `(lower, upper)` for the population mean.
pub fn mean_confidence_interval(
    mean: f64,
    std_dev: f64,
    n: usize,
    confidence: f64,
) -> Option<(f64, f64)> {
    let t = t_critical(confidence, n)?;
    let half_width = t * std_dev / (n as f64).sqrt();
    Some((mean - half_width, mean + half_width))
}
