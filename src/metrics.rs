use crate::model::LatencyStats;
use crate::stats;

/// Compute the full statistics record from offset-corrected samples.
///
/// Returns `None` with fewer than two samples: the standard error and the
/// t distribution are undefined there.
pub fn compute_latency_stats(samples: &[f64], confidence: f64) -> Option<LatencyStats> {
    if samples.len() < 2 {
        return None;
    }
    let sorted = stats::sorted(samples);
    let n = sorted.len();

    let mean = stats::mean(samples)?;
    let std_dev = stats::sample_std_dev(samples, mean)?;
    let (ci_lower, ci_upper) = stats::mean_confidence_interval(mean, std_dev, n, confidence)?;
    let median = stats::quantile_sorted(&sorted, 0.50)?;

    Some(LatencyStats {
        count: n,
        mean,
        median,
        std_dev,
        min: sorted[0],
        max: sorted[n - 1],
        confidence,
        ci_lower,
        ci_upper,
        p50: median,
        p95: stats::quantile_sorted(&sorted, 0.95)?,
        p99: stats::quantile_sorted(&sorted, 0.99)?,
    })
}
