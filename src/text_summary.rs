//! Text summary builder for CLI output.
//!
//! Formats the statistics record as the fixed-width block printed to stdout.

use crate::model::LatencyStats;
use num_format::{Locale, ToFormattedString};

const RULE_WIDTH: usize = 60;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build the statistics block for `stats`, headed by `name` when given.
pub(crate) fn build_text_summary(stats: &LatencyStats, name: Option<&str>) -> TextSummary {
    let rule = "=".repeat(RULE_WIDTH);
    let lines = vec![
        String::new(),
        rule.clone(),
        format!("Statistics for {}", name.unwrap_or("")),
        rule.clone(),
        format!("Count:              {}", format_count(stats.count)),
        format!("Mean:               {:.2} ns", stats.mean),
        format!("Median:             {:.2} ns", stats.median),
        format!("Std Deviation:      {:.2} ns", stats.std_dev),
        format!("Min:                {:.2} ns", stats.min),
        format!("Max:                {:.2} ns", stats.max),
        format!(
            "{:<20}[{:.2}, {:.2}] ns",
            format!("{}% CI:", format_percent(stats.confidence)),
            stats.ci_lower,
            stats.ci_upper
        ),
        format!("50th Percentile:    {:.2} ns", stats.p50),
        format!("95th Percentile:    {:.2} ns", stats.p95),
        format!("99th Percentile:    {:.2} ns", stats.p99),
        rule,
        String::new(),
    ];
    TextSummary { lines }
}

/// `0.95` -> `95`, `0.995` -> `99.5`.
fn format_percent(fraction: f64) -> String {
    let pct = fraction * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{:.0}", pct)
    } else {
        format!("{}", (pct * 1e6).round() / 1e6)
    }
}

/// Render an integer with `,` thousands separators.
pub(crate) fn format_count(n: usize) -> String {
    n.to_formatted_string(&Locale::en)
}
