use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Baseline subtracted from every raw timer reading before analysis.
pub const DEFAULT_OFFSET: f64 = 50_000.0;
pub const DEFAULT_CONFIDENCE: f64 = 0.95;
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;
pub const DEFAULT_OUTPUT_DIR: &str = "analysis";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub input: PathBuf,
    /// Label used for the report heading and the image file name.
    pub name: String,
    pub output_dir: PathBuf,
    pub offset: f64,
    pub confidence: f64,
    pub histogram_bins: usize,
    pub plot: bool,
    pub json: bool,
    #[serde(default)]
    pub export_json: Option<PathBuf>,
}

impl AnalysisConfig {
    /// Location of the rendered figure: `<output_dir>/<name>.png`.
    pub fn plot_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.png", self.name))
    }

    /// Figure-level title, e.g. `filesystem_read` -> `Filesystem Read Latency`.
    pub fn plot_title(&self) -> String {
        format!("{} Latency", title_case(&self.name.replace('_', " ")))
    }
}

/// Summary statistics over the offset-corrected samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Confidence level of `ci_lower..ci_upper`, e.g. `0.95`.
    pub confidence: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Document written by `--json` / `--export-json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub timestamp_utc: String,
    /// Settings the statistics were computed with.
    #[serde(flatten)]
    pub config: AnalysisConfig,
    pub stats: LatencyStats,
    #[serde(default)]
    pub plot_path: Option<PathBuf>,
}

/// Capitalise the first letter of every alphabetic run and lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
