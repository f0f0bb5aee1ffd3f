use crate::model::{AnalysisConfig, AnalysisReport, LatencyStats};
use anyhow::{Context, Result};
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Create the output directory (and parents) if it does not exist yet.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))
}

/// Build the JSON report for a finished analysis.
pub fn build_report(cfg: &AnalysisConfig, stats: &LatencyStats) -> AnalysisReport {
    AnalysisReport {
        timestamp_utc: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default(),
        config: cfg.clone(),
        stats: stats.clone(),
        plot_path: cfg.plot.then(|| cfg.plot_path()),
    }
}

pub fn export_json(path: &Path, report: &AnalysisReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
