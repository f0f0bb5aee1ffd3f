//! Sample loading.
//!
//! Input is plain text with one raw measurement per line and no header.
//! Blank lines are ignored; anything else that is not a number is an error.

use anyhow::{Context, Result};
use std::path::Path;

/// Read the samples at `path` and subtract `offset` from each one.
pub fn load_samples(path: &Path, offset: f64) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_samples(&text, offset).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parse newline separated samples, preserving file order.
pub fn parse_samples(text: &str, offset: f64) -> Result<Vec<f64>> {
    let mut samples = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let field = line.trim();
        if field.is_empty() {
            continue;
        }
        let raw: f64 = field
            .parse()
            .with_context(|| format!("line {}: invalid number {:?}", idx + 1, field))?;
        if !raw.is_finite() {
            anyhow::bail!("line {}: invalid number {:?} (not finite)", idx + 1, field);
        }
        samples.push(raw - offset);
    }
    Ok(samples)
}
