use crate::model::{
    AnalysisConfig, DEFAULT_CONFIDENCE, DEFAULT_HISTOGRAM_BINS, DEFAULT_OFFSET, DEFAULT_OUTPUT_DIR,
};
use crate::plot::{self, FigureData};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Line-buffered stdout/stderr writer. Silent mode drops every line.
struct OutputWriter {
    silent: bool,
    out: std::io::LineWriter<std::io::StdoutLock<'static>>,
    err: std::io::LineWriter<std::io::StderrLock<'static>>,
}

impl OutputWriter {
    fn new(silent: bool) -> Self {
        Self {
            silent,
            out: std::io::LineWriter::new(std::io::stdout().lock()),
            err: std::io::LineWriter::new(std::io::stderr().lock()),
        }
    }

    fn send(&mut self, line: OutputLine) {
        if self.silent {
            return;
        }
        match line {
            OutputLine::Stdout(msg) => {
                let _ = writeln!(self.out, "{}", msg);
            }
            OutputLine::Stderr(msg) => {
                let _ = writeln!(self.err, "{}", msg);
            }
        }
    }
}

impl Drop for OutputWriter {
    fn drop(&mut self) {
        let _ = self.out.flush();
        let _ = self.err.flush();
    }
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "latency-analyze",
    version,
    about = "Summarise latency measurements and plot their distribution",
    after_help = "Examples:\n  latency-analyze output/semaphore.csv\n  latency-analyze output/filesystem_read.csv filesystem_read"
)]
pub struct Cli {
    /// File with one raw measurement per line (no header)
    pub csv_path: PathBuf,

    /// Label for the report and image name (defaults to the input file stem)
    pub output_name: Option<String>,

    /// Directory the figure is written to
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Baseline subtracted from every raw measurement
    #[arg(long, default_value_t = DEFAULT_OFFSET, allow_negative_numbers = true)]
    pub offset: f64,

    /// Confidence level for the interval around the mean, in (0, 1)
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    pub confidence: f64,

    /// Number of histogram bins
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    pub bins: usize,

    /// Print the statistics as JSON instead of the text block
    #[arg(long)]
    pub json: bool,

    /// Also write the statistics as JSON to this file
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Skip rendering the figure
    #[arg(long)]
    pub no_plot: bool,

    /// Suppress all output except errors
    #[arg(long)]
    pub silent: bool,
}

/// Label derived from the input path: `output/semaphore.csv` -> `semaphore`.
pub fn default_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "latency".to_string())
}

/// Build an `AnalysisConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> AnalysisConfig {
    AnalysisConfig {
        input: args.csv_path.clone(),
        name: args
            .output_name
            .clone()
            .unwrap_or_else(|| default_name(&args.csv_path)),
        output_dir: args.output_dir.clone(),
        offset: args.offset,
        confidence: args.confidence,
        histogram_bins: args.bins,
        plot: !args.no_plot,
        json: args.json,
        export_json: args.export_json.clone(),
    }
}

fn validate(args: &Cli) -> Result<()> {
    if !(args.confidence > 0.0 && args.confidence < 1.0) {
        return Err(anyhow::anyhow!(
            "--confidence must be between 0 and 1 (exclusive), got {}",
            args.confidence
        ));
    }
    if args.bins == 0 {
        return Err(anyhow::anyhow!("--bins must be at least 1"));
    }
    if !args.offset.is_finite() {
        return Err(anyhow::anyhow!("--offset must be a finite number"));
    }
    Ok(())
}

pub fn run(args: Cli) -> Result<()> {
    validate(&args)?;

    // Checked before anything is created on disk
    if !args.csv_path.exists() {
        return Err(anyhow::anyhow!(
            "File '{}' not found",
            args.csv_path.display()
        ));
    }

    let cfg = build_config(&args);
    let mut out = OutputWriter::new(args.silent);

    if cfg.plot {
        crate::storage::ensure_output_dir(&cfg.output_dir)?;
    }

    let samples = crate::loader::load_samples(&cfg.input, cfg.offset)?;
    out.send(OutputLine::Stderr(format!(
        "Loaded {} samples from {} (offset {})",
        samples.len(),
        cfg.input.display(),
        cfg.offset
    )));

    let stats = crate::metrics::compute_latency_stats(&samples, cfg.confidence).with_context(
        || {
            format!(
                "insufficient samples in {}: need at least 2 to compute statistics, got {}",
                cfg.input.display(),
                samples.len()
            )
        },
    )?;
    let report = crate::storage::build_report(&cfg, &stats);

    if cfg.json {
        let json = serde_json::to_string_pretty(&report)?;
        out.send(OutputLine::Stdout(json));
    } else {
        let summary = crate::text_summary::build_text_summary(&stats, Some(&cfg.name));
        for line in summary.lines {
            out.send(OutputLine::Stdout(line));
        }
    }

    if let Some(p) = cfg.export_json.as_deref() {
        crate::storage::export_json(p, &report)?;
        out.send(OutputLine::Stderr(format!("Exported JSON: {}", p.display())));
    }

    if !cfg.plot {
        out.send(OutputLine::Stderr("Plot skipped (--no-plot)".to_string()));
        return Ok(());
    }

    let plot_path = cfg.plot_path();
    let figure = FigureData::from_samples(&samples, cfg.histogram_bins)?;
    plot::render_figure(&figure, &cfg.plot_title(), &plot_path)
        .with_context(|| format!("failed to render {}", plot_path.display()))?;

    let saved = format!("Plot saved to: {}", plot_path.display());
    if cfg.json {
        // Keep stdout valid JSON
        out.send(OutputLine::Stderr(saved));
    } else {
        out.send(OutputLine::Stdout(saved));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("latency-analyze").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["output/semaphore.csv"]);
        let cfg = build_config(&args);
        assert_eq!(cfg.name, "semaphore");
        assert_eq!(cfg.output_dir, PathBuf::from("analysis"));
        assert_eq!(cfg.offset, 50_000.0);
        assert_eq!(cfg.confidence, 0.95);
        assert_eq!(cfg.histogram_bins, 50);
        assert!(cfg.plot);
        assert!(!cfg.json);
    }

    #[test]
    fn test_explicit_name_and_flags() {
        let args = parse(&[
            "output/filesystem.csv",
            "filesystem_read",
            "--offset",
            "-10",
            "--no-plot",
            "--json",
        ]);
        let cfg = build_config(&args);
        assert_eq!(cfg.name, "filesystem_read");
        assert_eq!(cfg.offset, -10.0);
        assert!(!cfg.plot);
        assert!(cfg.json);
    }

    #[test]
    fn test_missing_input_is_usage_error() {
        let err = Cli::try_parse_from(["latency-analyze"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_default_name_strips_dir_and_extension() {
        assert_eq!(default_name(Path::new("a/b/pipe.csv")), "pipe");
        assert_eq!(default_name(Path::new("run.1.csv")), "run.1");
        assert_eq!(default_name(Path::new("noext")), "noext");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(validate(&parse(&["x.csv", "--confidence", "1.0"])).is_err());
        assert!(validate(&parse(&["x.csv", "--confidence", "0"])).is_err());
        assert!(validate(&parse(&["x.csv", "--bins", "0"])).is_err());
        assert!(validate(&parse(&["x.csv", "--confidence", "0.99"])).is_ok());
    }
}
