use std::path::Path;
use std::process::{Command, Output};

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_latency-analyze"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to spawn latency-analyze")
}

fn write_samples(dir: &Path, name: &str, values: &[&str]) {
    let mut body = values.join("\n");
    body.push('\n');
    std::fs::write(dir.join(name), body).unwrap();
}

#[test]
fn missing_argument_prints_usage_and_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage"), "{stderr}");
    assert!(!dir.path().join("analysis").exists());
}

#[test]
fn missing_file_exits_one_without_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), &["output/nope.csv"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("File 'output/nope.csv' not found"), "{stderr}");
    assert!(!dir.path().join("analysis").exists());
    assert!(out.stdout.is_empty());
}

#[test]
fn prints_statistics_for_shifted_samples() {
    let dir = tempfile::tempdir().unwrap();
    write_samples(
        dir.path(),
        "semaphore.csv",
        &["50001", "50002", "50003", "50004", "50005"],
    );
    let out = run_in(dir.path(), &["semaphore.csv", "--no-plot"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Statistics for semaphore"), "{stdout}");
    assert!(stdout.contains("Count:              5\n"), "{stdout}");
    assert!(stdout.contains("Mean:               3.00 ns"), "{stdout}");
    assert!(stdout.contains("Median:             3.00 ns"), "{stdout}");
    assert!(stdout.contains("Min:                1.00 ns"), "{stdout}");
    assert!(stdout.contains("Max:                5.00 ns"), "{stdout}");
    assert!(stdout.contains("95% CI:             [1.04, 4.96] ns"), "{stdout}");
    assert!(!dir.path().join("analysis").exists());
}

#[test]
fn json_mode_emits_parseable_report() {
    let dir = tempfile::tempdir().unwrap();
    write_samples(dir.path(), "pipe.csv", &["50001", "50002", "50003", "50004", "50005"]);
    let out = run_in(dir.path(), &["pipe.csv", "pipe_write", "--json", "--no-plot"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["name"], "pipe_write");
    assert_eq!(report["input"], "pipe.csv");
    assert_eq!(report["offset"], 50_000.0);
    assert_eq!(report["histogram_bins"], 50);
    assert_eq!(report["plot"], false);
    assert_eq!(report["stats"]["count"], 5);
    assert_eq!(report["stats"]["mean"], 3.0);
    assert_eq!(report["stats"]["median"], 3.0);
    assert!(report["plot_path"].is_null());
}

#[test]
fn custom_offset_and_export() {
    let dir = tempfile::tempdir().unwrap();
    write_samples(dir.path(), "raw.csv", &["10", "20", "30"]);
    let out = run_in(
        dir.path(),
        &[
            "raw.csv",
            "--offset",
            "0",
            "--no-plot",
            "--silent",
            "--export-json",
            "reports/raw.json",
        ],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(out.stdout.is_empty());

    let text = std::fs::read_to_string(dir.path().join("reports/raw.json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(report["offset"], 0.0);
    assert_eq!(report["stats"]["mean"], 20.0);
    assert_eq!(report["stats"]["max"], 30.0);
}

#[test]
fn single_sample_fails_loudly() {
    let dir = tempfile::tempdir().unwrap();
    write_samples(dir.path(), "one.csv", &["50010"]);
    let out = run_in(dir.path(), &["one.csv", "--no-plot"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("insufficient samples"), "{stderr}");
}

#[test]
fn malformed_line_fails_with_line_number() {
    let dir = tempfile::tempdir().unwrap();
    write_samples(dir.path(), "bad.csv", &["50001", "oops", "50003"]);
    let out = run_in(dir.path(), &["bad.csv", "--no-plot"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("line 2"), "{stderr}");
}

#[test]
fn non_finite_value_fails_with_line_number() {
    let dir = tempfile::tempdir().unwrap();
    write_samples(dir.path(), "nan.csv", &["50001", "50002", "NaN"]);
    let out = run_in(dir.path(), &["nan.csv", "--no-plot"]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("line 3"), "{stderr}");
}

#[test]
fn renders_png_figure() {
    let dir = tempfile::tempdir().unwrap();
    let values: Vec<String> = (0..2000).map(|i| (50_000 + 100 + i % 37).to_string()).collect();
    let refs: Vec<&str> = values.iter().map(String::as_str).collect();
    write_samples(dir.path(), "filesystem_read.csv", &refs);

    let out = run_in(dir.path(), &["filesystem_read.csv"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Plot saved to: analysis/filesystem_read.png"), "{stdout}");

    let png = std::fs::read(dir.path().join("analysis/filesystem_read.png")).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}
