//! CLI tests for runtime-stats
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests
//!
//! Feed trace JSON through the binary and check the rendered histograms

use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const TRACE: &str = r#"{
    "slices": [
        {"start": 0, "duration": 5, "category": "Parse", "count": 1},
        {"start": 10, "duration": 3, "category": "Blink C++", "count": 1}
    ],
    "stages": [
        {"title": "Load", "url": "https://example.com/", "start": 0, "end": 10}
    ]
}"#;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_text_output_lists_stage_and_total_histograms() {
    let trace = write_temp(TRACE);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("runtime-stats");
    cmd.arg("--input")
        .arg(trace.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Load_Parse:duration"))
        .stdout(predicate::str::contains("Load_V8-Only:count"))
        .stdout(predicate::str::contains("V8-Only-Main-Thread:duration"))
        .stdout(predicate::str::contains("[Load=0.005]"));
}

#[test]
fn test_boundary_slice_not_in_stage_output() {
    let trace = write_temp(TRACE);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("runtime-stats");
    cmd.arg("-i")
        .arg(trace.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Load_Blink C++").not())
        .stdout(predicate::str::contains("Blink C++:duration"));
}

#[test]
fn test_json_output_is_histogram_array() {
    let trace = write_temp(TRACE);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("runtime-stats");
    let output = cmd
        .arg("-i")
        .arg(trace.path())
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let histograms = value.as_array().unwrap();
    // Stage: Parse + 3 derived; total: Parse, Blink C++ + 3 derived; x2 kinds
    assert_eq!(histograms.len(), 18);

    let total = histograms
        .iter()
        .find(|h| h["name"] == "V8-Only:duration")
        .unwrap();
    assert_eq!(total["unit"], "ms_smallerIsBetter");
    assert_eq!(
        total["diagnostics"]["RAIL stages"]["names"]["Load"],
        "Load_V8-Only:duration"
    );
    assert_eq!(total["summaryOptions"]["std"], false);
    assert_eq!(total["summaryOptions"]["avg"], true);
}

#[test]
fn test_output_file() {
    let trace = write_temp(TRACE);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("histograms.json");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("runtime-stats");
    cmd.arg("-i")
        .arg(trace.path())
        .arg("--format")
        .arg("json")
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("\"Load_Parse:count\""));
}

#[test]
fn test_config_changes_diagnostic_name() {
    let trace = write_temp(TRACE);
    let config = write_temp("stage_diagnostic_name = \"Stages\"\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("runtime-stats");
    cmd.arg("-i")
        .arg(trace.path())
        .arg("-c")
        .arg(config.path())
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Stages\""))
        .stdout(predicate::str::contains("RAIL stages").not());
}

#[test]
fn test_config_can_drop_internal_url_exclusion() {
    let trace = write_temp(
        r#"{"slices": [{"start": 1, "duration": 2, "category": "GC", "count": 1}],
            "stages": [{"title": "Load", "url": "about:blank", "start": 0, "end": 10}]}"#,
    );
    let config = write_temp("internal_urls = []\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("runtime-stats");
    cmd.arg("-i")
        .arg(trace.path())
        .arg("-c")
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Load_GC:count"));
}

#[test]
fn test_missing_input_file_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("runtime-stats");
    cmd.arg("-i")
        .arg("/nonexistent/trace.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read trace input"));
}

#[test]
fn test_malformed_input_fails() {
    let trace = write_temp("{not json");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("runtime-stats");
    cmd.arg("-i")
        .arg(trace.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse trace input JSON"));
}

#[test]
fn test_invalid_config_fails() {
    let trace = write_temp(TRACE);
    let config = write_temp("[duration_bins]\nlower = 10.0\nupper = 1.0\nbins = 5\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("runtime-stats");
    cmd.arg("-i")
        .arg(trace.path())
        .arg("-c")
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_empty_trace_prints_derived_totals() {
    let trace = write_temp("{}");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("runtime-stats");
    cmd.arg("-i")
        .arg(trace.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("V8-Only:duration"))
        .stdout(predicate::str::contains("Total-Main-Thread:count"));
}
