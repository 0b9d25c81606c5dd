//! Runs the `benchplot` binary on result directories that end in warnings.
//!
//! Paths that render charts depend on system fonts, so these tests stick to
//! runs that finish before drawing.

use rstest::rstest;
use serde_json::json;

use crate::common::{Results, results, row, stderr};

#[rstest]
fn test_help_lists_reports(results: Results) {
    let output = results.command().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for report in ["ipc", "latency", "multi", "types", "withload", "montage"] {
        assert!(stdout.contains(report), "help should list {report}");
    }
}

#[rstest]
fn test_ipc_without_results_warns_and_succeeds(results: Results) {
    let output = results
        .command()
        .args(["ipc", "--input", "."])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("Missing node_ipc.json"), "{stderr}");
    assert!(stderr.contains("skipping Bun"), "{stderr}");
    assert!(stderr.contains("No IPC results found"), "{stderr}");
    assert!(stderr.contains("Pass the results directory with --input"), "{stderr}");
    assert!(!results.path().join("charts").exists());
}

#[rstest]
fn test_malformed_and_empty_documents_are_skipped(results: Results) {
    results.write("results/node_latency.json", "Starting benchmark...\n");
    results.write_json(
        "results/deno/deno_latency.json",
        &json!({"unrelated": [row("x (1)", 1)]}),
    );

    let output = results.command().arg("latency").output().unwrap();

    assert!(output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("Malformed input"), "{stderr}");
    assert!(stderr.contains("No usable data for deno_latency.json"), "{stderr}");
    assert!(stderr.contains("No latency results to plot"), "{stderr}");
}

#[rstest]
fn test_latency_needs_both_groups(results: Results) {
    results.write_json(
        "results/node_latency.json",
        &json!({"worker": [row("worker -> (1)", 10)]}),
    );

    let output = results.command().arg("latency").output().unwrap();

    assert!(output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("Node.js: needs both worker and knitting"), "{stderr}");
    assert!(!stderr.contains("--input"), "{stderr}");
    assert!(!results.path().join("charts").exists());
}

#[rstest]
fn test_ipc_single_file_without_counts(results: Results) {
    let file = results.write_json(
        "bun_ipc.json",
        &json!({"knitting": [row("knitting", 10)], "worker": [row("worker", "3 ms")]}),
    );

    let output = results
        .command()
        .arg("ipc")
        .arg("-i")
        .arg(&file)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stderr(&output).contains("Bun: no counts found"));
}

#[rstest]
fn test_withload_without_baseline(results: Results) {
    results.write_json(
        "results/ms/node/node_withload.json",
        &json!([{"knitting: primes": [row("main + 1 extra threads", 2e9)]}]),
    );

    let output = results.command().arg("withload").output().unwrap();

    assert!(output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("Node.js: no 'main' baseline found"), "{stderr}");
    assert!(stderr.contains("No speedup data to plot"), "{stderr}");
}

#[rstest]
fn test_types_without_files(results: Results) {
    let output = results.command().args(["types", "-i", "."]).output().unwrap();
    assert!(output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("No *_types.json found"), "{stderr}");
    assert!(stderr.contains("💡 Pass the results directory with --input"), "{stderr}");
}

#[rstest]
fn test_montage_without_inputs(results: Results) {
    let output = results
        .command()
        .args(["montage", "a.png", "b.png", "-o", "out.png"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("Missing montage input a.png"), "{stderr}");
    assert!(stderr.contains("No montage inputs found"), "{stderr}");
    assert!(!results.path().join("out.png").exists());
}

#[rstest]
fn test_explicit_missing_config_fails(results: Results) {
    let output = results
        .command()
        .args(["--config", "missing.toml", "ipc"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Config file not found"));
}

#[rstest]
fn test_invalid_config_fails(results: Results) {
    results.write("bad.toml", "width = \"wide\"\n");
    let output = results
        .command()
        .args(["--config", "bad.toml", "types"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to parse"));
}

#[rstest]
fn test_config_sources_are_used(results: Results) {
    results.write(
        "config.toml",
        "[[sources]]\nname = \"Workerd\"\nslug = \"workerd\"\ndir = \"cf\"\n",
    );
    let output = results
        .command()
        .args(["--config", "config.toml", "multi", "-i", "."])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("Missing workerd_multi.json"), "{stderr}");
    assert!(!stderr.contains("Node.js"), "{stderr}");
}
