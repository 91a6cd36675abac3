use std::fs;
use std::process::Command;

fn binary_output(args: &[&str]) -> std::process::Output {
    let path = env!("CARGO_BIN_EXE_census");
    Command::new(path)
        .args(args)
        .output()
        .unwrap_or_else(|error| panic!("failed to run {}: {}", path, error))
}

#[test]
fn census_help_lists_usage() {
    let output = binary_output(&["--help"]);
    assert!(output.status.success(), "--help should succeed");
    assert!(
        output.stderr.is_empty(),
        "help output should not write to stderr"
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
    assert!(stdout.contains("Usage: census"));
    assert!(stdout.contains("--plan NAME"));
}

#[test]
fn census_without_roots_exits_with_usage_error() {
    let output = binary_output(&[]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no roots to scan"));
}

#[test]
fn census_reports_records_as_json_document() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("a.txt"), b"hello").expect("write");
    let root = temp.path().to_str().expect("utf-8 temp path");

    let output = binary_output(&["--format", "json", "--no-labels", root]);
    assert!(output.status.success());
    let document: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is a JSON document");
    let records = document["file_permissions"]
        .as_array()
        .expect("file_permissions array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["size"], 5);
    assert!(records[0]["linkPath"].is_null());
}

#[test]
fn census_missing_root_exits_with_partial_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("absent");
    let missing = missing.to_str().expect("utf-8 temp path");
    let present = temp.path().to_str().expect("utf-8 temp path");

    let output = binary_output(&["--no-labels", missing, present]);
    assert_eq!(output.status.code(), Some(23));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("absent"));
}

#[test]
fn census_environment_section_reports_child_environment() {
    let output = Command::new(env!("CARGO_BIN_EXE_census"))
        .args(["--format", "json", "--section", "environment_variables"])
        .env("CENSUS_SECTION_MARKER", "present")
        .output()
        .expect("run census");

    assert!(output.status.success());
    let document: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is a JSON document");
    assert_eq!(
        document["environment_variables"]["CENSUS_SECTION_MARKER"],
        "present"
    );
    assert!(document["file_permissions"].as_array().expect("array").is_empty());
}
