//! CLI end-to-end tests.
//!
//! These tests spawn the actual `docsel` binary and validate stdout/exit codes.
//!
//! Exit code expectations:
//! - 0: Success
//! - 1: A run attempted examples and some failed
//! - 2: Invalid arguments (malformed filter expression, unreadable tree)
//! - 3: Discovery error (unknown module, malformed tree)

use std::io::Write;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::NamedTempFile;

const TREE: &str = r#"{
    "modules": {
        "pkg.part_a": [
            { "name": "pkg.part_a.TypeA.method", "examples": [
                { "source": "1" }, { "source": "2" }, { "source": "3" },
                { "source": "4" }, { "source": "5" }
            ] },
            { "name": "pkg.part_a.TypeA.method_plus", "examples": [{ "source": "6" }] },
            { "name": "pkg.part_a.TypeA.function", "examples": [
                { "source": "7" }, { "source": "8" }
            ] }
        ]
    }
}"#;

fn docsel() -> Command {
    let mut cmd = Command::cargo_bin("docsel").unwrap();
    cmd.env_remove("DOCSEL_FILTER")
        .env_remove("DOCSEL_LOG")
        .env_remove("DOCSEL_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

/// Run docsel with given arguments and return (stdout, exit_code).
fn run_docsel(args: &[&str]) -> (String, i32) {
    let output = docsel().args(args).output().expect("failed to execute docsel");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    (stdout, output.status.code().unwrap_or(-1))
}

fn tree_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(TREE.as_bytes()).unwrap();
    file
}

fn path_of(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

// ============================================================================
// parse
// ============================================================================

#[test]
fn parse_prints_filters_as_json() {
    let (stdout, code) = run_docsel(&["parse", "-t", "method:10-20,7", "-t", "function"]);
    assert_eq!(code, 0);

    let json: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["expression"], "method:10-20,7 function");
    assert_eq!(json["select_all"], false);
    assert_eq!(json["filters"][0]["name"], "method");
    assert_eq!(json["filters"][0]["ranges"], "10-20,7");
    assert_eq!(json["filters"][1]["name"], "function");
}

#[test]
fn malformed_filter_exits_2_with_json_error() {
    let (stdout, code) = run_docsel(&["parse", "-t", "method:1-2-3"]);
    assert_eq!(code, 2);

    let json: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["code"], 2);
    assert!(json["error"]["message"].as_str().unwrap().contains("1-2-3"));
}

#[test]
fn expression_can_come_from_environment() {
    let output = docsel()
        .env("DOCSEL_FILTER", "TypeA.method:0")
        .args(["parse"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["expression"], "TypeA.method:0");
}

#[test]
fn invalid_format_in_environment_exits_2() {
    let output = docsel()
        .env("DOCSEL_FORMAT", "yaml")
        .args(["parse"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ============================================================================
// select
// ============================================================================

#[test]
fn select_keeps_requested_examples() {
    let file = tree_file();
    let (stdout, code) = run_docsel(&["select", path_of(&file), "-t", "TypeA.method:1-2,4"]);
    assert_eq!(code, 0);

    let json: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["module"], "pkg.part_a");
    let tests = json["tests"].as_array().unwrap();
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0]["name"], "pkg.part_a.TypeA.method");

    let indices: Vec<u64> = tests[0]["examples"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["index"].as_u64().unwrap())
        .collect();
    assert_eq!(indices, vec![1, 2, 4]);
    assert_eq!(json["summary"]["tests_partial"], 1);
}

#[test]
fn select_without_filters_keeps_everything() {
    let file = tree_file();
    let (stdout, code) = run_docsel(&["select", path_of(&file)]);
    assert_eq!(code, 0);

    let json: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["summary"]["tests_selected"], 3);
    assert_eq!(json["summary"]["examples_selected"], 8);
    assert_eq!(json["summary"]["tests_partial"], 0);
}

#[test]
fn select_text_output() {
    let file = tree_file();
    let output = docsel()
        .args(["--format", "text", "select", path_of(&file), "-t", "*method:3-"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        "pkg.part_a.TypeA.method [3-4]\nselected 1 of 3 tests (1 partial), 2 of 8 examples\n"
    );
}

#[test]
fn select_reads_tree_from_stdin() {
    let output = docsel()
        .args(["select", "-", "-t", "function"])
        .write_stdin(TREE)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["tests"][0]["name"], "pkg.part_a.TypeA.function");
}

#[test]
fn unknown_module_exits_3() {
    let file = tree_file();
    let (stdout, code) = run_docsel(&["select", path_of(&file), "--module", "pkg.nowhere"]);
    assert_eq!(code, 3);

    let json: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["error"]["code"], 3);
}

#[test]
fn missing_tree_exits_2() {
    let (_stdout, code) = run_docsel(&["select", "/nonexistent/docsel/tree.json"]);
    assert_eq!(code, 2);
}

// ============================================================================
// run
// ============================================================================

#[test]
fn run_reports_counts() {
    let file = tree_file();
    let (stdout, code) = run_docsel(&["run", path_of(&file), "-t", "method:0", "-t", "function"]);
    assert_eq!(code, 0);

    let json: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["status"], "ok");
    // `method` matches TypeA.method only, not TypeA.method_plus
    assert_eq!(json["results"]["tests_run"], 2);
    assert_eq!(json["results"]["attempted"], 3);
    assert_eq!(json["results"]["partially_selected"], 1);
    assert_eq!(json["results"]["failed"], 0);
}
