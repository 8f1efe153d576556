//! CLI integration tests
//!
//! These tests run the built binary against the fixture schemas.

#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_xsd-grammar"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

// ============================================================================
// Check Command Tests
// ============================================================================

#[test]
fn test_cli_check_valid_schema() {
    let book = fixture("book.xsd");
    let output = run(&["check", book.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "check should succeed");
    assert!(stdout.contains("book.xsd: ok"));
}

#[test]
fn test_cli_check_invalid_schema() {
    let book = fixture("book.xsd");
    let invalid = fixture("invalid.xsd");
    let output = run(&["check", book.to_str().unwrap(), invalid.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "check should fail");
    assert!(stdout.contains("book.xsd: ok"));
    assert!(stdout.contains("unexpected element 'xs:extension' in simpleContent"));
    assert!(stderr.contains("1 of 2 schema(s) failed"));
}

#[test]
fn test_cli_check_missing_file() {
    let output = run(&["check", "does-not-exist.xsd"]);
    assert!(!output.status.success());
}

// ============================================================================
// Inspect Command Tests
// ============================================================================

#[test]
fn test_cli_inspect_summary() {
    let book = fixture("book.xsd");
    let output = run(&["inspect", book.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "inspect should succeed");
    assert!(stdout.contains("xsd-grammar v"), "should show version");
    assert!(stdout.contains("Target Namespace: http://example.com/book"));
    assert!(stdout.contains("Element Form Default: qualified"));
    assert!(stdout.contains("Global Elements: 1"));
    assert!(stdout.contains("Complex Types: 2"));
    assert!(stdout.contains("Simple Types: 2"));
    assert!(stdout.contains("library : anonymous complex type"));
    assert!(stdout.contains("BookType (complex)"));
    assert!(stdout.contains("IsbnList (simple, list)"));
}

#[test]
fn test_cli_inspect_json_output() {
    let book = fixture("book.xsd");
    let output = run(&["inspect", "--json", book.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "inspect --json should succeed");
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["attributes"]["targetNamespace"], "http://example.com/book");
}

#[test]
fn test_cli_inspect_invalid_schema() {
    let invalid = fixture("invalid.xsd");
    let output = run(&["inspect", invalid.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Error:"));
}
