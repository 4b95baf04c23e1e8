//! Integration tests for the `anycoding` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the get, set and
//! eq subcommands through the actual binary, including stdin/stdout piping,
//! file I/O and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to a fixture file.
fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn anycoding() -> Command {
    Command::cargo_bin("anycoding").unwrap()
}

/// Helper: parse stdout as JSON.
fn stdout_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout must be JSON")
}

// ============================================================================
// get
// ============================================================================

#[test]
fn get_negative_index_from_stdin() {
    anycoding()
        .args(["get", "items.-1"])
        .write_stdin(r#"{"items":[null,1,2]}"#)
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn get_nested_value_from_file() {
    anycoding()
        .args(["get", "owner.tags.0", "-i", fixture("doc.json").as_str()])
        .assert()
        .success()
        .stdout("\"math\"\n");
}

#[test]
fn get_subtree_pretty() {
    anycoding()
        .args(["get", "owner", "--pretty", "-i", fixture("doc.json").as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  \"name\": \"Ada\""));
}

#[test]
fn get_missing_path_fails_with_location() {
    anycoding()
        .args(["get", "owner.age", "-i", fixture("doc.json").as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("owner.age"))
        .stderr(predicate::str::contains("/owner/age"));
}

#[test]
fn get_past_end_reports_bounds() {
    anycoding()
        .args(["get", "items.7"])
        .write_stdin(r#"{"items":[1]}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of bounds"));
}

#[test]
fn invalid_input_is_reported() {
    anycoding()
        .args(["get", "a"])
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse JSON from stdin"));
}

// ============================================================================
// set
// ============================================================================

#[test]
fn set_pads_sequence() {
    let output = anycoding()
        .args(["set", "items.10", "9"])
        .write_stdin(r#"{"items":[null,1,2]}"#)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let doc = stdout_json(&output);
    let items = doc["items"].as_array().unwrap();
    assert_eq!(items.len(), 11);
    assert!(items[3..10].iter().all(serde_json::Value::is_null));
    assert_eq!(items[10], 9);
}

#[test]
fn set_negative_literal_value() {
    anycoding()
        .args(["set", "n", "-5"])
        .write_stdin("{}")
        .assert()
        .success()
        .stdout("{\"n\":-5}\n");
}

#[test]
fn set_replaces_scalar_by_default() {
    anycoding()
        .args(["set", "text.inner", "true"])
        .write_stdin(r#"{"text":"flat"}"#)
        .assert()
        .success()
        .stdout("{\"text\":{\"inner\":true}}\n");
}

#[test]
fn set_strict_refuses_to_replace_scalar() {
    anycoding()
        .args(["set", "text.inner", "true", "--strict"])
        .write_stdin(r#"{"text":"flat"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected a mapping"));
}

#[test]
fn set_rejects_invalid_literal() {
    anycoding()
        .args(["set", "a", "{oops"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON literal"));
}

#[test]
fn set_file_to_file() {
    let output_path = std::env::temp_dir().join("anycoding-cli-set-output.json");
    let _ = std::fs::remove_file(&output_path);

    anycoding()
        .args(["set", "owner.name", "\"Lovelace\"", "-i", fixture("doc.json").as_str(), "-o"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout("");

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(doc["owner"]["name"], "Lovelace");
    assert_eq!(doc["text"], "📀!");

    let _ = std::fs::remove_file(&output_path);
}

// ============================================================================
// eq
// ============================================================================

#[test]
fn eq_ignores_key_order() {
    anycoding()
        .args(["eq", fixture("doc.json").as_str(), fixture("doc_reordered.json").as_str()])
        .assert()
        .success()
        .stdout("equal\n");
}

#[test]
fn eq_respects_sequence_order() {
    anycoding()
        .args(["eq", fixture("doc.json").as_str(), fixture("doc_changed.json").as_str()])
        .assert()
        .code(1)
        .stdout("different\n");
}

#[test]
fn eq_missing_file_fails() {
    anycoding()
        .args(["eq", fixture("doc.json").as_str(), fixture("missing.json").as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ============================================================================
// help
// ============================================================================

#[test]
fn help_lists_subcommands() {
    anycoding()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("eq"));
}
