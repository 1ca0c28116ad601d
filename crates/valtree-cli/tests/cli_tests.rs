//! Integration tests for the `valtree` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the format,
//! validate and get subcommands through the actual binary, including
//! stdin/stdout piping, file I/O, schema options and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Helper: write `content` to a uniquely named file under the temp dir.
fn temp_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("valtree-test-{}-{}", std::process::id(), name));
    std::fs::write(&path, content).expect("temp file must be writable");
    path
}

fn valtree() -> Command {
    let mut cmd = Command::cargo_bin("valtree").unwrap();
    cmd.env_remove("VALTREE_LOG");
    cmd
}

const SAMPLE_COMPACT: &str = r#"{"name":"Alice","id":42,"user":{"email":"alice@example.com","address":{"city":"Lisbon","zip":"1100-148"}},"scores":[95,87,92],"ratio":0.75,"active":true}"#;

// ─────────────────────────────────────────────────────────────────────────────
// Format subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn format_stdin_preserves_field_order() {
    valtree()
        .arg("format")
        .write_stdin("{ \"b\": 1,\n  \"a\": [true, null] }")
        .assert()
        .success()
        .stdout("{\"b\":1,\"a\":[true,null]}\n");
}

#[test]
fn format_file_to_stdout() {
    valtree()
        .args(["format", "-i", &fixture("sample.json")])
        .assert()
        .success()
        .stdout(format!("{SAMPLE_COMPACT}\n"));
}

#[test]
fn format_file_to_file() {
    let output_path = std::env::temp_dir().join(format!(
        "valtree-test-{}-format-out.json",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&output_path);

    valtree()
        .args(["format", "-i", &fixture("sample.json"), "-o"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout("");

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    assert_eq!(content, SAMPLE_COMPACT);

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn format_with_schema_accepts_matching_document() {
    valtree()
        .args([
            "format",
            "-i",
            &fixture("sample.json"),
            "--schema",
            &fixture("schema.json"),
        ])
        .assert()
        .success()
        .stdout(format!("{SAMPLE_COMPACT}\n"));
}

#[test]
fn format_with_schema_widens_integers() {
    let schema = temp_file("widen-schema.json", r#"{"ratio": 0.0, "count": 0}"#);
    valtree()
        .arg("format")
        .arg("--schema")
        .arg(&schema)
        .write_stdin(r#"{"count":2,"ratio":1}"#)
        .assert()
        .success()
        .stdout("{\"count\":2,\"ratio\":1.0}\n");
    let _ = std::fs::remove_file(schema);
}

#[test]
fn format_with_schema_reports_violation() {
    valtree()
        .args([
            "format",
            "-i",
            &fixture("invalid.json"),
            "--schema",
            &fixture("schema.json"),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to deserialize document"))
        .stderr(predicate::str::contains(
            r#"Field "user" is inappropriate - Dictionary doesn't have field - "address""#,
        ));
}

#[test]
fn format_optional_flag_relaxes_schema() {
    let schema = temp_file("optional-schema.json", r#"{"a": "", "b": {"c": 0}}"#);

    valtree()
        .arg("format")
        .arg("--schema")
        .arg(&schema)
        .write_stdin(r#"{"a":"x"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#"Dictionary doesn't have field - "b""#));

    valtree()
        .arg("format")
        .arg("--schema")
        .arg(&schema)
        .args(["--optional", "b"])
        .write_stdin(r#"{"a":"x"}"#)
        .assert()
        .success()
        .stdout("{\"a\":\"x\"}\n");

    let _ = std::fs::remove_file(schema);
}

#[test]
fn format_optional_unknown_path_fails() {
    valtree()
        .args([
            "format",
            "--schema",
            &fixture("schema.json"),
            "--optional",
            "user.phone",
        ])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown schema path for --optional"));
}

#[test]
fn format_optional_requires_schema() {
    valtree()
        .args(["format", "--optional", "a"])
        .write_stdin("{}")
        .assert()
        .failure();
}

#[test]
fn format_invalid_json_fails() {
    valtree()
        .arg("format")
        .write_stdin("this is not valid json {{{")
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse failure"));
}

#[test]
fn format_top_level_null_fails() {
    valtree()
        .arg("format")
        .write_stdin("null")
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse failure"));
}

#[test]
fn format_with_ascii_charset_rejects_non_ascii() {
    valtree()
        .args(["format", "--charset", "ascii"])
        .write_stdin(r#"{"name":"café"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unencodable"))
        .stderr(predicate::str::contains(r#"Field "name" is inappropriate"#));
}

#[test]
fn format_with_latin1_charset_accepts_latin1() {
    valtree()
        .args(["format", "--charset", "latin-1"])
        .write_stdin(r#"{"name":"café"}"#)
        .assert()
        .success()
        .stdout("{\"name\":\"café\"}\n");
}

#[test]
fn format_unknown_charset_fails() {
    valtree()
        .args(["format", "--charset", "ebcdic"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown charset"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Validate subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn validate_matching_document() {
    valtree()
        .args([
            "validate",
            "-i",
            &fixture("sample.json"),
            "--schema",
            &fixture("schema.json"),
        ])
        .assert()
        .success()
        .stdout("valid\n");
}

#[test]
fn validate_reports_first_violation() {
    valtree()
        .args([
            "validate",
            "-i",
            &fixture("invalid.json"),
            "--schema",
            &fixture("schema.json"),
        ])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("Document does not match the schema"))
        .stderr(predicate::str::contains("invalid object"));
}

#[test]
fn validate_with_optional_reaches_list_error() {
    valtree()
        .args([
            "validate",
            "-i",
            &fixture("invalid.json"),
            "--schema",
            &fixture("schema.json"),
            "--optional",
            "user.address",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            r#"Field "scores" is inappropriate - Item[2] is inappropriate - Value must be INTEGER but it's STRING"#,
        ));
}

#[test]
fn validate_requires_schema() {
    valtree()
        .args(["validate", "-i", &fixture("sample.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--schema"));
}

#[test]
fn validate_missing_schema_file_fails() {
    valtree()
        .args(["validate", "--schema", "/nonexistent/valtree-schema.json"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read schema file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Get subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn get_nested_scalar() {
    valtree()
        .args(["get", "--path", "user.address.city", "-i", &fixture("sample.json")])
        .assert()
        .success()
        .stdout("\"Lisbon\"\n");
}

#[test]
fn get_container_keeps_order() {
    valtree()
        .args(["get", "--path", "user"])
        .write_stdin(r#"{"user":{"z":1,"a":{"y":true,"b":false}}}"#)
        .assert()
        .success()
        .stdout("{\"z\":1,\"a\":{\"y\":true,\"b\":false}}\n");
}

#[test]
fn get_empty_path_prints_root() {
    valtree()
        .args(["get", "--path", ""])
        .write_stdin("[3, 2, 1]")
        .assert()
        .success()
        .stdout("[3,2,1]\n");
}

#[test]
fn get_missing_path_fails() {
    valtree()
        .args(["get", "--path", "user.phone", "-i", &fixture("sample.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No value at path: 'user.phone'"));
}

#[test]
fn get_does_not_descend_into_lists() {
    valtree()
        .args(["get", "--path", "scores.0", "-i", &fixture("sample.json")])
        .assert()
        .failure();
}

#[test]
fn get_output_is_valid_json() {
    let output = valtree()
        .args(["get", "--path", "user", "-i", &fixture("sample.json")])
        .output()
        .expect("get should run");
    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("output must be JSON");
    assert_eq!(parsed["address"]["zip"], "1100-148");
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging and usage
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn verbose_flag_logs_failures_to_stderr() {
    valtree()
        .args(["-v", "format"])
        .write_stdin("[1,")
        .assert()
        .failure()
        .stderr(predicate::str::contains("deserialization failed"));
}

#[test]
fn valtree_log_env_enables_debug() {
    valtree()
        .env("VALTREE_LOG", "debug")
        .arg("format")
        .write_stdin("[1,")
        .assert()
        .failure()
        .stderr(predicate::str::contains("deserialization failed"));
}

#[test]
fn default_log_level_is_quiet() {
    valtree()
        .arg("format")
        .write_stdin("[1,")
        .assert()
        .failure()
        .stderr(predicate::str::contains("deserialization failed").not());
}

#[test]
fn help_flag_shows_usage() {
    valtree()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("format"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("get"));
}

#[test]
fn unknown_subcommand_fails() {
    valtree()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("unrecognized")));
}
