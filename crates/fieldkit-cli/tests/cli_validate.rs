#![forbid(unsafe_code)]

//! End-to-end tests for `fieldkit validate`.
//!
//! Validates that:
//! 1. Accepted inputs land in the submitted snapshot in definition order.
//! 2. Rejected inputs leave `null` and surface their messages per field.
//! 3. Usage errors (unknown field, bad definition) are errors, not reports.
//! 4. `run_validate` writes the report file and maps rejection to exit 3.

use std::path::Path;

use clap::Parser;
use fieldkit_cli::validate::{ValidateArgs, execute, parse_instant, run_validate};
use fieldkit_cli::{Cli, CliError, Commands};
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

const FORM: &str = r#"{
    "name": "signup",
    "fields": [
        {"name": "phone", "kind": "phone", "label": "Mobile"},
        {"name": "born", "kind": "date", "past": true},
        {"name": "nick", "steps": ["required", "max-length:8"]},
        {"name": "agree", "kind": "check"}
    ]
}"#;

fn write_form(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("form.json");
    std::fs::write(&path, content).expect("write form");
    path
}

fn args(form: &Path, set: &[(&str, &str)]) -> ValidateArgs {
    ValidateArgs {
        form: form.to_path_buf(),
        set: set
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect(),
        now: parse_instant("2025-03-19 10:15").ok(),
        output_json: None,
        allow_rejected: false,
    }
}

// ============================================================================
// 1–2. Reports
// ============================================================================

#[test]
fn accepted_inputs_reach_the_snapshot() {
    let dir = TempDir::new().expect("tempdir");
    let form = write_form(&dir, FORM);
    let report = execute(&args(
        &form,
        &[
            ("phone", "0499123456"),
            ("born", "29/02/2024"),
            ("nick", "ace"),
            ("agree", "yes"),
        ],
    ))
    .expect("valid run");

    assert!(report.valid);
    assert_eq!(report.form.as_deref(), Some("signup"));
    assert_eq!(
        serde_json::to_string(&report.snapshot).expect("serializable"),
        r#"{"phone":"0499123456","born":[2024,1,29],"nick":"ace","agree":true}"#
    );
}

#[test]
fn rejected_inputs_report_messages_and_null() {
    let dir = TempDir::new().expect("tempdir");
    let form = write_form(&dir, FORM);
    let report = execute(&args(
        &form,
        &[("phone", "abc"), ("born", "01/01/2099"), ("nick", "")],
    ))
    .expect("valid run");

    assert!(!report.valid);
    assert_eq!(report.rejected(), 3);
    let names: Vec<&str> = report.fields.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(names, ["phone", "born", "nick", "agree"]);
    assert!(report.fields[3].diagnostics.is_empty());

    let json = serde_json::to_value(&report.snapshot).expect("serializable");
    assert_eq!(
        json,
        serde_json::json!({"phone": null, "born": null, "nick": null, "agree": null})
    );
}

#[test]
fn later_assignment_replaces_diagnostics() {
    let dir = TempDir::new().expect("tempdir");
    let form = write_form(&dir, FORM);
    let report = execute(&args(&form, &[("phone", "abc"), ("phone", "0499123456")]))
        .expect("valid run");
    assert!(report.fields[0].diagnostics.is_empty());
    assert_eq!(
        report.snapshot.value("phone").and_then(|v| v.as_text()),
        Some("0499123456")
    );
}

// ============================================================================
// 3. Usage errors
// ============================================================================

#[test]
fn unknown_field_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let form = write_form(&dir, FORM);
    let err = execute(&args(&form, &[("email", "x")])).expect_err("unknown field");
    assert_eq!(err.exit_code(), 1);
    assert_eq!(err.to_string(), "unknown field: email");
}

#[test]
fn malformed_definition_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let form = write_form(&dir, r#"{"fields": [{"name": "d", "kind": "check", "steps": ["required"]}]}"#);
    let err = execute(&args(&form, &[])).expect_err("steps on a check field");
    assert!(matches!(err, CliError::Form(_)));
}

#[test]
fn missing_definition_is_an_io_error() {
    let dir = TempDir::new().expect("tempdir");
    let err = execute(&args(&dir.path().join("absent.json"), &[])).expect_err("no file");
    assert!(err.to_string().contains("I/O error"));
}

// ============================================================================
// 4. Command entry point
// ============================================================================

#[test]
fn run_writes_report_and_signals_rejection() {
    let dir = TempDir::new().expect("tempdir");
    let form = write_form(&dir, FORM);
    let output = dir.path().join("report.json");
    let mut run_args = args(&form, &[("phone", "abc")]);
    run_args.output_json = Some(output.clone());

    let err = run_validate(run_args.clone()).expect_err("rejected input");
    assert_eq!(err.exit_code(), 3);
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).expect("report written"))
            .expect("report is JSON");
    assert_eq!(written["valid"], serde_json::json!(false));
    assert_eq!(written["fields"][0]["field"], serde_json::json!("phone"));

    run_args.allow_rejected = true;
    assert!(run_validate(run_args).is_ok());
}

#[test]
fn parsed_command_line_runs() {
    let dir = TempDir::new().expect("tempdir");
    let form = write_form(&dir, FORM);
    let form_arg = form.to_string_lossy().into_owned();
    let cli = Cli::try_parse_from([
        "fieldkit",
        "validate",
        "--form",
        form_arg.as_str(),
        "--set",
        "agree=on",
        "--now",
        "2025-03-19 10:15",
    ])
    .expect("valid arguments");
    assert!(matches!(cli.command, Commands::Validate(_)));
    assert!(fieldkit_cli::run(cli).is_ok());
}
