//! Integration tests for requirecat
//!
//! These tests drive the compiled binary against throwaway directory trees.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const NL: &str = if cfg!(windows) { "\r\n" } else { "\n" };

fn repo(structure: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (path, content) in structure {
        let full_path = temp_dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }
    temp_dir
}

fn requirecat(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_requirecat"))
        .args(args)
        .output()
        .expect("Failed to execute requirecat")
}

fn run_on(root: &Path, extra: &[&str]) -> Output {
    let root = root.to_str().unwrap();
    let mut args = vec![root];
    args.extend_from_slice(extra);
    requirecat(&args)
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_help() {
    let output = requirecat(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("require"));
    assert!(stdout.contains("--quiet"));
}

#[test]
fn test_dependency_comes_first() {
    let temp_dir = repo(&[
        ("a.txt", "require ‘b.txt’\nalpha\n"),
        ("b.txt", "beta\n"),
    ]);

    let output = run_on(temp_dir.path(), &[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("Output of 2 files saved to"));

    let written = fs::read_to_string(temp_dir.path().join("out.txt")).unwrap();
    assert_eq!(written, format!("beta{NL}require ‘b.txt’{NL}alpha{NL}"));
}

#[test]
fn test_cycle_is_fatal() {
    let temp_dir = repo(&[
        ("a.txt", "require ‘b.txt’\n"),
        ("b.txt", "require ‘a.txt’\n"),
    ]);

    let output = run_on(temp_dir.path(), &[]);
    assert!(!output.status.success());

    let log = stderr(&output);
    assert!(log.contains("circular dependency"));
    assert!(log.contains("<- a.txt") || log.contains("<- b.txt"));
    assert!(!log.contains("saved to"));
    assert!(!temp_dir.path().join("out.txt").exists());
}

#[test]
fn test_missing_dependency_is_fatal() {
    let temp_dir = repo(&[("a.txt", "intro\nrequire ‘missing.txt’\n")]);

    let output = run_on(temp_dir.path(), &[]);
    assert!(!output.status.success());

    let log = stderr(&output);
    assert!(log.contains("a.txt:2"), "stderr: {log}");
    assert!(log.contains("points to an invalid file 'missing.txt'"));
}

#[test]
fn test_second_run_ignores_previous_output() {
    let temp_dir = repo(&[
        ("a.txt", "require ‘b.txt’\nalpha\n"),
        ("b.txt", "beta\n"),
    ]);

    assert!(run_on(temp_dir.path(), &[]).status.success());
    let first = fs::read_to_string(temp_dir.path().join("out.txt")).unwrap();

    let output = run_on(temp_dir.path(), &[]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("already exists, overwriting it"));
    assert!(stderr(&output).contains("Output of 2 files"));

    let second = fs::read_to_string(temp_dir.path().join("out.txt")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_custom_output_path() {
    let temp_dir = repo(&[("a.txt", "alpha\n")]);

    let output = run_on(temp_dir.path(), &["-o=build/all.txt"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(temp_dir.path().join("build/all.txt").is_file());
    assert!(!temp_dir.path().join("out.txt").exists());
}

#[test]
fn test_empty_output_path_is_rejected() {
    let temp_dir = repo(&[("a.txt", "alpha\n")]);

    let output = run_on(temp_dir.path(), &["-o="]);
    assert!(!output.status.success());
    assert!(!temp_dir.path().join("out.txt").exists());
}

#[test]
fn test_climbing_output_path_is_rejected() {
    let temp_dir = repo(&[("a.txt", "alpha\n"), ("out.txt", "stale\n")]);

    let output = run_on(temp_dir.path(), &["-o=gen/../out.txt"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("is not a valid path"));
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("out.txt")).unwrap(),
        "stale\n"
    );
}

#[test]
fn test_quiet_mode_keeps_warnings() {
    let temp_dir = repo(&[("a.txt", "require b.txt\nalpha\n")]);

    let output = run_on(temp_dir.path(), &["-q"]);
    assert!(output.status.success());

    let log = stderr(&output);
    assert!(log.contains("Could not parse 'require' statement"));
    assert!(!log.contains("Starting for root folder"));
}

#[test]
fn test_invalid_root_is_rejected() {
    let temp_dir = repo(&[("a.txt", "alpha\n")]);
    let not_a_dir = temp_dir.path().join("a.txt");

    let output = run_on(&not_a_dir, &[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("is not a valid directory"));
}

#[test]
fn test_unknown_argument_is_rejected() {
    let temp_dir = repo(&[("a.txt", "alpha\n")]);

    let output = run_on(temp_dir.path(), &["--bogus"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Usage"));
}

#[test]
fn test_missing_root_is_rejected() {
    let output = requirecat(&[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Usage"));
}

#[test]
fn test_json_summary() {
    let temp_dir = repo(&[("a.txt", "one\ntwo\n"), ("b.txt", "three\n")]);

    let output = run_on(temp_dir.path(), &["--json", "-q"]);
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["files"], 2);
    assert_eq!(summary["lines"], 3);
}
