use std::fs;
use std::process::{Command, Stdio};

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_iam-role-cloner"));
    for var in [
        "AWS_PROFILE",
        "IAM_ROLE_CLONER_SOURCE_PROFILE",
        "IAM_ROLE_CLONER_DEST_PROFILE",
        "IAM_ROLE_CLONER_SOURCE_PATTERN",
        "IAM_ROLE_CLONER_DEST_PATTERN",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_lists_subcommands() {
    let out = cli().arg("--help").output().expect("failed to run --help");
    let s = String::from_utf8_lossy(&out.stdout);
    assert_eq!(out.status.code(), Some(0));
    for subcommand in ["clone", "list", "version"] {
        assert!(s.contains(subcommand), "help should list {subcommand}: {s}");
    }
}

#[test]
fn no_subcommand_prints_welcome() {
    cli().assert().success().stdout(
        predicate::str::contains("Welcome to IAM Role Cloner!")
            .and(predicate::str::contains("Available commands:")),
    );
}

#[test]
fn version_prints_summary() {
    cli()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "IAM Role Cloner v{}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn version_detailed_prints_build_metadata() {
    for flag in ["--detailed", "-e"] {
        cli()
            .args(["version", flag])
            .assert()
            .success()
            .stdout(
                predicate::str::contains("Git Commit:")
                    .and(predicate::str::contains("Build Date:"))
                    .and(predicate::str::contains("Platform:")),
            );
    }
}

#[test]
fn version_detailed_reports_current_commit() {
    let expected = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|commit| !commit.is_empty())
        .unwrap_or_else(|| "dev".to_string());

    cli()
        .args(["version", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Git Commit:   {expected}")));
}

#[test]
fn list_requires_profile() {
    let output = cli().arg("list").output().expect("failed to run list");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--profile"), "stderr was: {}", stderr);
}

#[test]
fn list_rejects_empty_profile() {
    let output = cli()
        .args(["list", "--profile", ""])
        .output()
        .expect("failed to run list");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--profile"), "stderr was: {}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn clone_help_documents_flags() {
    cli().args(["clone", "--help"]).assert().success().stdout(
        predicate::str::contains("--source-profile")
            .and(predicate::str::contains("--dest-profile"))
            .and(predicate::str::contains("--source-pattern"))
            .and(predicate::str::contains("--dest-pattern"))
            .and(predicate::str::contains("--dry-run"))
            .and(predicate::str::contains("--log-file")),
    );
}

#[test]
fn clone_fails_when_stdin_is_closed() {
    let dir = tempdir().expect("tempdir");
    let log_path = dir.path().join("clone.log");

    let output = cli()
        .args(["clone", "--dry-run", "--log-file"])
        .arg(&log_path)
        .stdin(Stdio::null())
        .output()
        .expect("failed to run clone");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Enter source AWS profile"),
        "stdout was: {}",
        stdout
    );

    let log = fs::read_to_string(&log_path).expect("log file should exist");
    assert!(log.contains("[HEADER] IAM Role Cloning Wizard"), "log was: {log}");
    assert!(log.contains("[WARNING] Running in DRY-RUN mode"), "log was: {log}");
    assert!(log.contains("[ERROR] Profile validation failed"), "log was: {log}");
}

#[test]
fn clone_fails_when_log_file_cannot_be_opened() {
    let dir = tempdir().expect("tempdir");
    let log_path = dir.path().join("missing").join("clone.log");

    let output = cli()
        .args(["clone", "--log-file"])
        .arg(&log_path)
        .stdin(Stdio::null())
        .output()
        .expect("failed to run clone");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to open log file"), "stderr was: {}", stderr);
}
