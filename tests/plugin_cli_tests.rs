//! End-to-end tests for the plugin binary
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests
//!
//! A fake greyfix is written as a shell script into a temp dir and pointed
//! to through the `greyfix` environment variable, the way Munin would.

use assert_cmd::Command;
use chrono::{Duration, Local};
use predicates::prelude::*;
use serial_test::serial;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

const ISO_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn plugin_cmd() -> Command {
    let mut cmd = Command::cargo_bin("greyfix-age").unwrap();
    for var in ["greyfix", "step_size", "num_steps", "greylist_step", "date_format"] {
        cmd.env_remove(var);
    }
    cmd
}

/// Write a fake greyfix that prints `stdout` and exits with `status`
fn fake_greyfix(dir: &TempDir, stdout: &str, status: i32) -> PathBuf {
    let dump_path = dir.path().join("dump.txt");
    fs::write(&dump_path, stdout).unwrap();

    let path = dir.path().join("greyfix");
    let script = format!(
        "#!/bin/sh\n[ \"$1\" = \"--dump-triplets\" ] || exit 64\ncat '{}'\nexit {}\n",
        dump_path.display(),
        status
    );
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Dump line for a triplet first seen `age_days` days (plus an hour) ago
fn dump_line(age_days: i64, pass_count: u64) -> String {
    let first_seen = Local::now().naive_local() - Duration::days(age_days) - Duration::hours(1);
    format!(
        "192.0.2.1\tsender@example.org\trcpt@example.net\t{}\t{}\t2\t{}\n",
        first_seen.format(ISO_FORMAT),
        first_seen.format(ISO_FORMAT),
        pass_count
    )
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_config_two_steps() {
    plugin_cmd()
        .arg("config")
        .env("greyfix", "/nonexistent/greyfix")
        .env("step_size", "7")
        .env("num_steps", "2")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("graph_title "))
        .stdout(predicate::str::contains("graph_category mail\n"))
        .stdout(predicate::str::contains("gl.label Greylisted\n"))
        .stdout(predicate::str::contains("d0_6.label Whitelisted for 0 - 6 days\n"))
        .stdout(predicate::str::contains("d7_.label Whitelisted for 7 - ... days\n"));
}

#[test]
fn test_config_default_has_eleven_buckets() {
    let output = plugin_cmd()
        .arg("config")
        .env("greyfix", "/nonexistent/greyfix")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let labels = stdout
        .lines()
        .filter(|l| l.starts_with('d') && l.contains(".label "))
        .count();
    assert_eq!(labels, 11);
    assert!(stdout.contains("d70_.label"));
}

#[test]
fn test_config_greylist_step_no() {
    plugin_cmd()
        .arg("config")
        .env("greylist_step", "no")
        .assert()
        .success()
        .stdout(predicate::str::contains("gl.").not());
}

// ============================================================================
// fetch
// ============================================================================

#[test]
#[serial]
fn test_fetch_scenario() {
    let dir = TempDir::new().unwrap();
    let dump: String = [(0, 1), (6, 1), (7, 1), (13, 1), (14, 1), (50, 0)]
        .iter()
        .map(|&(age, pass)| dump_line(age, pass))
        .collect();
    let greyfix = fake_greyfix(&dir, &dump, 0);

    plugin_cmd()
        .arg("fetch")
        .env("greyfix", &greyfix)
        .env("step_size", "7")
        .env("num_steps", "3")
        .env("greylist_step", "yes")
        .env("date_format", ISO_FORMAT)
        .assert()
        .success()
        .stdout("gl.value 1\nd0_6.value 2\nd7_13.value 2\nd14_.value 1\n");
}

#[test]
#[serial]
fn test_fetch_is_default_command() {
    let dir = TempDir::new().unwrap();
    let greyfix = fake_greyfix(&dir, &dump_line(1, 1), 0);

    plugin_cmd()
        .env("greyfix", &greyfix)
        .env("num_steps", "2")
        .env("date_format", ISO_FORMAT)
        .assert()
        .success()
        .stdout("gl.value 0\nd0_6.value 1\nd7_.value 0\n");
}

#[test]
#[serial]
fn test_fetch_ignores_malformed_lines() {
    let dir = TempDir::new().unwrap();
    let dump = format!(
        "{}192.0.2.1\tsender@example.org\trcpt@example.net\tx\ty\t1\n",
        dump_line(1, 1)
    );
    let greyfix = fake_greyfix(&dir, &dump, 0);

    plugin_cmd()
        .env("greyfix", &greyfix)
        .env("num_steps", "2")
        .env("greylist_step", "no")
        .env("date_format", ISO_FORMAT)
        .assert()
        .success()
        .stdout("d0_6.value 1\nd7_.value 0\n");
}

#[test]
#[serial]
fn test_fetch_propagates_tool_exit_status() {
    let dir = TempDir::new().unwrap();
    let greyfix = fake_greyfix(&dir, "", 3);

    let output = plugin_cmd().env("greyfix", &greyfix).output().unwrap();

    assert_eq!(output.status.code(), Some(3));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.starts_with("# "));
    assert!(!stdout.contains(".value"));
}

#[test]
#[serial]
fn test_fetch_bad_count_is_fatal() {
    let dir = TempDir::new().unwrap();
    let dump = "192.0.2.1\ta@example.org\tb@example.net\t2026-10-19 08:00:00\t2026-10-19 08:00:00\tmany\t1\n";
    let greyfix = fake_greyfix(&dir, dump, 0);

    plugin_cmd()
        .env("greyfix", &greyfix)
        .env("date_format", ISO_FORMAT)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(".value").not())
        .stderr(predicate::str::contains("block_count"));
}

#[test]
fn test_fetch_missing_binary_fails() {
    plugin_cmd()
        .env("greyfix", "/nonexistent/greyfix")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("/nonexistent/greyfix"));
}

// ============================================================================
// autoconf
// ============================================================================

#[test]
#[serial]
fn test_autoconf_yes() {
    let dir = TempDir::new().unwrap();
    let greyfix = fake_greyfix(&dir, "", 0);

    plugin_cmd()
        .arg("autoconf")
        .env("greyfix", &greyfix)
        .assert()
        .success()
        .stdout("yes\n");
}

#[test]
fn test_autoconf_no() {
    plugin_cmd()
        .arg("autoconf")
        .env("greyfix", "/nonexistent/greyfix")
        .assert()
        .success()
        .stdout("no (/nonexistent/greyfix not found)\n");
}

// ============================================================================
// errors
// ============================================================================

#[test]
fn test_unknown_command() {
    plugin_cmd()
        .arg("suggest")
        .assert()
        .code(1)
        .stdout("# Unknown command 'suggest'. Valid commands: fetch, autoconf, config\n");
}

#[test]
fn test_invalid_step_size_rejected() {
    plugin_cmd()
        .arg("config")
        .env("step_size", "-7")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("step_size"));
}

#[test]
fn test_huge_num_steps_rejected() {
    plugin_cmd()
        .arg("config")
        .env("num_steps", "4000000000")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("num_steps"))
        .stderr(predicate::str::contains("must be between 1 and 1000"));
}

#[test]
fn test_invalid_greylist_step_rejected() {
    plugin_cmd()
        .arg("config")
        .env("greylist_step", "true")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("greylist_step"));
}

#[test]
fn test_help() {
    plugin_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}
