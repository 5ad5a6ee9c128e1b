//! CLI parsing tests for the metaexplorer command
//!
//! Tests that verify CLI argument parsing works correctly.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a Command for the metaexplorer binary
#[allow(deprecated)]
fn explorer() -> Command {
    Command::cargo_bin("metaexplorer").expect("Failed to find metaexplorer binary")
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_shows_all_commands() {
    explorer()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("refresh"))
        .stdout(predicate::str::contains("pages"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("lookup"))
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_flag() {
    explorer()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("metaexplorer"));
}

// ============================================================================
// Global Options Tests
// ============================================================================

#[test]
fn test_global_options_in_help() {
    explorer()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--verbose"))
        .stdout(predicate::str::contains("--quiet"));
}

#[test]
fn test_conflicting_verbose_quiet_not_prevented() {
    explorer()
        .args(["--verbose", "--quiet", "--help"])
        .assert()
        .success();
}

// ============================================================================
// Command Tests
// ============================================================================

#[test]
fn test_refresh_help() {
    explorer()
        .args(["refresh", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--version"))
        .stdout(predicate::str::contains("--watch"))
        .stdout(predicate::str::contains("--interval"))
        .stdout(predicate::str::contains("--timeout"))
        .stdout(predicate::str::contains("--pages"));
}

#[test]
fn test_refresh_rejects_zero_interval() {
    explorer()
        .args(["refresh", "--watch", "--interval", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--interval"));
}

#[test]
fn test_refresh_rejects_zero_timeout() {
    explorer()
        .args(["refresh", "--timeout", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--timeout"));
}

#[test]
fn test_global_log_level_flag() {
    explorer()
        .args(["--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--log-level"));
}

#[test]
fn test_search_help() {
    explorer()
        .args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<QUERY>"))
        .stdout(predicate::str::contains("--artifact"))
        .stdout(predicate::str::contains("--limit"))
        .stdout(predicate::str::contains("--format"));
}

#[test]
fn test_search_requires_query() {
    explorer()
        .arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_search_invalid_format() {
    explorer()
        .args(["search", "user", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_search_version_conflicts_with_artifact() {
    explorer()
        .args(["search", "user", "--version", "v1", "--artifact", "v1.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_lookup_requires_name() {
    explorer().arg("lookup").assert().failure();
}

#[test]
fn test_browse_help() {
    explorer()
        .args(["browse", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[FRAGMENT]"))
        .stdout(predicate::str::contains("--input"))
        .stdout(predicate::str::contains("--results-only"));
}

#[test]
fn test_config_subcommands() {
    explorer()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("path"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_unknown_command() {
    explorer()
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
