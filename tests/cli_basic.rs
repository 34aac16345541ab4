//! Integration tests for basic CLI behavior.
//!
//! Tests that the binary exists, accepts standard flags, and each subcommand
//! responds to `--help` with appropriate text. No network traffic.

#![allow(deprecated)] // cargo_bin deprecation — replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: get a Command for the `vidra` binary.
fn vidra() -> Command {
    Command::cargo_bin("vidra").expect("binary 'vidra' should be built")
}

// ─── Top-level flags ─────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    vidra()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: vidra"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("providers"));
}

#[test]
fn short_help_flag_shows_usage() {
    vidra()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: vidra"));
}

#[test]
fn version_flag_shows_semver() {
    vidra()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^vidra \d+\.\d+\.\d+\n$").unwrap());
}

#[test]
fn no_args_shows_error_and_usage() {
    vidra()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: vidra"));
}

#[test]
fn invalid_subcommand_fails() {
    vidra()
        .arg("this-is-not-a-real-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ─── Subcommand help ─────────────────────────────────────────────────────────

#[test]
fn serve_help() {
    vidra()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Run the addon HTTP server"))
        .stdout(predicate::str::contains("--port"));
}

#[test]
fn resolve_help() {
    vidra()
        .args(["resolve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolve one id"))
        .stdout(predicate::str::contains("<TYPE>"))
        .stdout(predicate::str::contains("<ID>"))
        .stdout(predicate::str::contains("--season"))
        .stdout(predicate::str::contains("--episode"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn providers_help() {
    vidra()
        .args(["providers", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("provider table"));
}

// ─── Subcommand argument validation ──────────────────────────────────────────

#[test]
fn resolve_missing_args_fails() {
    vidra()
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<TYPE>"));
}

#[test]
fn resolve_unknown_type_fails() {
    vidra()
        .args(["resolve", "channel", "tt0468569"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown content type"));
}

#[test]
fn resolve_series_without_episode_addressing_fails() {
    vidra()
        .args(["resolve", "series", "tt4052886"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--season"));
}

// ─── Offline subcommands ─────────────────────────────────────────────────────

#[test]
fn providers_lists_builtin_table() {
    vidra()
        .arg("providers")
        .assert()
        .success()
        .stdout(predicate::str::contains("vidfast"))
        .stdout(predicate::str::contains("vidsrc"))
        .stdout(predicate::str::contains("embed only"));
}
