//! CLI integration tests for stackcraft.
//!
//! These verify argument parsing and error handling without hitting the
//! network: both commands fail fast on malformed input before ever
//! constructing an HTTP client.

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn stackcraft() -> Command {
    Command::new(cargo_bin!("stackcraft"))
}

#[test]
fn test_help_output() {
    stackcraft()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("pick-snapshot"));
}

#[test]
fn test_no_subcommand_prints_help() {
    stackcraft().assert().failure();
}

#[test]
fn test_resolve_requires_snapshot() {
    stackcraft()
        .args(["resolve", "--target", "aeson"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("snapshot"));
}

#[test]
fn test_resolve_requires_at_least_one_target() {
    stackcraft()
        .args(["resolve", "--snapshot", "lts-20.14"])
        .assert()
        .failure();
}

#[test]
fn test_resolve_rejects_malformed_snapshot_name() {
    stackcraft()
        .args(["resolve", "--snapshot", "not-a-snapshot", "--target", "aeson"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid snapshot name"));
}

#[test]
fn test_resolve_rejects_malformed_target_name() {
    stackcraft()
        .args(["resolve", "--snapshot", "lts-20.14", "--target", "Not_Valid!"])
        .assert()
        .failure();
}

#[test]
fn test_pick_snapshot_requires_locals() {
    stackcraft()
        .args(["pick-snapshot", "--candidate", "lts-20.14"])
        .assert()
        .failure();
}

#[test]
fn test_pick_snapshot_rejects_malformed_local() {
    stackcraft()
        .args(["pick-snapshot", "not-name-version-shaped-!!", "--candidate", "lts-20.14"])
        .assert()
        .failure();
}
