use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("ons").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--dataset"))
        .stdout(predicate::str::contains("--select"));
}

#[test]
fn cli_rejects_malformed_select() {
    let mut cmd = Command::cargo_bin("ons").unwrap();
    cmd.args(["--select", "geography"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("NAME=VALUE"));
}

#[test]
fn cli_exits_non_zero_when_service_unreachable() {
    let mut cmd = Command::cargo_bin("ons").unwrap();
    cmd.args(["--base-url", "http://127.0.0.1:9/v1"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cpih01"));
}

// Live test (opt-in): cargo test --features online
#[cfg(feature = "online")]
#[test]
fn runs_reference_driver_online() {
    let mut cmd = Command::cargo_bin("ons").unwrap();
    cmd.arg("--stats");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("geography"));
}
