// ABOUTME: Integration tests for the eosup CLI commands.
// ABOUTME: Validates --help output and argument rejection.

use assert_cmd::Command;
use predicates::prelude::*;

fn eosup_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("eosup"))
}

#[test]
fn help_shows_commands() {
    eosup_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("stop"));
}

#[test]
fn run_help_shows_options() {
    eosup_cmd()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--image"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--volumes"));
}

#[test]
fn missing_subcommand_fails() {
    eosup_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_subcommand_fails() {
    eosup_cmd().arg("restart").assert().failure();
}

#[test]
fn quiet_conflicts_with_json() {
    eosup_cmd()
        .args(["--quiet", "--json", "run"])
        .assert()
        .failure();
}
