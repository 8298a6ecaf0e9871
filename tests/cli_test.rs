use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

/// Nothing listens on the discard port, so requests fail fast.
const UNREACHABLE: &str = "http://127.0.0.1:9/simulate";

fn cmd() -> Command {
    Command::cargo_bin("adoption-sim").unwrap()
}

#[test]
fn test_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_run_help_lists_parameters() {
    cmd()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--saturation"))
        .stdout(predicate::str::contains("--growth-rate"))
        .stdout(predicate::str::contains("--initial-users"))
        .stdout(predicate::str::contains("--years"));
}

#[test]
fn test_config_prints_defaults() {
    cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"))
        .stdout(predicate::str::contains("M = 1000.0"))
        .stdout(predicate::str::contains(
            "https://logistic-model-backend.onrender.com/simulate",
        ));
}

#[test]
fn test_config_file_and_overrides() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[server]\nport = 9100\n\n[defaults]\nB = 42.0").unwrap();

    cmd()
        .args(["config", "--config"])
        .arg(file.path())
        .args(["--endpoint", "http://localhost:5000/simulate", "--timeout", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("port = 9100"))
        .stdout(predicate::str::contains("B = 42.0"))
        .stdout(predicate::str::contains("http://localhost:5000/simulate"))
        .stdout(predicate::str::contains("timeout_secs = 7"));
}

#[test]
fn test_invalid_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[defaults]\nstep = -1.0").unwrap();

    cmd()
        .args(["config", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_missing_config_file() {
    cmd()
        .args(["config", "--config", "/nonexistent/adoption.toml"])
        .assert()
        .failure();
}

#[test]
fn test_run_unreachable_endpoint_fails() {
    cmd()
        .args(["run", "--endpoint", UNREACHABLE, "--timeout", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Simulation request for year 1 failed"));
}

#[test]
fn test_run_rejects_unknown_format() {
    cmd()
        .args(["run", "--format", "xml"])
        .assert()
        .failure();
}
