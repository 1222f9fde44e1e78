//! Integration tests for the Streamdash CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Nothing listens on port 9 in test environments.
const UNREACHABLE_BACKEND: &str = "http://127.0.0.1:9/api";

fn streamdash_bin() -> Command {
    let mut cmd = Command::cargo_bin("streamdash").expect("binary is built");
    cmd.env_remove("STREAMDASH_API_TOKEN")
        .env("STREAMDASH_API_URL", UNREACHABLE_BACKEND);
    cmd
}

#[test]
fn test_version_command() {
    streamdash_bin()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("streamdash"));
}

#[test]
fn test_help_lists_commands() {
    let assert = streamdash_bin().arg("--help").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();

    for command in [
        "init",
        "doctor",
        "status",
        "games",
        "streamer",
        "big-wins",
        "rtp",
        "leaderboard",
        "bonus-hunts",
        "watch",
    ] {
        assert!(stdout.contains(command), "help is missing '{}'", command);
    }
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("streamdash.toml");

    streamdash_bin()
        .arg("init")
        .arg("--path")
        .arg(temp_dir.path())
        .assert()
        .success();

    assert!(config_path.exists(), "Config file was not created");

    let content = std::fs::read_to_string(&config_path).expect("Failed to read config");
    assert!(content.contains("[general]"));
    assert!(content.contains("[api]"));
    assert!(content.contains("[cache]"));
}

#[test]
fn test_init_twice_keeps_existing_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("streamdash.toml");
    std::fs::write(&config_path, "[cache]\nttl_secs = 7\n").unwrap();

    streamdash_bin()
        .arg("init")
        .arg("--path")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("ttl_secs = 7"));
}

#[test]
fn test_invalid_command() {
    streamdash_bin()
        .arg("invalid-command-that-does-not-exist")
        .assert()
        .failure();
}

#[test]
fn test_invalid_period_is_rejected() {
    streamdash_bin()
        .args(["leaderboard", "--period", "yearly"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown period"));
}

#[test]
fn test_verbose_and_quiet_flags() {
    streamdash_bin().args(["-v", "version"]).assert().success();
    streamdash_bin().args(["-q", "version"]).assert().success();
}

#[test]
fn test_status_reports_unreachable_backend() {
    streamdash_bin()
        .args(["-q", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unreachable"));
}

#[test]
fn test_data_command_fails_when_backend_unreachable() {
    streamdash_bin()
        .args(["-q", "games", "--limit", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Backend unreachable"));
}

#[test]
fn test_json_output_on_failure() {
    let assert = streamdash_bin()
        .args(["-q", "--json", "streamer", "nonexistent"])
        .assert()
        .failure();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    assert_eq!(value["status"], 0);
    assert!(value.get("error").is_some());
    assert!(value.get("data").is_none());
}

#[test]
fn test_custom_config_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("custom.toml");
    std::fs::write(&config_path, "[general]\nlog_level = \"error\"\n").unwrap();

    streamdash_bin()
        .arg("--config")
        .arg(&config_path)
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file"));
}
