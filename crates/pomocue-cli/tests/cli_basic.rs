//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Every test
//! points `POMOCUE_HOME` at its own temp dir.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

fn cli(home: &Path) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "-q", "-p", "pomocue-cli", "--"])
        .env("POMOCUE_HOME", home)
        .env_remove("RUST_LOG");
    cmd
}

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = cli(home)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_config_get_default() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "session.focus_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");
    assert!(home.path().join("config.toml").exists());
}

#[test]
fn test_config_set_persists() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["config", "set", "session.break_minutes", "15"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "session.break_minutes"]);
    assert_eq!(stdout.trim(), "15");
}

#[test]
fn test_config_get_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "get", "session.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_list_json() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["session"]["total_focus_periods"], 4);
    assert_eq!(parsed["audio"]["enabled"], true);
}

#[test]
fn test_run_rejects_short_focus() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["run", "--focus", "5", "--no-audio"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_run_warns_on_malformed_config() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("config.toml"), "session = [not toml").unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["run", "--focus", "5", "--no-audio"]);
    assert!(stderr.contains("warning:"));
    assert!(stderr.contains("using default settings"));
    assert_eq!(code, 1);
}

#[test]
fn test_run_rejects_zero_interval() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["run", "--interval", "0", "--no-audio"]);
    assert_eq!(code, 1);
}

#[test]
fn test_run_stops_on_command() {
    let home = tempfile::tempdir().unwrap();
    let mut child = cli(home.path())
        .args(["run", "--focus", "0", "--json", "--no-audio"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");
    child.stdin.take().unwrap().write_all(b"s\n").unwrap();
    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();
    assert_eq!(events[0]["type"], "display_updated");
    assert_eq!(events[0]["remaining_period"], "indefinite");
    let last = events.last().unwrap();
    assert_eq!(last["type"], "run_completed");
    assert_eq!(last["reason"], "manually_stopped");
}

#[test]
fn test_cues_default() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["cues", "default"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.lines().count(), 9);
    assert!(stdout.contains("default/download.wav"));
}

#[test]
fn test_cues_check_caps_upload() {
    let home = tempfile::tempdir().unwrap();
    let files: Vec<String> = (0..11).map(|i| format!("cue{i}.wav")).collect();
    let mut args = vec!["cues", "check"];
    args.extend(files.iter().map(String::as_str));

    let (stdout, stderr, code) = run_cli(home.path(), &args);
    assert_eq!(code, 0);
    assert!(stderr.contains("Maximum upload limit is 10 files"));
    assert!(stdout.contains("\"cue10.wav\""));
    assert!(stdout.contains("10 / 10 files selected"));
}
