//! CLI argument parsing tests for quill

use assert_cmd::Command;
use predicates::prelude::*;

fn quill() -> Command {
    Command::new(env!("CARGO_BIN_EXE_quill"))
}

#[test]
fn test_help_flag() {
    let mut cmd = quill();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "A sandboxed AI coding agent for your terminal",
        ))
        .stdout(predicate::str::contains("--clear"))
        .stdout(predicate::str::contains("--verbose"))
        .stdout(predicate::str::contains("--silent"));
}

#[test]
fn test_version_flag() {
    let mut cmd = quill();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_no_prompt_is_an_error() {
    let mut cmd = quill();
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("provide a prompt"));
}

#[test]
fn test_whitespace_prompt_is_an_error() {
    let mut cmd = quill();
    cmd.arg("   ");
    cmd.assert().failure().code(1);
}

#[test]
fn test_clear_runs_without_prompt() {
    // --clear takes precedence over the missing-prompt check. Point
    // HOME at a scratch dir so no real history is touched.
    let temp = tempfile::TempDir::new().unwrap();
    let mut cmd = quill();
    cmd.env("HOME", temp.path());
    cmd.arg("--clear");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No conversation history to clear."));
}

#[test]
fn test_clear_removes_existing_history() {
    let temp = tempfile::TempDir::new().unwrap();
    let data_dir = temp.path().join(".quill");
    std::fs::create_dir_all(&data_dir).unwrap();
    let history = data_dir.join("history.json");
    std::fs::write(&history, "[]").unwrap();

    let mut cmd = quill();
    cmd.env("HOME", temp.path());
    cmd.arg("--clear");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Conversation history cleared."));
    assert!(!history.exists());
}
