//! `review` against a stand-in agent CLI placed on PATH

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::helpers::{python_source, write_file};

/// Response in the shape `claude --output-format json` prints.
const CLAUDE_REPLY: &str =
    r#"{"type":"result","result":"- Extract the handler table\n- Add a docstring","is_error":false}"#;

fn which_available() -> bool {
    std::process::Command::new("which")
        .arg("sh")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Directory holding an executable `claude` script that drains stdin and
/// prints `reply`, or exits 1 for prompts containing FAIL_HERE.
fn fake_claude(temp: &TempDir, reply: &str) -> PathBuf {
    let bin = temp.path().join("bin");
    let script = format!(
        "#!/bin/sh\nprompt=$(cat)\ncase \"$prompt\" in\n  *FAIL_HERE*) echo 'boom' >&2; exit 1 ;;\nesac\nprintf '%s\\n' '{}'\n",
        reply
    );
    let path = write_file(&bin, "claude", &script);
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    bin
}

fn path_with(dir: &Path) -> String {
    let current = std::env::var("PATH").unwrap_or_default();
    format!("{}:{}", dir.display(), current)
}

fn review(temp: &TempDir, bin: &Path) -> Command {
    let mut cmd = Command::cargo_bin("reviewpack").unwrap();
    cmd.arg("--config")
        .arg(temp.path().join("config.toml"))
        .env("PATH", path_with(bin))
        .arg("review");
    cmd
}

#[test]
fn review_reports_suggestions_per_file() {
    if !which_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let bin = fake_claude(&temp, CLAUDE_REPLY);
    let big = write_file(temp.path(), "big.py", &python_source(30_000));
    let small = write_file(temp.path(), "small.py", "x = 1\n");

    let output = review(&temp, &bin).arg(&big).arg(&small).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let files = json.as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["large"], true);
    assert_eq!(files[0]["score"], 1);
    assert_eq!(files[0]["suggestions"][0], "Extract the handler table");
    assert_eq!(files[1]["large"], false);
    assert_eq!(files[1]["quality"], 8);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[1/2]"));
    assert!(stderr.contains("[2/2]"));
}

#[test]
fn review_keeps_going_after_agent_failure() {
    if !which_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    let bin = fake_claude(&temp, CLAUDE_REPLY);
    let ok = write_file(temp.path(), "ok.py", &python_source(25_000));
    let bad = write_file(
        temp.path(),
        "bad.py",
        &format!("# FAIL_HERE\n{}", python_source(25_000)),
    );

    let output = review(&temp, &bin)
        .arg("--large-only")
        .arg(&bad)
        .arg(&ok)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["score"], 0);
    assert!(json[0]["suggestions"][0]
        .as_str()
        .unwrap()
        .starts_with("Error processing large file: "));
    assert!(json[0].get("quality").is_none());
    assert_eq!(json[1]["score"], 1);
}

#[test]
fn review_fails_fast_when_agent_is_missing() {
    let temp = TempDir::new().unwrap();
    let empty_bin = temp.path().join("empty");
    std::fs::create_dir_all(&empty_bin).unwrap();
    let file = write_file(temp.path(), "a.py", "x = 1\n");

    Command::cargo_bin("reviewpack")
        .unwrap()
        .arg("--config")
        .arg(temp.path().join("config.toml"))
        .env("PATH", empty_bin.display().to_string())
        .args(["review", "--agent", "gemini"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in PATH"));
}
