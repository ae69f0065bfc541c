//! CLI tests against the built binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use reviewpack::compress::{COMPRESSED_SECTION_MARKER, END_OF_FILE_MARKER};
use reviewpack::Config;

use crate::helpers::{python_source, write_file};

/// Binary with an isolated config file.
fn reviewpack(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("reviewpack").unwrap();
    cmd.arg("--config").arg(temp.path().join("config.toml"));
    cmd.env_remove("REVIEWPACK_LOG");
    cmd
}

// ============================================
// Help
// ============================================

#[test]
fn help_lists_commands() {
    Command::cargo_bin("reviewpack")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compress"))
        .stdout(predicate::str::contains("fingerprint"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("review"));
}

// ============================================
// Compress
// ============================================

#[test]
fn compress_small_file_prints_it_unchanged() {
    let temp = TempDir::new().unwrap();
    let file = write_file(temp.path(), "small.py", "print('hi')\n");

    reviewpack(&temp)
        .arg("compress")
        .arg(&file)
        .assert()
        .success()
        .stdout("print('hi')\n")
        .stderr(predicate::str::contains("unchanged"));
}

#[test]
fn compress_large_file_adds_markers() {
    let temp = TempDir::new().unwrap();
    let file = write_file(temp.path(), "big.py", &python_source(50_000));

    reviewpack(&temp)
        .arg("compress")
        .arg(&file)
        .arg("--stats")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("=== File statistics ==="))
        .stdout(predicate::str::contains(COMPRESSED_SECTION_MARKER))
        .stdout(predicate::str::contains(END_OF_FILE_MARKER))
        .stderr(predicate::str::contains("(python)"));
}

#[test]
fn compress_rejects_invalid_rate() {
    let temp = TempDir::new().unwrap();
    let file = write_file(temp.path(), "a.py", "x = 1\n");

    reviewpack(&temp)
        .args(["compress", "--rate", "1.5"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("sample_rate"));
}

#[test]
fn compress_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    reviewpack(&temp)
        .arg("compress")
        .arg(temp.path().join("missing.rs"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn compress_uses_config_file_settings() {
    let temp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.compression.max_content_length = 10;
    config.compression.header_lines = 1;
    config.compression.footer_lines = 1;
    config.save_to(&temp.path().join("config.toml")).unwrap();

    let file = write_file(temp.path(), "a.txt", "one\ntwo\nthree\nfour\nfive\nsix\n");

    reviewpack(&temp)
        .arg("compress")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("one\n"))
        .stdout(predicate::str::contains(COMPRESSED_SECTION_MARKER));
}

// ============================================
// Fingerprint
// ============================================

#[test]
fn fingerprint_prints_json() {
    let temp = TempDir::new().unwrap();
    let file = write_file(temp.path(), "m.py", "import os\n\ndef f():\n    pass\n");

    let output = reviewpack(&temp).arg("fingerprint").arg(&file).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["language"], "python");
    assert_eq!(json["functions"], 1);
    assert_eq!(json["totalLines"], 4);
}

#[test]
fn fast_fingerprint_prints_key() {
    let temp = TempDir::new().unwrap();
    let file = write_file(temp.path(), "x.txt", "abc");

    reviewpack(&temp)
        .args(["fingerprint", "--fast"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"key\": \"3:"));
}

// ============================================
// Plan
// ============================================

#[test]
fn plan_json_lists_large_and_skipped_files() {
    let temp = TempDir::new().unwrap();
    let big = write_file(temp.path(), "big.py", &python_source(40_000));
    let small = write_file(temp.path(), "small.py", "x = 1\n");

    let output = reviewpack(&temp)
        .args(["plan", "--json"])
        .arg(&big)
        .arg(&small)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["batches"].as_array().unwrap().len(), 1);
    assert_eq!(
        json["batches"][0]["files"][0]["file_path"],
        big.to_string_lossy().as_ref()
    );
    assert_eq!(json["skipped"][0], small.to_string_lossy().as_ref());
}

#[test]
fn plan_text_with_tight_ceiling_splits_batches() {
    let temp = TempDir::new().unwrap();
    let a = write_file(temp.path(), "a.py", &python_source(30_000));
    let b = write_file(temp.path(), "b.py", &python_source(30_000));

    reviewpack(&temp)
        .args(["plan", "--max-batch-tokens", "10"])
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("Batch 1: 1 file(s)"))
        .stdout(predicate::str::contains("Batch 2: 1 file(s)"));
}

// ============================================
// Config
// ============================================

#[test]
fn config_init_then_show() {
    let temp = TempDir::new().unwrap();

    reviewpack(&temp).args(["config", "init"]).assert().success();
    assert!(temp.path().join("config.toml").exists());

    reviewpack(&temp)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    reviewpack(&temp)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[compression]"))
        .stdout(predicate::str::contains("sample_rate = 0.2"))
        .stdout(predicate::str::contains("are advisory"));
}

#[test]
fn config_path_prints_override() {
    let temp = TempDir::new().unwrap();
    reviewpack(&temp)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn completions_for_bash() {
    Command::cargo_bin("reviewpack")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reviewpack"));
}
