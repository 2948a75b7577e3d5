use assert_cmd::{cargo::cargo_bin_cmd, Command};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a Command for trackport
pub fn trackport() -> Command {
    cargo_bin_cmd!("trackport")
}

/// Setup a test store and return the directory only
#[allow(dead_code)]
pub fn setup_test_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    trackport()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    dir
}

/// Write a JSON document into the directory and return its path
#[allow(dead_code)]
pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

/// Run a command with `--format json` and parse its stdout
#[allow(dead_code)]
pub fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = trackport()
        .current_dir(dir)
        .args(["--format", "json"])
        .args(args)
        .output()
        .unwrap();
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout was not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}
