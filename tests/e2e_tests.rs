//! End-to-end tests for the depinspect CLI
//!
//! These tests run the compiled binary on the manifest-only path, so no npm
//! or yarn installation is needed. They verify:
//! - Text and JSON output for declared dependencies
//! - Dialect detection from lock files and the --dialect override
//! - Exit codes for various scenarios

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Create a test directory with a sample package.json
fn create_test_project() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

    let package_json = r#"{
  "name": "test-project",
  "version": "1.0.0",
  "dependencies": {
    "lodash": "^4.17.20",
    "express": "^4.18.0"
  },
  "devDependencies": {
    "typescript": "^5.0.0"
  }
}"#;
    fs::write(temp_dir.path().join("package.json"), package_json).unwrap();

    temp_dir
}

fn depinspect() -> Command {
    let mut cmd = Command::cargo_bin("depinspect").expect("binary should be built");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn simple_json(dir: &TempDir, extra: &[&str]) -> Value {
    let output = depinspect()
        .arg(dir.path())
        .args(["--simple", "--json"])
        .args(extra)
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON")
}

mod json_output {
    use super::*;

    /// Records keep manifest order, production before development
    #[test]
    fn test_simple_json_schema() {
        let dir = create_test_project();
        let value = simple_json(&dir, &[]);
        let records = value.as_array().expect("top level should be an array");

        assert_eq!(records.len(), 3);
        let names: Vec<_> = records.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["lodash", "express", "typescript"]);

        assert_eq!(records[0]["type"], "prod");
        assert_eq!(records[0]["required"], "^4.17.20");
        assert_eq!(records[0]["repo"], "npm");
        assert_eq!(records[2]["type"], "dev");
        assert!(records[0].get("installed").is_none());
    }

    /// yarn.lock switches the reported dialect
    #[test]
    fn test_yarn_lock_detected() {
        let dir = create_test_project();
        fs::write(dir.path().join("yarn.lock"), "").unwrap();

        let value = simple_json(&dir, &[]);
        assert!(value
            .as_array()
            .unwrap()
            .iter()
            .all(|r| r["repo"] == "yarn"));
    }

    /// --dialect overrides lock-file detection
    #[test]
    fn test_dialect_override() {
        let dir = create_test_project();
        fs::write(dir.path().join("yarn.lock"), "").unwrap();

        let value = simple_json(&dir, &["--dialect", "npm"]);
        assert_eq!(value[0]["repo"], "npm");
    }

    /// A directory without package.json yields an empty array
    #[test]
    fn test_json_output_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(simple_json(&dir, &[]), Value::Array(Vec::new()));
    }
}

mod text_output {
    use super::*;

    #[test]
    fn test_simple_text_output() {
        let dir = create_test_project();
        depinspect()
            .arg(dir.path())
            .arg("--simple")
            .env("NO_COLOR", "1")
            .assert()
            .success()
            .stdout(predicate::str::contains("dependencies (2)"))
            .stdout(predicate::str::contains("devDependencies (1)"))
            .stdout(predicate::str::contains("lodash"));
    }

    #[test]
    fn test_quiet_mode() {
        let dir = create_test_project();
        depinspect()
            .arg(dir.path())
            .args(["--simple", "--quiet"])
            .assert()
            .success()
            .stdout("3 declared\n");
    }

    #[test]
    fn test_verbose_mode() {
        let dir = create_test_project();
        depinspect()
            .arg(dir.path())
            .args(["--simple", "--verbose"])
            .assert()
            .success()
            .stderr(predicate::str::contains("depinspect v"))
            .stderr(predicate::str::contains("Target:"));
    }
}

mod exit_codes {
    use super::*;

    #[test]
    fn test_exit_code_help() {
        depinspect()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--simple"))
            .stdout(predicate::str::contains("--dialect"));
    }

    #[test]
    fn test_exit_code_version() {
        depinspect()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("depinspect"));
    }

    #[test]
    fn test_exit_code_nonexistent_path() {
        depinspect()
            .args(["/nonexistent/path/for/depinspect", "--simple"])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn test_invalid_timeout() {
        depinspect()
            .args(["--timeout", "soon"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid duration format"));
    }

    #[test]
    fn test_invalid_dialect() {
        depinspect()
            .args(["--dialect", "pnpm"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid dialect"));
    }
}
