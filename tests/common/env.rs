//! Test environment builder for isolated tower-operator testing.
//!
//! Every `TestEnv` gets its own working directory and config home, so the
//! developer's own config and `TOWER_*` variables never leak into a test.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const TOWER_ENV_VARS: &[&str] = &[
    "TOWER_MANIFESTS",
    "TOWER_RECORDS",
    "TOWER_MAX_ATTEMPTS",
    "TOWER_MAX_DISCS",
    "TOWER_VERBOSITY",
];

/// Result of running a tower-operator CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as NDJSON
    pub fn events(&self) -> Vec<Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l).unwrap_or_else(|e| panic!("bad NDJSON line {l:?}: {e}"))
            })
            .collect()
    }
}

/// Isolated test environment with temp directories.
pub struct TestEnv {
    /// Working directory; manifests and records use the default paths under it
    pub project_root: TempDir,
    /// XDG config home
    pub config_home: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: tempfile::tempdir().expect("Failed to create project dir"),
            config_home: tempfile::tempdir().expect("Failed to create config home"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_tower-operator")),
        }
    }

    /// Get path relative to project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn manifests_dir(&self) -> PathBuf {
        self.project_path("manifests")
    }

    pub fn records_dir(&self) -> PathBuf {
        self.project_path(".tower/records")
    }

    /// Run the CLI from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Run the CLI from the project root with extra env vars
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.bin);
        cmd.current_dir(self.project_root.path())
            .args(args)
            .env("XDG_CONFIG_HOME", self.config_home.path())
            .env("HOME", self.config_home.path());
        for key in TOWER_ENV_VARS {
            cmd.env_remove(key);
        }
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute tower-operator");
        output_to_result(output)
    }

    /// Write a TowerChallenge manifest into the default manifest directory
    pub fn write_manifest(&self, name: &str, discs: i64) -> PathBuf {
        let path = self.manifests_dir().join(format!("{name}.yaml"));
        write_file(
            &path,
            &format!(
                "apiVersion: tower-operator.dev/v1\nkind: TowerChallenge\nmetadata:\n  name: {name}\nspec:\n  discs: {discs}\n"
            ),
        );
        path
    }

    /// Write a project file, creating parents
    pub fn write_project_file(&self, relative: &str, content: &str) {
        write_file(&self.project_path(relative), content);
    }

    /// Parsed status document, if one was written
    pub fn status(&self, name: &str) -> Option<Value> {
        let path = self.manifests_dir().join(format!("{name}.status.json"));
        let content = std::fs::read_to_string(path).ok()?;
        Some(serde_json::from_str(&content).expect("status is JSON"))
    }

    /// Parsed record document
    pub fn record(&self, name: &str) -> Option<Value> {
        let path = self.records_dir().join(format!("{name}.json"));
        let content = std::fs::read_to_string(path).ok()?;
        Some(serde_json::from_str(&content).expect("record is JSON"))
    }

    /// Record names on disk, sorted
    pub fn record_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.records_dir())
            .map(|entries| {
                entries
                    .flatten()
                    .filter_map(|e| {
                        let name = e.file_name().to_string_lossy().to_string();
                        name.strip_suffix(".json").map(str::to_string)
                    })
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create directories");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}
