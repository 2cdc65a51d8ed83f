//! Shared fixture for end-to-end scenarios.
//!
//! Every fixture owns a temp directory that serves as the working directory,
//! the config home and the place where skills and archives are written.

use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub struct E2EFixture {
    pub scenario: String,
    pub temp_dir: TempDir,
    step: usize,
}

impl E2EFixture {
    pub fn new(scenario: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir_all(temp_dir.path().join("config")).expect("Failed to create config dir");
        println!("[E2E] Scenario '{scenario}' in {:?}", temp_dir.path());
        Self {
            scenario: scenario.to_string(),
            temp_dir,
            step: 0,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.temp_dir.path().join(rel)
    }

    pub fn log_step(&mut self, description: &str) {
        self.step += 1;
        println!("[E2E] {} step {}: {description}", self.scenario, self.step);
    }

    /// Run the binary inside the fixture with an isolated environment.
    pub fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::cargo_bin("skillpack").expect("binary is built");
        cmd.current_dir(self.root())
            .env("XDG_CONFIG_HOME", self.path("config"))
            .env("HOME", self.root())
            .env_remove("SKILLPACK_CONFIG")
            .env_remove("SKILLPACK_STRICT")
            .env_remove("SKILLPACK_MAX_LINES")
            .env_remove("SKILLPACK_ARCHIVE_EXTENSION")
            .env_remove("RUST_LOG")
            .args(args);
        let output = cmd.output().expect("Failed to run skillpack");
        println!(
            "[E2E] skillpack {} -> {:?}\n{}{}",
            args.join(" "),
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    /// Run with `--robot` and parse stdout as JSON.
    pub fn run_json(&self, args: &[&str]) -> (Option<i32>, Value) {
        let mut full = vec!["--robot"];
        full.extend_from_slice(args);
        let output = self.run(&full);
        let json = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
        (output.status.code(), json)
    }

    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path(rel)).expect("Failed to read file")
    }

    /// Replace the scaffold placeholder with a real description.
    pub fn fill_description(&self, skill: &str, description: &str) {
        let rel = format!("{skill}/SKILL.md");
        let content = self.read(&rel);
        let start = content.find("description:").expect("description key present");
        let end = start + content[start..].find('\n').expect("line ends");
        let updated = format!(
            "{}description: {description}{}",
            &content[..start],
            &content[end..]
        );
        self.write(&rel, &updated);
    }

    pub fn assert_exit(&self, output: &Output, expected: i32, context: &str) {
        assert_eq!(
            output.status.code(),
            Some(expected),
            "{context}: unexpected exit code\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    pub fn assert_success(&self, output: &Output, context: &str) {
        self.assert_exit(output, 0, context);
    }
}
