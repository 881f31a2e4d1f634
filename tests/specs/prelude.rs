//! Shared helpers for CLI specs

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

/// Exit code `lk` uses for a contended lock
pub const EXIT_CONTENDED: i32 = 75;

/// Path to the built `lk` binary, for nesting `lk` inside `lk exec`
pub fn lk_bin() -> String {
    assert_cmd::cargo::cargo_bin("lk").display().to_string()
}

/// Scratch project directory with its own lock store
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store(&self) -> PathBuf {
        self.path().join("locks")
    }

    /// Write a file relative to the project root
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// An `lk` invocation bound to this project's store
    pub fn lk(&self) -> Cli {
        let mut cmd = assert_cmd::Command::cargo_bin("lk").unwrap();
        cmd.current_dir(self.path())
            .env("LK_STORE", self.store())
            .env_remove("LK_CONFIG")
            .env_remove("LK_LOG")
            .env_remove("RUST_LOG");
        Cli { cmd }
    }
}

pub struct Cli {
    cmd: assert_cmd::Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    fn run(mut self) -> Outcome {
        let output: Output = self.cmd.output().unwrap();
        Outcome {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    /// Run and require exit code 0
    pub fn passes(self) -> Outcome {
        let outcome = self.run();
        assert_eq!(outcome.code, Some(0), "expected success\n{}", outcome);
        outcome
    }

    /// Run and require a non-zero exit code
    pub fn fails(self) -> Outcome {
        let outcome = self.run();
        assert_ne!(outcome.code, Some(0), "expected failure\n{}", outcome);
        outcome
    }

    /// Run and require a specific exit code
    pub fn exits_with(self, code: i32) -> Outcome {
        let outcome = self.run();
        assert_eq!(outcome.code, Some(code), "unexpected exit code\n{}", outcome);
        outcome
    }
}

pub struct Outcome {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Outcome {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout lacks {:?}\n{}", needle, self);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr lacks {:?}\n{}", needle, self);
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout, expected);
        self
    }

    pub fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap()
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "exit: {:?}", self.code)?;
        writeln!(f, "--- stdout ---\n{}", self.stdout)?;
        write!(f, "--- stderr ---\n{}", self.stderr)
    }
}
