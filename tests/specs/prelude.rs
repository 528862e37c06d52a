//! Shared helpers for CLI specs

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use predicates::str::contains;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Path to the built `racelight` binary, next to the test executable
pub fn racelight_bin() -> PathBuf {
    let mut dir = std::env::current_exe().unwrap();
    dir.pop();
    if dir.ends_with("deps") {
        dir.pop();
    }
    dir.join(format!("racelight{}", std::env::consts::EXE_SUFFIX))
}

/// An isolated config directory
pub struct Home {
    dir: TempDir,
}

impl Home {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the config dir
    pub fn file(&self, rel: &str, contents: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    /// Parsed settings.json
    pub fn settings(&self) -> serde_json::Value {
        let text = std::fs::read_to_string(self.path().join("settings.json")).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    pub fn rl(&self) -> Cli {
        let mut cmd = Command::new(racelight_bin());
        cmd.arg("--config-dir")
            .arg(self.path())
            .env_remove("RACELIGHT_HOME")
            .env_remove("RUST_LOG");
        Cli { cmd }
    }
}

/// Builder around a single CLI invocation
pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> Run {
        Run(self.cmd.assert().success())
    }

    pub fn fails(mut self) -> Run {
        Run(self.cmd.assert().failure())
    }
}

/// Finished invocation
pub struct Run(Assert);

impl Run {
    pub fn stdout_has(self, needle: &str) -> Self {
        Run(self.0.stdout(contains(needle)))
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        Run(self.0.stderr(contains(needle)))
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        let stdout = String::from_utf8_lossy(&self.0.get_output().stdout).to_string();
        similar_asserts::assert_eq!(stdout.as_str(), expected);
        self
    }
}
