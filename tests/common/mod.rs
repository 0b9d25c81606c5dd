//! Shared helpers for integration tests: a results directory in a temp dir
//! and a `benchplot` command isolated from the user's config.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use insta_cmd::get_cargo_bin;
use rstest::fixture;
use serde_json::{Value, json};
use tempfile::TempDir;

/// A temporary results directory.
pub struct Results {
    dir: TempDir,
}

impl Results {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a result document at `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn write_json(&self, rel: &str, value: &Value) -> PathBuf {
        self.write(rel, &value.to_string())
    }

    /// A `benchplot` invocation that never reads the user's config.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin("benchplot"));
        cmd.current_dir(self.path())
            .env("BENCHPLOT_CONFIG_PATH", self.path().join("no-config.toml"))
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("CLICOLOR_FORCE");
        cmd
    }
}

/// Empty results directory.
#[fixture]
pub fn results() -> Results {
    Results::new()
}

/// A mitata-style row: `{"name": ..., "stats": {"avg": ...}}`.
pub fn row(name: &str, avg: impl Into<Value>) -> Value {
    json!({"name": name, "stats": {"avg": avg.into()}})
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
