//! Isolated environment for driving the `dfym` binary.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temp directory holding both the tag database and the files being tagged.
/// Everything is removed when dropped.
pub struct TestEnv {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        // Stored paths are canonical, so compare against the canonical root.
        let root = fs::canonicalize(temp_dir.path()).expect("Failed to canonicalize temp dir");
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join("state").join("tags.db")
    }

    /// Creates a regular file and returns its path as a string.
    pub fn file(&self, name: &str) -> String {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, name).expect("Failed to write test file");
        path.to_string_lossy().into_owned()
    }

    /// Creates a directory and returns its path as a string.
    pub fn dir(&self, name: &str) -> String {
        let path = self.root.join(name);
        fs::create_dir_all(&path).expect("Failed to create test directory");
        path.to_string_lossy().into_owned()
    }

    /// A `dfym` command bound to this environment's database.
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("dfym").expect("Failed to find dfym binary");
        cmd.env("DFYM_DATABASE", self.db_path())
            .env_remove("RUST_LOG")
            .current_dir(&self.root);
        cmd
    }

    /// Runs `args`, expects success, and returns stdout lines.
    pub fn lines<I, S>(&self, args: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let output = self.cmd().args(args).assert().success().get_output().stdout.clone();
        String::from_utf8(output)
            .expect("Output was not valid UTF-8")
            .lines()
            .map(String::from)
            .collect()
    }
}
