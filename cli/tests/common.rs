//! # Arcsum CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! declares `mod common;` and drives the compiled `arcsum` binary through
//! `assert_cmd`.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
pub const WORLD_SHA256: &str = "486ea46224d1bb4fb680f34f7c9ad96a8f24ec88be73ea8e5a6c65260e9cb8a7";

/// # Get Arcsum Command (`arcsum_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `arcsum` binary.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn arcsum_cmd() -> Command {
    Command::cargo_bin("arcsum").expect("Failed to find arcsum binary for testing")
}

/// A scratch workspace: `root/.git` bounds the project config search, `root/input`
/// holds the tree to archive and `root/out` receives the archive.
pub struct Workspace {
    pub root: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("Failed to create temp workspace");
        fs::create_dir(root.path().join(".git")).expect("Failed to create .git marker");
        fs::create_dir(root.path().join("input")).expect("Failed to create input dir");
        Self { root }
    }

    /// The `a.txt` / `sub/b.txt` tree used throughout the tests.
    pub fn with_scenario_tree() -> Self {
        let ws = Self::new();
        ws.write("a.txt", "hello");
        ws.write("sub/b.txt", "world");
        ws
    }

    pub fn input(&self) -> PathBuf {
        self.root.path().join("input")
    }

    pub fn archive(&self) -> PathBuf {
        self.root.path().join("out/backup.tar")
    }

    pub fn manifest(&self) -> PathBuf {
        self.root.path().join("out/backup.sha256.txt")
    }

    /// Writes `content` to `relative` below the input directory, creating parents.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.input().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(path, content).expect("Failed to write input file");
    }

    /// An `arcsum` command running inside the workspace.
    pub fn cmd(&self) -> Command {
        let mut cmd = arcsum_cmd();
        cmd.current_dir(self.root.path());
        cmd
    }
}

/// Manifest lines, sorted so traversal order does not matter.
pub fn sorted_lines(path: &Path) -> Vec<String> {
    let mut lines: Vec<String> = fs::read_to_string(path)
        .expect("Failed to read manifest")
        .lines()
        .map(str::to_string)
        .collect();
    lines.sort();
    lines
}
