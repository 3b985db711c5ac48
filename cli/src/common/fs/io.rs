//! # Arcsum Filesystem Helpers (`common::fs::io`)
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Small wrappers around `std::fs` used by the archiver and manifest writer:
//! - **`ensure_dir_exists`**: creates a directory (and parents) when missing and
//!   rejects paths that exist as something other than a directory.
//! - **`resolve_input_dir`**: turns a user-supplied input path into an absolute,
//!   canonical directory path, reporting `NotFound`/`NotADirectory` clearly.
//! - **`resolve_output_path`**: absolute form of a path that may not exist yet.
//!
use crate::core::error::{ArcsumError, Result};
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path, creating it recursively if needed.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is not a directory, or if creating
/// the directory fails (e.g., due to permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(ArcsumError::NotADirectory {
            path: path.to_path_buf()
        });
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Resolves `path` to an absolute canonical directory path.
pub fn resolve_input_dir(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        anyhow::bail!(ArcsumError::NotFound {
            path: path.to_path_buf()
        });
    }
    if !path.is_dir() {
        anyhow::bail!(ArcsumError::NotADirectory {
            path: path.to_path_buf()
        });
    }
    path.canonicalize()
        .with_context(|| format!("Failed to resolve input directory {:?}", path))
}

/// Absolute form of a path that may not exist yet, relative to the current directory.
pub fn resolve_output_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(cwd.join(path))
}
