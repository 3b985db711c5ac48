//! # Arcsum Directory Traversal (`common::fs::walk`)
//!
//! File: cli/src/common/fs/walk.rs
//!
//! ## Overview
//!
//! Enumerates every regular file below a root directory as a `FileEntry`.
//! Both the archiver and the manifest writer use this walker so that they see
//! the same set of files.
//!
//! - Directories are descended into but never yielded.
//! - Symbolic links are not followed and not yielded.
//! - Order is whatever the filesystem returns unless `sort_entries` is set, in
//!   which case each directory's children are sorted by file name.
//! - Relative paths must be valid UTF-8, since they are written verbatim into
//!   the manifest. A non-UTF-8 name fails the walk with
//!   `ArcsumError::NonUtf8Path` instead of being stored under a lossy name.
//! - Paths listed in `exclude` (compared after canonicalisation) are skipped.
//!   The archiver uses this to keep its own output out of the archive when the
//!   output lives inside the input tree.
//!
use crate::core::error::{ArcsumError, Result};
use anyhow::Context;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Options for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Sort entries by file name within each directory.
    pub sort_entries: bool,
    /// Absolute paths that must not be yielded.
    pub exclude: Vec<PathBuf>,
}

/// A regular file discovered during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full path to the file
    pub path: PathBuf,
    /// Path relative to the walked root
    pub relative_path: PathBuf,
}

impl FileEntry {
    /// The relative path rendered with `/` separators, as written to the manifest.
    ///
    /// `walk_files` only yields entries whose relative path is valid UTF-8.
    pub fn manifest_name(&self) -> String {
        self.relative_path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Lists every regular file under `root`.
///
/// # Errors
///
/// `ArcsumError::NotFound` if `root` does not exist, `ArcsumError::NotADirectory`
/// if it is not a directory, `ArcsumError::NonUtf8Path` if a file's relative path
/// is not valid UTF-8, or an I/O error if any part of the tree cannot be read.
pub fn walk_files(root: &Path, options: &WalkOptions) -> Result<Vec<FileEntry>> {
    if !root.exists() {
        anyhow::bail!(ArcsumError::NotFound {
            path: root.to_path_buf()
        });
    }
    if !root.is_dir() {
        anyhow::bail!(ArcsumError::NotADirectory {
            path: root.to_path_buf()
        });
    }

    let mut walker = WalkDir::new(root).follow_links(false);
    if options.sort_entries {
        walker = walker.sort_by_file_name();
    }

    let mut entries = Vec::new();
    for entry in walker {
        let entry =
            entry.with_context(|| format!("Failed to walk directory {:?}", root))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path().to_path_buf();
        if is_excluded(&path, &options.exclude) {
            debug!("Skipping excluded path {:?}", path);
            continue;
        }
        let relative_path = path
            .strip_prefix(root)
            .with_context(|| format!("{:?} is not below {:?}", path, root))?
            .to_path_buf();
        if relative_path.to_str().is_none() {
            anyhow::bail!(ArcsumError::NonUtf8Path { path });
        }
        entries.push(FileEntry {
            path,
            relative_path,
        });
    }
    debug!("Found {} files under {:?}", entries.len(), root);
    Ok(entries)
}

fn is_excluded(path: &Path, exclude: &[PathBuf]) -> bool {
    if exclude.is_empty() {
        return false;
    }
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    exclude.iter().any(|ex| *ex == canonical)
}
