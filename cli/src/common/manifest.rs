//! # Arcsum Checksum Manifest (`common::manifest`)
//!
//! File: cli/src/common/manifest.rs
//!
//! ## Overview
//!
//! Writes and reads the checksum manifest that accompanies every archive. The
//! manifest is UTF-8 text with one line per file:
//!
//! ```text
//! <relative-path> <64-character-lowercase-hex-sha256>
//! ```
//!
//! Relative paths use `/` separators regardless of platform. Lines appear in
//! traversal order. The manifest is always rewritten from scratch.
//!
//! ## Architecture
//!
//! - **`write_manifest`**: walks a root with `common::fs::walk`, hashes each file
//!   with `common::digest`, and writes the lines through a buffered writer.
//! - **`read_manifest`**: parses a manifest file back into `ManifestEntry` values.
//!   A non-blank line must contain exactly two whitespace-separated fields.
//! - **`manifest_path_for`**: derives the manifest location from an archive path.
//!
use crate::common::digest::digest_file;
use crate::common::fs::io::ensure_dir_exists;
use crate::common::fs::walk::{walk_files, WalkOptions};
use crate::core::error::{ArcsumError, Result};
use anyhow::Context;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extension that replaces the archive's own extension to form the manifest path.
pub const MANIFEST_EXTENSION: &str = "sha256.txt";

/// One `(relative path, digest)` pair of a checksum manifest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ManifestEntry {
    pub relative_path: String,
    pub digest: String,
}

impl ManifestEntry {
    pub fn to_line(&self) -> String {
        format!("{} {}", self.relative_path, self.digest)
    }
}

/// `out/backup.tar` becomes `out/backup.sha256.txt`.
pub fn manifest_path_for(archive_path: &Path) -> PathBuf {
    archive_path.with_extension(MANIFEST_EXTENSION)
}

/// Hashes every regular file under `root` and writes the manifest to `manifest_path`.
///
/// Any existing file at `manifest_path` is truncated. Parent directories are
/// created if needed. Returns the entries in the order they were written.
pub fn write_manifest(
    root: &Path,
    manifest_path: &Path,
    options: &WalkOptions,
) -> Result<Vec<ManifestEntry>> {
    let files = walk_files(root, options)?;

    if let Some(parent) = manifest_path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir_exists(parent)?;
        }
    }
    let file = File::create(manifest_path)
        .with_context(|| format!("Failed to create manifest {:?}", manifest_path))?;
    let mut writer = BufWriter::new(file);

    let mut entries = Vec::with_capacity(files.len());
    for file in &files {
        let entry = ManifestEntry {
            relative_path: file.manifest_name(),
            digest: digest_file(&file.path)?,
        };
        debug!("{}", entry.to_line());
        writeln!(writer, "{}", entry.to_line())
            .with_context(|| format!("Failed to write manifest {:?}", manifest_path))?;
        entries.push(entry);
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush manifest {:?}", manifest_path))?;

    info!(
        "Wrote {} checksums for {:?} to {:?}",
        entries.len(),
        root,
        manifest_path
    );
    Ok(entries)
}

/// Splits a manifest line into its two fields. Returns `None` unless there are exactly two.
pub fn parse_manifest_line(line: &str) -> Option<ManifestEntry> {
    let mut fields = line.split_whitespace();
    let relative_path = fields.next()?;
    let digest = fields.next()?;
    if fields.next().is_some() {
        return None;
    }
    Some(ManifestEntry {
        relative_path: relative_path.to_string(),
        digest: digest.to_string(),
    })
}

/// Reads a manifest file. Blank lines are skipped.
///
/// # Errors
///
/// - `ArcsumError::NotFound` if the manifest does not exist.
/// - `ArcsumError::MalformedManifestLine` for a line without exactly two fields.
/// - An I/O error if the file cannot be read.
pub fn read_manifest(manifest_path: &Path) -> Result<Vec<ManifestEntry>> {
    let file = match File::open(manifest_path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            anyhow::bail!(ArcsumError::NotFound {
                path: manifest_path.to_path_buf()
            })
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to open manifest {:?}", manifest_path))
        }
    };

    let mut entries = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line =
            line.with_context(|| format!("Failed to read manifest {:?}", manifest_path))?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = parse_manifest_line(&line).ok_or_else(|| ArcsumError::MalformedManifestLine {
            line_number: index + 1,
            line: line.clone(),
        })?;
        entries.push(entry);
    }
    Ok(entries)
}
