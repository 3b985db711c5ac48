//! # Arcsum TAR Archive Operations (`common::archive::tar`)
//!
//! File: cli/src/common/archive/tar.rs
//!
//! ## Overview
//!
//! The archive container is a plain, uncompressed tar file. This module writes
//! one from a list of `FileEntry` values and unpacks one into a directory.
//!
//! ## Architecture
//!
//! The module leverages the `tar` crate for the archive structure:
//!
//! - Only regular files become entries. Entry names are the files' paths
//!   relative to the archived root, passed through as-is so the `tar` crate
//!   stores their raw bytes with `/` separators. Long names use the
//!   GNU extension headers the `tar` crate emits automatically.
//! - File data is streamed from disk into a buffered writer on the output file;
//!   nothing is held in memory beyond the `tar` crate's copy buffer.
//! - Opening the output either truncates an existing file or, when overwriting
//!   is disabled, fails with `ArcsumError::AlreadyExists`.
//! - Extraction delegates to `tar::Archive::unpack`, which creates parent
//!   directories and refuses entries that would escape the destination.
//!
use crate::common::fs::walk::FileEntry;
use crate::core::error::{ArcsumError, Result};
use anyhow::Context;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use tracing::{debug, info};

/// Totals for a written archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    pub files: usize,
    pub bytes: u64,
}

/// Opens `output` for writing.
fn create_archive_file(output: &Path, overwrite: bool) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    match options.open(output) {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            anyhow::bail!(ArcsumError::AlreadyExists {
                path: output.to_path_buf()
            })
        }
        Err(e) => Err(e).with_context(|| format!("Failed to create archive {:?}", output)),
    }
}

/// # Write Tar Archive (`write_tar_archive`)
///
/// Writes every entry in `files` into a new uncompressed tar archive at `output`,
/// in the given order, under its path relative to the archived root.
///
/// ## Errors
///
/// Returns an `Err` if:
/// - `output` exists and `overwrite` is false (`ArcsumError::AlreadyExists`).
/// - The archive file cannot be created or written.
/// - Any source file cannot be read.
pub fn write_tar_archive(files: &[FileEntry], output: &Path, overwrite: bool) -> Result<ArchiveStats> {
    let file = create_archive_file(output, overwrite)?;
    let mut tar_builder = tar::Builder::new(BufWriter::new(file));

    let mut stats = ArchiveStats::default();
    for entry in files {
        let name = entry.manifest_name();
        let size = fs::metadata(&entry.path)
            .with_context(|| format!("Failed to read metadata of {:?}", entry.path))?
            .len();
        tar_builder
            .append_path_with_name(&entry.path, &entry.relative_path)
            .with_context(|| format!("Failed to add {:?} to archive {:?}", entry.path, output))?;
        debug!("Archived {} ({} bytes)", name, size);
        stats.files += 1;
        stats.bytes += size;
    }

    // Writes the end-of-archive records and hands back the buffered writer.
    let mut writer = tar_builder
        .into_inner()
        .with_context(|| format!("Failed to finalize archive {:?}", output))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush archive {:?}", output))?;

    info!(
        "Wrote {} files ({} bytes) to {:?}",
        stats.files, stats.bytes, output
    );
    Ok(stats)
}

/// Unpacks the whole archive at `archive_path` into `destination`.
pub fn extract_tar_archive(archive_path: &Path, destination: &Path) -> Result<()> {
    let file = match File::open(archive_path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            anyhow::bail!(ArcsumError::NotFound {
                path: archive_path.to_path_buf()
            })
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open archive {:?}", archive_path))
        }
    };
    let mut archive = tar::Archive::new(BufReader::new(file));
    archive.unpack(destination).map_err(|e| {
        ArcsumError::Io(format!(
            "Failed to extract archive {:?} into {:?}: {}",
            archive_path, destination, e
        ))
    })?;
    debug!("Extracted {:?} into {:?}", archive_path, destination);
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::fs::walk::{walk_files, WalkOptions};
    use std::collections::HashSet;
    use tar::Archive;
    use tempfile::tempdir;

    fn entry_names(archive_path: &Path) -> Result<Vec<String>> {
        let mut archive = Archive::new(File::open(archive_path)?);
        let mut names = Vec::new();
        for entry in archive.entries()? {
            let entry = entry?;
            names.push(entry.path()?.to_string_lossy().replace('\\', "/"));
        }
        Ok(names)
    }

    #[test]
    fn test_write_tar_archive_basic() -> Result<()> {
        let temp_dir = tempdir()?;
        let dir_path = temp_dir.path();
        fs::write(dir_path.join("file1.txt"), "hello")?;
        fs::create_dir(dir_path.join("subdir"))?;
        fs::write(dir_path.join("subdir/file2.txt"), "world!")?;

        let out_dir = tempdir()?;
        let archive_path = out_dir.path().join("out.tar");
        let files = walk_files(dir_path, &WalkOptions::default())?;
        let stats = write_tar_archive(&files, &archive_path, true)?;
        assert_eq!(stats, ArchiveStats { files: 2, bytes: 11 });

        let found: HashSet<String> = entry_names(&archive_path)?.into_iter().collect();
        assert!(found.contains("file1.txt"));
        assert!(found.contains("subdir/file2.txt"));
        // Directories are not stored as entries.
        assert_eq!(found.len(), 2);
        Ok(())
    }

    #[test]
    fn test_entries_are_stored_uncompressed() -> Result<()> {
        let temp_dir = tempdir()?;
        let payload = "uncompressed-marker-".repeat(50);
        fs::write(temp_dir.path().join("data.txt"), &payload)?;

        let out_dir = tempdir()?;
        let archive_path = out_dir.path().join("out.tar");
        let files = walk_files(temp_dir.path(), &WalkOptions::default())?;
        write_tar_archive(&files, &archive_path, true)?;

        let raw = fs::read(&archive_path)?;
        let haystack = String::from_utf8_lossy(&raw);
        assert!(haystack.contains(&payload));
        Ok(())
    }

    #[test]
    fn test_write_empty_archive_then_extract() -> Result<()> {
        let out_dir = tempdir()?;
        let archive_path = out_dir.path().join("empty.tar");
        let stats = write_tar_archive(&[], &archive_path, true)?;
        assert_eq!(stats, ArchiveStats::default());
        assert!(entry_names(&archive_path)?.is_empty());

        let dest = tempdir()?;
        extract_tar_archive(&archive_path, dest.path())?;
        assert_eq!(fs::read_dir(dest.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_overwrite_policy() -> Result<()> {
        let out_dir = tempdir()?;
        let archive_path = out_dir.path().join("out.tar");
        fs::write(&archive_path, "previous contents")?;

        let err = write_tar_archive(&[], &archive_path, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArcsumError>(),
            Some(ArcsumError::AlreadyExists { .. })
        ));
        assert_eq!(fs::read_to_string(&archive_path)?, "previous contents");

        write_tar_archive(&[], &archive_path, true)?;
        assert!(entry_names(&archive_path)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_extract_round_trip() -> Result<()> {
        let src = tempdir()?;
        fs::create_dir_all(src.path().join("a/b"))?;
        fs::write(src.path().join("a/b/deep.txt"), "deep")?;
        fs::write(src.path().join("top.txt"), "top")?;

        let out_dir = tempdir()?;
        let archive_path = out_dir.path().join("out.tar");
        let files = walk_files(src.path(), &WalkOptions::default())?;
        write_tar_archive(&files, &archive_path, true)?;

        let dest = tempdir()?;
        extract_tar_archive(&archive_path, dest.path())?;
        assert_eq!(fs::read_to_string(dest.path().join("a/b/deep.txt"))?, "deep");
        assert_eq!(fs::read_to_string(dest.path().join("top.txt"))?, "top");
        Ok(())
    }

    #[test]
    fn test_extract_corrupt_archive_is_io_failure() -> Result<()> {
        let out_dir = tempdir()?;
        let archive_path = out_dir.path().join("bad.tar");
        // A header block whose checksum field does not match its contents.
        fs::write(&archive_path, vec![b'x'; 1024])?;

        let dest = tempdir()?;
        let err = extract_tar_archive(&archive_path, dest.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArcsumError>(),
            Some(ArcsumError::Io(_))
        ));
        Ok(())
    }

    #[test]
    fn test_extract_missing_archive() {
        let dest = tempdir().unwrap();
        let err = extract_tar_archive(&dest.path().join("missing.tar"), dest.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArcsumError>(),
            Some(ArcsumError::NotFound { .. })
        ));
    }
}
