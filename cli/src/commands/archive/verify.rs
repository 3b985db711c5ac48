//! # Arcsum Integrity Verifier (`commands::archive::verify`)
//!
//! File: cli/src/commands/archive/verify.rs
//!
//! ## Overview
//!
//! Checks an archive against its checksum manifest by extracting it into a
//! temporary directory and re-hashing every file the manifest lists, in
//! manifest order. The first mismatch ends the check; later lines are not
//! evaluated.
//!
//! A mismatch is a normal result (`VerificationOutcome::Mismatch`), not an
//! error. Errors are reserved for problems that prevent the check from
//! running: a missing or unreadable archive, a missing or malformed manifest,
//! or a manifest path that would resolve outside the scratch directory.
//!
//! The scratch directory is a `tempfile::TempDir`, removed when it goes out of
//! scope on every return path.
//!
use crate::common::archive::tar::extract_tar_archive;
use crate::common::digest::digest_file;
use crate::common::manifest::read_manifest;
use crate::core::error::{ArcsumError, Result};
use anyhow::Context;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Digest reported for a manifest entry whose file is absent from the archive.
pub const MISSING_DIGEST: &str = "<missing>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified {
        files_checked: usize,
    },
    Mismatch {
        relative_path: String,
        expected: String,
        actual: String,
    },
}

impl VerificationOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationOutcome::Verified { .. })
    }
}

/// Extracts `archive_path` to scratch space and compares every file against `manifest_path`.
pub fn verify_integrity(archive_path: &Path, manifest_path: &Path) -> Result<VerificationOutcome> {
    let scratch = tempfile::Builder::new()
        .prefix("arcsum-verify-")
        .tempdir()
        .context("Failed to create scratch directory for verification")?;
    debug!("Verifying {:?} in {:?}", archive_path, scratch.path());

    extract_tar_archive(archive_path, scratch.path())?;
    let entries = read_manifest(manifest_path)?;

    for entry in &entries {
        let extracted = extracted_path(scratch.path(), &entry.relative_path)?;
        let actual = match digest_file(&extracted) {
            Ok(digest) => digest,
            Err(e) if is_not_found(&e) => MISSING_DIGEST.to_string(),
            Err(e) => return Err(e),
        };
        if actual != entry.digest {
            warn!(
                "Checksum mismatch in {}: expected {}, got {}",
                entry.relative_path, entry.digest, actual
            );
            return Ok(VerificationOutcome::Mismatch {
                relative_path: entry.relative_path.clone(),
                expected: entry.digest.clone(),
                actual,
            });
        }
        debug!("OK {}", entry.relative_path);
    }

    info!("Verified {} files in {:?}", entries.len(), archive_path);
    Ok(VerificationOutcome::Verified {
        files_checked: entries.len(),
    })
}

fn is_not_found(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<ArcsumError>(),
        Some(ArcsumError::NotFound { .. })
    )
}

/// Joins a `/`-separated manifest path onto `root`, rejecting paths that leave it.
fn extracted_path(root: &Path, relative_path: &str) -> Result<PathBuf> {
    let escapes = || ArcsumError::UnsafeManifestPath {
        path: relative_path.to_string(),
    };
    if relative_path.starts_with('/') || Path::new(relative_path).is_absolute() {
        anyhow::bail!(escapes());
    }
    let mut path = root.to_path_buf();
    for part in relative_path.split('/') {
        let mut components = Path::new(part).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => path.push(name),
            (Some(Component::CurDir), None) | (None, None) => {}
            _ => anyhow::bail!(escapes()),
        }
    }
    Ok(path)
}
