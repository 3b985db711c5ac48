//! # Arcsum Archiver (`commands::archive::archiver`)
//!
//! File: cli/src/commands/archive/archiver.rs
//!
//! ## Overview
//!
//! Orchestrates one archiving run:
//!
//! 1. Resolve the input directory to an absolute path and make sure the output's
//!    parent directory exists.
//! 2. Start the resource sampler and the clock.
//! 3. Walk the input and write every regular file into the tar archive on tokio's
//!    blocking pool.
//! 4. Stop and join the sampler, whether or not writing succeeded, then surface
//!    any writing error.
//! 5. Write the checksum manifest against the *input* directory to the path
//!    derived from the archive path.
//! 6. Return an `ArchiveReport` for the caller to print.
//!
//! Nothing is rolled back on failure: a partially written archive stays on disk.
//!
use crate::common::archive::tar::{write_tar_archive, ArchiveStats};
use crate::common::fs::io::{ensure_dir_exists, resolve_input_dir, resolve_output_path};
use crate::common::fs::walk::{walk_files, WalkOptions};
use crate::common::manifest::{manifest_path_for, write_manifest};
use crate::common::system::monitor::{ResourceSampler, ResourceUsage};
use crate::core::config::Config;
use crate::core::error::Result;
use anyhow::Context;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// Effective settings for one archiving run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOptions {
    pub sort_entries: bool,
    pub overwrite: bool,
    pub sample_window: Duration,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ArchiveOptions {
    fn from(config: &Config) -> Self {
        Self {
            sort_entries: config.archive.sort_entries,
            overwrite: config.archive.overwrite,
            sample_window: config.monitor.sample_window(),
        }
    }
}

/// Summary of a completed archiving run.
#[derive(Debug, Clone)]
pub struct ArchiveReport {
    pub archive_path: PathBuf,
    pub manifest_path: PathBuf,
    pub stats: ArchiveStats,
    pub elapsed: Duration,
    pub usage: ResourceUsage,
}

impl fmt::Display for ArchiveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Archived to: {}", self.archive_path.display())?;
        writeln!(f, "Checksums written to: {}", self.manifest_path.display())?;
        writeln!(
            f,
            "Time taken to archive: {:.2} seconds",
            self.elapsed.as_secs_f64()
        )?;
        write!(
            f,
            "Peak memory usage during archive: {:.2} MiB",
            self.usage.peak_memory_mib()
        )?;
        if let Some(cpu) = self.usage.average_cpu() {
            write!(f, "\nAverage CPU usage during archive: {:.2}%", cpu)?;
        }
        Ok(())
    }
}

/// Archives `input` into an uncompressed tar at `output` and writes its checksum manifest.
///
/// # Errors
///
/// Fails if the input directory is missing, any file cannot be read, the
/// archive or manifest cannot be written, or the archive exists and
/// `options.overwrite` is false.
pub async fn archive_directory(
    input: &Path,
    output: &Path,
    options: &ArchiveOptions,
) -> Result<ArchiveReport> {
    let input_root = resolve_input_dir(input)?;
    let archive_path = resolve_output_path(output)?;
    if let Some(parent) = archive_path.parent() {
        ensure_dir_exists(parent)?;
    }
    let manifest_path = manifest_path_for(&archive_path);

    let walk_options = WalkOptions {
        sort_entries: options.sort_entries,
        exclude: outputs_inside_root(&input_root, &[&archive_path, &manifest_path]),
    };
    info!(
        "Archiving {:?} into {:?}",
        input_root, archive_path
    );

    let sampler = ResourceSampler::start(options.sample_window);
    let started = Instant::now();
    let write_result = {
        let root = input_root.clone();
        let destination = archive_path.clone();
        let walk_options = walk_options.clone();
        let overwrite = options.overwrite;
        tokio::task::spawn_blocking(move || -> Result<ArchiveStats> {
            let files = walk_files(&root, &walk_options)?;
            write_tar_archive(&files, &destination, overwrite)
        })
        .await
    };
    let elapsed = started.elapsed();
    let usage = sampler.stop().await;
    let stats = write_result.context("Archive writer task failed")??;

    {
        let root = input_root.clone();
        let manifest = manifest_path.clone();
        tokio::task::spawn_blocking(move || write_manifest(&root, &manifest, &walk_options))
            .await
            .context("Manifest writer task failed")??;
    }

    info!(
        "Archived {} files ({} bytes) in {:.2}s",
        stats.files,
        stats.bytes,
        elapsed.as_secs_f64()
    );
    Ok(ArchiveReport {
        archive_path,
        manifest_path,
        stats,
        elapsed,
        usage,
    })
}

/// Canonical forms of `outputs` that fall inside `root`, so the walk can skip them.
fn outputs_inside_root(root: &Path, outputs: &[&Path]) -> Vec<PathBuf> {
    outputs
        .iter()
        .filter_map(|path| {
            let parent = path.parent()?.canonicalize().ok()?;
            let canonical = parent.join(path.file_name()?);
            canonical.starts_with(root).then_some(canonical)
        })
        .collect()
}
