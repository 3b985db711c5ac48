//! # Arcsum Archive Command
//!
//! File: cli/src/commands/archive/mod.rs
//!
//! ## Overview
//!
//! The one command arcsum provides: archive a directory, write its checksum
//! manifest, print a resource summary, and optionally verify the result.
//!
//! ## Architecture
//!
//! - `archiver.rs`: archiving run with resource sampling and manifest writing
//! - `verify.rs`: extraction and re-hashing against the manifest
//!
//! `handle_archive` loads configuration, lets command-line flags override it,
//! runs the archiver, prints the report, and runs the verifier when `--verify`
//! is given.
//!
//! ## Examples
//!
//! ```bash
//! # Archive ./photos into backups/photos.tar (manifest: backups/photos.sha256.txt)
//! arcsum ./photos backups/photos.tar
//!
//! # Deterministic manifest order, refuse to replace an existing archive, verify afterwards
//! arcsum --sorted --no-clobber --verify ./photos backups/photos.tar
//! ```
//!
//! Exit status: `0` on success, `1` on any error, `2` when archiving succeeded
//! but verification found a mismatch.
//!
use crate::core::config::{self, Config};
use crate::core::error::{ArcsumError, Result};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

pub mod archiver;
pub mod verify;

use archiver::ArchiveOptions;
use verify::VerificationOutcome;

/// Arguments for archiving a directory.
#[derive(Args, Debug, Clone)]
pub struct ArchiveArgs {
    /// Directory to archive.
    pub input: PathBuf,

    /// Path of the tar archive to create. The manifest is written next to it
    /// with the extension replaced by `.sha256.txt`.
    pub output: PathBuf,

    /// After archiving, extract the archive to a temporary directory and check
    /// every file against the manifest.
    #[arg(long)]
    pub verify: bool,

    /// Sort files by name during traversal so the manifest order is deterministic.
    #[arg(long, overrides_with = "no_sorted")]
    pub sorted: bool,

    /// Keep filesystem traversal order even if configuration asks for sorting.
    #[arg(long, overrides_with = "sorted")]
    pub no_sorted: bool,

    /// Fail instead of replacing an archive that already exists.
    #[arg(long, overrides_with = "clobber")]
    pub no_clobber: bool,

    /// Replace an existing archive even if configuration disables overwriting.
    #[arg(long, overrides_with = "no_clobber")]
    pub clobber: bool,

    /// Window over which each CPU usage sample is measured, in milliseconds.
    #[arg(long, value_name = "MS", env = "ARCSUM_SAMPLE_WINDOW_MS")]
    pub sample_window_ms: Option<u64>,
}

/// Applies command-line overrides on top of the loaded configuration.
fn apply_overrides(mut config: Config, args: &ArchiveArgs) -> Result<Config> {
    if args.sorted {
        config.archive.sort_entries = true;
    } else if args.no_sorted {
        config.archive.sort_entries = false;
    }
    if args.no_clobber {
        config.archive.overwrite = false;
    } else if args.clobber {
        config.archive.overwrite = true;
    }
    if let Some(window) = args.sample_window_ms {
        config.monitor.sample_window_ms = window;
    }
    config::validate_config(&config)?;
    Ok(config)
}

/// # Handle Archive Command (`handle_archive`)
///
/// Runs the archiver and, when requested, the verifier.
///
/// ## Errors
///
/// Any archiving failure is returned as-is. A verification mismatch is printed
/// and then returned as `ArcsumError::ChecksumMismatch` so `main` can map it to
/// its own exit status.
pub async fn handle_archive(args: ArchiveArgs) -> Result<()> {
    info!("Handling archive command with args: {:?}", args);
    let config = apply_overrides(config::load_config()?, &args)?;
    let options = ArchiveOptions::from(&config);
    info!("Effective archive options: {:?}", options);

    let report = archiver::archive_directory(&args.input, &args.output, &options).await?;
    println!("{}", report);

    if !args.verify {
        return Ok(());
    }

    let archive_path = report.archive_path.clone();
    let manifest_path = report.manifest_path.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        verify::verify_integrity(&archive_path, &manifest_path)
    })
    .await
    .context("Verification task failed")??;
    info!("Verification finished (verified: {})", outcome.is_verified());

    let (line, result) = outcome_result(outcome);
    println!("{}", line);
    result
}

/// The status line to print for `outcome`, and the command's result.
fn outcome_result(outcome: VerificationOutcome) -> (String, Result<()>) {
    match outcome {
        VerificationOutcome::Verified { .. } => ("✅ Integrity verified".to_string(), Ok(())),
        VerificationOutcome::Mismatch { relative_path, .. } => (
            format!("❌ Mismatch in {}", relative_path),
            Err(ArcsumError::ChecksumMismatch {
                path: relative_path,
            }
            .into()),
        ),
    }
}
