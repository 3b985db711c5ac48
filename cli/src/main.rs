//! # Arcsum Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point for the `arcsum` CLI. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Running the archive command and mapping its result to an exit status
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! arcsum --help
//!
//! # Archive with verification and info-level logging
//! arcsum -v --verify ./data out/data.tar
//! ```
//!
//! Exit statuses:
//! - `0`: archive (and verification, if requested) succeeded
//! - `1`: archiving or verification could not be completed
//! - `2`: archiving succeeded but verification found a mismatching file
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (archive)
mod common; // Shared pipeline pieces (digest, manifest, tar, sampler, fs)
mod core; // Core infrastructure (errors, config)

use crate::core::error::ArcsumError;

/// Exit status for any error that stops archiving or verification.
const EXIT_FAILURE: i32 = 1;
/// Exit status when verification finds a mismatch.
const EXIT_VERIFICATION_FAILED: i32 = 2;

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "arcsum",
    about = "📦 arcsum: uncompressed directory archives with SHA-256 manifests",
    long_about = "Packs a directory into an uncompressed tar archive, writes a per-file\n\
                  SHA-256 manifest next to it, reports time, peak memory and CPU usage,\n\
                  and optionally verifies the archive by extracting and re-hashing.",
    version
)]
struct Cli {
    #[command(flatten)]
    archive: commands::archive::ArchiveArgs,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = commands::archive::handle_archive(cli.archive).await {
        let code = exit_code(&e);
        if code == EXIT_VERIFICATION_FAILED {
            tracing::warn!("Verification failed: {:#}", e);
        } else {
            tracing::error!("Command execution failed: {:?}", e);
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(code);
    }

    Ok(())
}

/// Maps a failed run to the process exit status.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ArcsumError>() {
        Some(ArcsumError::ChecksumMismatch { .. }) => EXIT_VERIFICATION_FAILED,
        _ => EXIT_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_cmd::Command;
    use clap::CommandFactory;
    use predicates::prelude::*;

    fn arcsum_cmd() -> Command {
        Command::cargo_bin("arcsum").expect("Failed to find arcsum binary for testing")
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from(["arcsum", "-vv", "--verify", "--sorted", "in", "out.tar"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.archive.verify);
        assert!(cli.archive.sorted);
        assert!(!cli.archive.no_clobber);
        assert_eq!(cli.archive.input, std::path::PathBuf::from("in"));
        assert_eq!(cli.archive.output, std::path::PathBuf::from("out.tar"));
    }

    #[test]
    fn test_cli_last_of_opposing_flags_wins() {
        let cli = Cli::parse_from([
            "arcsum",
            "--sorted",
            "--no-sorted",
            "--clobber",
            "--no-clobber",
            "in",
            "out.tar",
        ]);
        assert!(!cli.archive.sorted);
        assert!(cli.archive.no_sorted);
        assert!(cli.archive.no_clobber);
        assert!(!cli.archive.clobber);
    }

    #[test]
    fn test_exit_code_mapping() {
        use anyhow::Context;

        let mismatch: anyhow::Result<()> = Err(ArcsumError::ChecksumMismatch {
            path: "a.txt".into(),
        }
        .into());
        let wrapped = mismatch.context("Verification of out.tar failed").unwrap_err();
        assert_eq!(exit_code(&wrapped), EXIT_VERIFICATION_FAILED);

        let not_found: anyhow::Error = ArcsumError::NotFound {
            path: "missing".into(),
        }
        .into();
        assert_eq!(exit_code(&not_found), EXIT_FAILURE);
        assert_eq!(exit_code(&anyhow::anyhow!("disk full")), EXIT_FAILURE);
    }

    #[test]
    fn test_main_help_flag() {
        arcsum_cmd().arg("--help").assert().success();
    }

    #[test]
    fn test_main_version_flag() {
        arcsum_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}
