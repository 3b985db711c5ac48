//! # Arcsum Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout arcsum. Every failure
//! during archiving is fatal and propagates to `main`, which prints it and exits
//! with status 1. Verification mismatches are *not* errors: the verifier returns
//! them as a `VerificationOutcome` so the command layer can report them cleanly.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `ArcsumError`: A custom error enum using `thiserror` for the specific failure kinds
//! - `Result<T>`: A type alias for `anyhow::Result<T>` so callers can attach context
//!
//! ## Examples
//!
//! ```rust,ignore
//! if !path.exists() {
//!     return Err(ArcsumError::NotFound { path: path.to_path_buf() })?;
//! }
//!
//! let file = File::open(&path)
//!     .with_context(|| format!("Failed to open file: {}", path.display()))?;
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for arcsum.
#[derive(Error, Debug)]
pub enum ArcsumError {
    #[error("Path not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Path exists but is not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("Refusing to overwrite existing archive: {}", .path.display())]
    AlreadyExists { path: PathBuf },

    #[error("File name is not valid UTF-8: {}", .path.display())]
    NonUtf8Path { path: PathBuf },

    #[error("I/O failure: {0}")]
    Io(String),

    #[error("Malformed manifest line {line_number}: '{line}' (expected '<path> <digest>')")]
    MalformedManifestLine { line_number: usize, line: String },

    #[error("Manifest path '{path}' points outside the archive")]
    UnsafeManifestPath { path: String },

    #[error("Checksum mismatch in '{path}'")]
    ChecksumMismatch { path: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Result using anyhow::Error for context-carrying propagation.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let not_found = ArcsumError::NotFound {
            path: PathBuf::from("/tmp/missing"),
        };
        assert_eq!(not_found.to_string(), "Path not found: /tmp/missing");

        let malformed = ArcsumError::MalformedManifestLine {
            line_number: 3,
            line: "only-one-field".into(),
        };
        assert_eq!(
            malformed.to_string(),
            "Malformed manifest line 3: 'only-one-field' (expected '<path> <digest>')"
        );

        let mismatch = ArcsumError::ChecksumMismatch {
            path: "sub/b.txt".into(),
        };
        assert_eq!(mismatch.to_string(), "Checksum mismatch in 'sub/b.txt'");

        let escape = ArcsumError::UnsafeManifestPath {
            path: "../etc/passwd".into(),
        };
        assert_eq!(
            escape.to_string(),
            "Manifest path '../etc/passwd' points outside the archive"
        );
    }

    #[test]
    fn test_error_downcast_through_anyhow() {
        let err: anyhow::Error = ArcsumError::AlreadyExists {
            path: PathBuf::from("out.tar"),
        }
        .into();
        let err = err.context("Archiving failed");
        assert!(matches!(
            err.downcast_ref::<ArcsumError>(),
            Some(ArcsumError::AlreadyExists { .. })
        ));
    }
}
