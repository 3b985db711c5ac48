//! # Arcsum Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks of the archive pipeline, kept separate from the
//! command layer (`commands::`) and core infrastructure (`core::`).
//!
//! ## Architecture
//!
//! - **`archive`**: The uncompressed tar container (write and extract).
//! - **`digest`**: Streaming SHA-256 of file contents.
//! - **`fs`**: Directory creation, path resolution and regular-file traversal.
//! - **`manifest`**: Writing and parsing `<path> <digest>` checksum manifests.
//! - **`system`**: Background sampling of process memory and CPU usage.
//!

/// Uncompressed tar archive creation and extraction.
pub mod archive;
/// Chunked SHA-256 file digests.
pub mod digest;
/// Filesystem helpers and directory traversal.
pub mod fs;
/// Checksum manifest writer and reader.
pub mod manifest;
/// Process resource sampling.
pub mod system;
