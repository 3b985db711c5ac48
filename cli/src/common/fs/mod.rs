//! # Arcsum Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers shared by the archiver, the manifest writer and the
//! verifier:
//!
//! - **`io`**: directory creation and input/output path resolution.
//! - **`walk`**: recursive enumeration of regular files below a root as `FileEntry` values.
//!
//! Callers import the specific submodule, e.g. `crate::common::fs::walk::walk_files`.
//!

/// Directory creation and path resolution (`ensure_dir_exists`, `resolve_input_dir`).
pub mod io;
/// Regular-file traversal (`walk_files`, `FileEntry`).
pub mod walk;
