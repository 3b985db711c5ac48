//! # Arcsum Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! Container-format handling for arcsum. Archives are uncompressed tar files;
//! the `tar` submodule writes them from a list of walked files and unpacks them
//! for verification.
//!
//! ```rust,ignore
//! use crate::common::archive::tar;
//!
//! let stats = tar::write_tar_archive(&files, Path::new("out/backup.tar"), true)?;
//! tar::extract_tar_archive(Path::new("out/backup.tar"), scratch.path())?;
//! ```
//!

pub mod tar;
