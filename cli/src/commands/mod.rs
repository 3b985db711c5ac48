//! # Arcsum Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Command handlers invoked from `main.rs`. Each command module defines its own
//! arguments structure and a handler function that implements it.
//!
//! - `archive`: archive a directory, write its manifest, optionally verify
//!

/// Archiving, manifest writing and verification. See `archive::handle_archive`.
pub mod archive;
