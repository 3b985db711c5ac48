//! # Arcsum System Utilities Module (`common::system`)
//!
//! File: cli/src/common/system/mod.rs
//!
//! ## Overview
//!
//! Host and process inspection. Currently this holds the resource sampler that
//! records peak memory and CPU usage while an archive is written.
//!
//! ```rust,ignore
//! use crate::common::system::monitor::ResourceSampler;
//!
//! let sampler = ResourceSampler::start(Duration::from_millis(100));
//! // ... blocking work ...
//! let usage = sampler.stop().await;
//! println!("{:.2} MiB", usage.peak_memory_mib());
//! ```
//!

/// Background sampling of process memory and CPU usage.
pub mod monitor;
