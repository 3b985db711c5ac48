//! # Arcsum Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads, merges, and validates the optional TOML configuration for
//! arcsum. Configuration only tunes behaviour that the command line can also set:
//! traversal ordering, overwrite policy for an existing archive, and the CPU
//! sampling window of the resource monitor.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags (applied by the command layer after loading)
//! 2. Project-specific `.arcsum.toml` in the current directory or ancestors
//! 3. User-specific `config.toml` in the platform config directory
//! 4. Default values defined in the code
//!
//! The project search walks upward from the current directory and stops at the
//! first directory containing a `.git` folder.
//!
//! ## Examples
//!
//! ```toml
//! [archive]
//! sort_entries = true
//! overwrite = false
//!
//! [monitor]
//! sample_window_ms = 250
//! ```
//!
use crate::core::error::{ArcsumError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info, warn};

/// Effective configuration after every source has been applied.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub archive: ArchiveConfig,
    pub monitor: MonitorConfig,
}

/// Settings for the archive and manifest traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Sort directory entries by file name instead of filesystem order.
    pub sort_entries: bool,
    /// Replace an archive that already exists at the output path.
    pub overwrite: bool,
}

/// Settings for the background resource sampler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Window over which each CPU utilisation sample is averaged, in milliseconds.
    pub sample_window_ms: u64,
}

/// One configuration file as written on disk. Keys the file leaves out stay
/// `None` so they do not mask values from a lower-precedence source.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub archive: ArchiveSection,
    #[serde(default)]
    pub monitor: MonitorSection,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ArchiveSection {
    pub sort_entries: Option<bool>,
    pub overwrite: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    pub sample_window_ms: Option<u64>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            sort_entries: false,
            overwrite: default_overwrite(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sample_window_ms: default_sample_window_ms(),
        }
    }
}

impl MonitorConfig {
    pub fn sample_window(&self) -> Duration {
        Duration::from_millis(self.sample_window_ms)
    }
}

impl Config {
    /// Overwrites every value that `file` sets explicitly.
    pub fn apply(&mut self, file: &ConfigFile) {
        if let Some(sort_entries) = file.archive.sort_entries {
            self.archive.sort_entries = sort_entries;
        }
        if let Some(overwrite) = file.archive.overwrite {
            self.archive.overwrite = overwrite;
        }
        if let Some(window) = file.monitor.sample_window_ms {
            self.monitor.sample_window_ms = window;
        }
    }
}

fn default_overwrite() -> bool {
    true
}
fn default_sample_window_ms() -> u64 {
    100
}

const PROJECT_CONFIG_FILENAME: &str = ".arcsum.toml";
const MIN_SAMPLE_WINDOW_MS: u64 = 10;
const MAX_SAMPLE_WINDOW_MS: u64 = 10_000;

/// Loads the merged user and project configuration and validates it.
pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let merged_config = merge_configs(user_config, project_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<ConfigFile>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Arcsum", "arcsum") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigFile>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.arcsum.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Layers the user and project files over the defaults; the project file wins
/// for every key it sets.
fn merge_configs(user: Option<ConfigFile>, project: Option<ConfigFile>) -> Config {
    let mut merged = Config::default();
    for layer in [user, project].iter().flatten() {
        merged.apply(layer);
    }
    merged
}

pub fn validate_config(config: &Config) -> Result<()> {
    let window = config.monitor.sample_window_ms;
    if !(MIN_SAMPLE_WINDOW_MS..=MAX_SAMPLE_WINDOW_MS).contains(&window) {
        return Err(anyhow!(ArcsumError::Config(format!(
            "monitor.sample_window_ms must be between {} and {} (got {}).",
            MIN_SAMPLE_WINDOW_MS, MAX_SAMPLE_WINDOW_MS, window
        ))));
    }
    Ok(())
}
