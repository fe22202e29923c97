//! Init command implementation.
//!
//! This module implements `railyard init`, which writes a starter
//! `.railyard.json` holding the default settings so they can be edited.

use std::path::{Path, PathBuf};

use crate::config::{RailyardConfig, CONFIG_FILE};
use crate::logger;

/// Result type for init command operations.
pub type InitCommandResult = Result<PathBuf, InitCommandError>;

/// Error type for init command operations.
#[derive(Debug, thiserror::Error)]
pub enum InitCommandError {
    /// A config file is already present.
    #[error("{0} already exists. Use --force to overwrite.")]
    AlreadyExists(String),
    /// Failed to save the config file.
    #[error("Failed to save config: {0}")]
    SaveConfigError(#[from] crate::config::ConfigError),
}

/// Write a default config to `path` (or `.railyard.json`).
pub fn init_config(path: Option<&Path>, force: bool) -> InitCommandResult {
    let path = path
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

    if path.exists() && !force {
        return Err(InitCommandError::AlreadyExists(path.display().to_string()));
    }

    RailyardConfig::default().save(Some(&path))?;
    tracing::debug!(path = %path.display(), force, "wrote starter config");
    logger::success(&format!("Created {}", path.display()));
    Ok(path)
}
