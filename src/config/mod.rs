//! Configuration models for `.railyard.json`.
//!
//! The config file is optional. It can add templates to the built-in
//! catalog and set defaults for the new-project flow.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::templates::Template;

/// Default config file path, relative to the working directory.
pub const CONFIG_FILE: &str = ".railyard.json";

/// Environment variable that overrides the config path.
pub const CONFIG_ENV: &str = "RAILYARD_CONFIG";

/// When to initialise a git repository in the new project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitInit {
    /// Ask the user (default).
    #[default]
    Ask,
    /// Always initialise.
    Always,
    /// Never initialise.
    Never,
}

/// Main railyard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RailyardConfig {
    /// Extra templates, appended to (or overriding) the built-in ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<Template>,
    /// Git initialisation policy.
    #[serde(default)]
    pub git_init: GitInit,
    /// Name offered when prompting for a project name.
    #[serde(default = "default_project_name")]
    pub default_project_name: String,
}

fn default_project_name() -> String {
    "my-project".to_string()
}

impl Default for RailyardConfig {
    fn default() -> Self {
        Self {
            templates: Vec::new(),
            git_init: GitInit::default(),
            default_project_name: default_project_name(),
        }
    }
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading or writing the config file.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Error parsing the config file JSON.
    #[error("Failed to parse config JSON: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl RailyardConfig {
    /// Load configuration from a file, or return defaults if it doesn't exist.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the config file. Defaults to `.railyard.json` if None.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)?;
        let config: RailyardConfig = serde_json::from_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            templates = config.templates.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Save configuration to a file.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, path: Option<&Path>) -> Result<(), ConfigError> {
        let path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        Ok(())
    }
}
