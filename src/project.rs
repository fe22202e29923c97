//! Project names and target directories.
//!
//! Names are validated, checked against the filesystem, and given a numeric
//! suffix when the user wants to keep both the old and the new directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid project name regex"));

/// Outcome of resolving a project name against existing directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveResult {
    /// Name of the directory to create.
    pub project_name: String,
    /// Whether an existing directory of that name should be replaced.
    pub should_overwrite: bool,
}

impl ResolveResult {
    /// A name that can be used as-is.
    pub fn fresh(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            should_overwrite: false,
        }
    }

    /// A name whose existing directory will be replaced.
    pub fn overwrite(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            should_overwrite: true,
        }
    }
}

/// Error type for project name handling.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// The name failed validation.
    #[error("{0}")]
    InvalidName(&'static str),
    /// Filesystem error while removing a directory.
    #[error("Failed to remove directory {path}: {source}")]
    RemoveFailed {
        /// Directory being removed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
}

/// Validate a project name.
///
/// Names must be non-empty and contain only letters, numbers, hyphens and
/// underscores.
pub fn validate_project_name(name: &str) -> Result<(), ProjectError> {
    if name.trim().is_empty() {
        return Err(ProjectError::InvalidName("Project name cannot be empty"));
    }
    if !NAME_PATTERN.is_match(name) {
        return Err(ProjectError::InvalidName(
            "Project name can only contain letters, numbers, hyphens and underscores",
        ));
    }
    Ok(())
}

/// Path of the project directory under `base`.
pub fn project_path(base: &Path, name: &str) -> PathBuf {
    base.join(name)
}

/// Whether anything already exists at the project path.
pub fn directory_exists(base: &Path, name: &str) -> bool {
    project_path(base, name).exists()
}

/// First free name of the form `name-1`, `name-2`, ...
pub fn generate_unique_name(base: &Path, name: &str) -> String {
    (1u32..)
        .map(|counter| format!("{name}-{counter}"))
        .find(|candidate| !directory_exists(base, candidate))
        .unwrap_or_else(|| format!("{name}-new"))
}

/// Remove the project directory and everything in it.
///
/// Missing directories are not an error.
pub fn remove_directory(base: &Path, name: &str) -> Result<(), ProjectError> {
    let path = project_path(base, name);
    let result = if path.is_dir() {
        fs::remove_dir_all(&path)
    } else {
        fs::remove_file(&path)
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ProjectError::RemoveFailed { path, source }),
    }
}
