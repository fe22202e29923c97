//! Git operations.
//!
//! This module initialises a repository in a freshly scaffolded project and
//! records the initial commit.

use std::path::Path;
use std::process::{Command as StdCommand, Stdio};

use tokio::process::Command;

/// Error type for git operations.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    /// The git executable could not be started.
    #[error("Failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
    /// git ran but reported failure.
    #[error("git {args} failed: {stderr}")]
    CommandFailed {
        /// Arguments passed to git.
        args: String,
        /// Trimmed stderr output.
        stderr: String,
    },
}

/// Identity used for the initial commit when the user has none configured.
const FALLBACK_IDENTITY: [&str; 4] = [
    "-c",
    "user.name=railyard",
    "-c",
    "user.email=railyard@localhost",
];

/// Check whether git is installed and runnable.
pub fn git_available() -> bool {
    StdCommand::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Check if a directory is already the root of a git repository.
pub fn is_git_repo(dir: &Path) -> bool {
    dir.join(".git").exists()
}

async fn run_git(dir: &Path, args: &[&str]) -> Result<(), GitError> {
    tracing::debug!(dir = %dir.display(), ?args, "running git");
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .await?;

    if output.status.success() {
        Ok(())
    } else {
        Err(GitError::CommandFailed {
            args: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Create an empty repository.
pub async fn init(dir: &Path) -> Result<(), GitError> {
    run_git(dir, &["init", "--quiet"]).await
}

/// Stage all files.
pub async fn stage_all(dir: &Path) -> Result<(), GitError> {
    run_git(dir, &["add", "-A"]).await
}

/// Whether `user.name` and `user.email` resolve for a repository.
pub async fn has_identity(dir: &Path) -> bool {
    for key in ["user.name", "user.email"] {
        if run_git(dir, &["config", key]).await.is_err() {
            return false;
        }
    }
    true
}

fn commit_args(message: &str, has_identity: bool) -> Vec<&str> {
    let mut args = Vec::with_capacity(8);
    if !has_identity {
        args.extend(FALLBACK_IDENTITY);
    }
    args.extend(["commit", "--quiet", "-m", message]);
    args
}

/// Commit staged changes with a message.
///
/// Without a configured identity the commit is attributed to railyard, so a
/// fresh machine still gets its initial commit.
pub async fn commit(dir: &Path, message: &str) -> Result<(), GitError> {
    let identity = has_identity(dir).await;
    if !identity {
        tracing::debug!("no git identity configured, using fallback");
    }
    run_git(dir, &commit_args(message, identity)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_git_repo() {
        let temp = TempDir::new().unwrap();
        assert!(!is_git_repo(temp.path()));
        fs::create_dir(temp.path().join(".git")).unwrap();
        assert!(is_git_repo(temp.path()));
    }

    #[tokio::test]
    async fn test_init_creates_repository() {
        if !git_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        init(temp.path()).await.unwrap();
        assert!(is_git_repo(temp.path()));
    }

    #[test]
    fn test_commit_args_add_identity_only_when_missing() {
        assert_eq!(
            commit_args("Initial commit", true),
            vec!["commit", "--quiet", "-m", "Initial commit"]
        );

        let args = commit_args("Initial commit", false);
        assert_eq!(&args[..4], &FALLBACK_IDENTITY);
        assert_eq!(&args[4..], &["commit", "--quiet", "-m", "Initial commit"]);
    }

    #[tokio::test]
    async fn test_commit_in_fresh_repository() {
        if !git_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "hi").unwrap();
        init(temp.path()).await.unwrap();
        stage_all(temp.path()).await.unwrap();
        commit(temp.path(), "Initial commit").await.unwrap();

        run_git(temp.path(), &["rev-parse", "--verify", "HEAD"])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_commit_with_nothing_staged_fails() {
        if !git_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        init(temp.path()).await.unwrap();
        let err = commit(temp.path(), "empty").await.unwrap_err();
        assert!(matches!(err, GitError::CommandFailed { .. }));
    }

    #[test]
    fn test_git_error_display() {
        let err = GitError::CommandFailed {
            args: "commit -m x".to_string(),
            stderr: "nothing to commit".to_string(),
        };
        assert_eq!(err.to_string(), "git commit -m x failed: nothing to commit");
    }
}
