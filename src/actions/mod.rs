//! Long-running scaffolding steps.
//!
//! Each step runs under its own [`TrainAnimation`](crate::feedback::TrainAnimation)
//! and always stops it, success or failure, before returning.

mod clone;
mod generator;

use std::path::Path;

pub use clone::{clone_repo, extract_archive, CloneError};
pub use generator::{run_generator, GeneratorError};

use crate::feedback::{Terminal, TrainAnimation};
use crate::git::{self, GitError};
use crate::logger;

/// Message used for the initial commit.
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// Result of [`init_git`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitInitOutcome {
    /// A repository was created with an initial commit.
    Initialized,
    /// The project already had a repository (e.g. from `cargo new`).
    AlreadyInitialized,
}

/// Initialise a git repository in `target` and commit everything in it.
pub async fn init_git(target: &Path) -> Result<GitInitOutcome, GitError> {
    if git::is_git_repo(target) {
        logger::info("Git repository already initialized, skipping");
        return Ok(GitInitOutcome::AlreadyInitialized);
    }

    let train = TrainAnimation::new("Initializing git repository...");
    init_git_with(target, &train).await
}

async fn init_git_with<T: Terminal + 'static>(
    target: &Path,
    train: &TrainAnimation<T>,
) -> Result<GitInitOutcome, GitError> {
    train.start();

    let result = async {
        git::init(target).await?;
        train.update_message("Staging files...");
        git::stage_all(target).await?;
        train.update_message("Creating initial commit...");
        git::commit(target, INITIAL_COMMIT_MESSAGE).await
    }
    .await;

    match result {
        Ok(()) => {
            train.stop(true, "Git repository initialized!");
            Ok(GitInitOutcome::Initialized)
        }
        Err(e) => {
            train.stop(false, "Failed to initialize git repository");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{Phase, RecordingTerminal, TerminalOp};
    use std::fs;
    use tempfile::TempDir;

    fn recorded_train() -> (TrainAnimation<RecordingTerminal>, RecordingTerminal) {
        let recorder = RecordingTerminal::new();
        let train =
            TrainAnimation::with_terminal("Initializing git repository...", recorder.clone(), 80);
        (train, recorder)
    }

    fn final_line(recorder: &RecordingTerminal) -> String {
        recorder.written().last().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_init_git_skips_existing_repository() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();

        let outcome = init_git(temp.path()).await.unwrap();
        assert_eq!(outcome, GitInitOutcome::AlreadyInitialized);
    }

    #[tokio::test]
    async fn test_init_git_commits_project() {
        if !git::git_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Cargo.toml"), "[package]").unwrap();
        let (train, recorder) = recorded_train();

        let outcome = init_git_with(temp.path(), &train).await.unwrap();

        assert_eq!(outcome, GitInitOutcome::Initialized);
        assert!(git::is_git_repo(temp.path()));
        assert_eq!(train.message(), "Creating initial commit...");
        assert_eq!(train.phase(), Phase::Stopped);
        assert_eq!(
            final_line(&recorder),
            "\x1b[32m✔\x1b[0m Git repository initialized!"
        );
        assert!(recorder.ops().contains(&TerminalOp::ShowCursor));
    }

    #[tokio::test]
    async fn test_init_git_failure_stops_train() {
        if !git::git_available() {
            return;
        }
        // Nothing to commit in an empty directory.
        let temp = TempDir::new().unwrap();
        let (train, recorder) = recorded_train();

        let err = init_git_with(temp.path(), &train).await.unwrap_err();

        assert!(matches!(err, GitError::CommandFailed { .. }));
        assert_eq!(train.phase(), Phase::Stopped);
        assert_eq!(
            final_line(&recorder),
            "\x1b[31m✖\x1b[0m Failed to initialize git repository"
        );
        assert!(recorder.ops().contains(&TerminalOp::ShowCursor));
    }
}
