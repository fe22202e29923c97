//! Generator templates: tools that create the project themselves.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::feedback::TrainAnimation;

/// Error type for generator commands.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The command could not be started.
    #[error("Failed to run {command}: {source}")]
    Spawn {
        /// Program that failed to start.
        command: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The command exited unsuccessfully.
    #[error("{command} exited with {status}: {stderr}")]
    Failed {
        /// Program that failed.
        command: String,
        /// Exit status description.
        status: String,
        /// Trimmed stderr output.
        stderr: String,
    },
}

/// Run `command args... project_name` in `base`, showing the train.
pub async fn run_generator(
    command: &str,
    args: &[String],
    project_name: &str,
    base: &Path,
) -> Result<(), GeneratorError> {
    let train = TrainAnimation::new(format!("Running {command}..."));
    train.start();

    match generate(command, args, project_name, base).await {
        Ok(()) => {
            train.stop(true, &format!("Project generated with {command}!"));
            Ok(())
        }
        Err(e) => {
            train.stop(false, &format!("Failed to run {command}"));
            tracing::debug!(error = %e, "generator failed");
            Err(e)
        }
    }
}

async fn generate(
    command: &str,
    args: &[String],
    project_name: &str,
    base: &Path,
) -> Result<(), GeneratorError> {
    tracing::debug!(command, ?args, project_name, "running generator");
    let output = Command::new(command)
        .args(args)
        .arg(project_name)
        .current_dir(base)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| GeneratorError::Spawn {
            command: command.to_string(),
            source,
        })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(GeneratorError::Failed {
            command: command.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
