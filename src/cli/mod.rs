//! CLI commands and argument handling.
//!
//! This module contains the clap CLI definitions and dispatches to the
//! command implementations in [`commands`].

pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use crate::config::{RailyardConfig, CONFIG_ENV};
use crate::logger;
use crate::prompt::{PromptError, Prompter};

use commands::completions::{completions, CompletionsCommandError};
use commands::init::{init_config, InitCommandError};
use commands::new::{new_project, NewCommandError, NewOptions};
use commands::templates::list_templates;

/// Scaffold new projects from templates.
///
/// Pick a name and a template, and railyard fetches it, resolves name
/// clashes, and optionally sets up git. A train keeps you company while
/// it works.
#[derive(Parser, Debug)]
#[command(name = "railyard")]
#[command(author, version = crate::VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file (default: .railyard.json).
    #[arg(long, global = true, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Print debug logging to stderr.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Command to run. Without one, `new` runs interactively.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands for railyard.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new project (default when no command is given).
    ///
    /// Prompts for anything not given on the command line.
    ///
    /// Examples:
    ///   railyard new                        # Fully interactive
    ///   railyard new my-app -t cargo-bin    # Named project from a template
    ///   railyard new api -t foo/bar#main    # Any GitHub repository
    New(NewCommand),

    /// List available templates.
    Templates(TemplatesCommand),

    /// Write a starter .railyard.json with the default settings.
    Init(InitCommand),

    /// Generate shell completions.
    Completions(CompletionsCommand),
}

/// Arguments for the 'new' command.
#[derive(Args, Debug, Default)]
pub struct NewCommand {
    /// Project directory name.
    pub name: Option<String>,

    /// Template value from `railyard templates`, or owner/repo[/subdir][#ref].
    #[arg(short = 't', long)]
    pub template: Option<String>,

    /// Initialise a git repository without asking.
    #[arg(long, conflicts_with = "no_git")]
    pub git: bool,

    /// Skip git initialisation.
    #[arg(long)]
    pub no_git: bool,

    /// Overwrite an existing directory without asking.
    #[arg(short = 'f', long)]
    pub force: bool,
}

/// Arguments for the 'templates' command.
#[derive(Args, Debug)]
pub struct TemplatesCommand {}

/// Arguments for the 'init' command.
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long)]
    pub force: bool,
}

/// Arguments for the 'completions' command.
#[derive(Args, Debug)]
pub struct CompletionsCommand {
    /// Shell to generate completions for.
    #[arg(value_parser = ["bash", "zsh", "fish"])]
    pub shell: String,
}

/// Result of running a command.
pub type CliResult = Result<ExitCode, CliError>;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The config file could not be loaded.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    /// The new-project flow failed.
    #[error(transparent)]
    New(#[from] NewCommandError),
    /// Writing the starter config failed.
    #[error(transparent)]
    Init(#[from] InitCommandError),
    /// Completion generation failed.
    #[error(transparent)]
    Completions(#[from] CompletionsCommandError),
}

impl CliError {
    fn is_cancelled(&self) -> bool {
        matches!(
            self,
            CliError::New(NewCommandError::Prompt(PromptError::Cancelled))
        )
    }
}

impl NewCommand {
    fn git_choice(&self) -> Option<bool> {
        match (self.git, self.no_git) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Execute the new command.
    pub async fn execute(&self, config: RailyardConfig) -> CliResult {
        let options = NewOptions {
            name: self.name.clone(),
            template: self.template.clone(),
            git: self.git_choice(),
            force: self.force,
            base: PathBuf::from("."),
            config,
        };

        let mut prompter = Prompter::stdio();
        new_project(&options, &mut prompter).await?;
        Ok(ExitCode::SUCCESS)
    }
}

/// Run the parsed command line.
///
/// `init` runs before the config is loaded, since its job is to create it.
pub async fn execute(cli: Cli) -> CliResult {
    if let Some(Commands::Init(c)) = &cli.command {
        init_config(cli.config.as_deref(), c.force)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = RailyardConfig::load(cli.config.as_deref())?;

    match cli.command {
        None => NewCommand::default().execute(config).await,
        Some(Commands::New(c)) => c.execute(config).await,
        Some(Commands::Templates(_)) => {
            list_templates(&config);
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Init(_)) => Ok(ExitCode::SUCCESS),
        Some(Commands::Completions(c)) => {
            completions(&c.shell)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Report a command result and turn it into a process exit code.
pub fn handle_result(result: CliResult) -> ExitCode {
    match result {
        Ok(code) => code,
        Err(e) if e.is_cancelled() => {
            eprintln!("\x1b[33mCancelled.\x1b[0m");
            ExitCode::FAILURE
        }
        Err(e) => {
            logger::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_new_with_flags() {
        let cli = Cli::parse_from([
            "railyard", "new", "app", "-t", "cargo-bin", "--no-git", "-f",
        ]);
        match cli.command {
            Some(Commands::New(c)) => {
                assert_eq!(c.name.as_deref(), Some("app"));
                assert_eq!(c.template.as_deref(), Some("cargo-bin"));
                assert_eq!(c.git_choice(), Some(false));
                assert!(c.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_git_flags_conflict() {
        let result = Cli::try_parse_from(["railyard", "new", "--git", "--no-git"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_git_choice_defaults_to_none() {
        assert_eq!(NewCommand::default().git_choice(), None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "railyard",
            "templates",
            "--verbose",
            "--config",
            "x.json",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.json")));
    }

    #[test]
    fn test_parse_init_force() {
        let cli = Cli::parse_from(["railyard", "init", "--force"]);
        assert!(matches!(cli.command, Some(Commands::Init(InitCommand { force: true }))));
    }

    #[tokio::test]
    async fn test_init_ignores_broken_existing_config() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let cli = Cli::parse_from(["railyard", "init", "-f", "--config", path.to_str().unwrap()]);
        execute(cli).await.unwrap();

        assert_eq!(RailyardConfig::load(Some(&path)).unwrap(), RailyardConfig::default());
    }

    #[test]
    fn test_cancelled_is_detected() {
        let err = CliError::New(NewCommandError::Prompt(PromptError::Cancelled));
        assert!(err.is_cancelled());
        assert_eq!(
            format!("{:?}", handle_result(Err(err))),
            format!("{:?}", ExitCode::FAILURE)
        );
    }
}
