//! New command implementation.
//!
//! This module implements `railyard new`: pick a name and a template,
//! resolve clashes with existing directories, run the template, and
//! optionally set up git. All questions are asked up front so the
//! long-running steps can animate without interruption.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::actions::{clone_repo, init_git, run_generator, CloneError, GeneratorError};
use crate::config::{GitInit, RailyardConfig};
use crate::git;
use crate::logger;
use crate::project::{
    directory_exists, project_path, remove_directory, validate_project_name, ProjectError,
    ResolveResult,
};
use crate::prompt::{PromptError, Prompter};
use crate::templates::{
    catalog, resolve_template, Template, TemplateError, TemplateKind, TemplateSource,
};

/// Result type for new command operations.
pub type NewCommandResult = Result<PathBuf, NewCommandError>;

/// Error type for new command operations.
#[derive(Debug, thiserror::Error)]
pub enum NewCommandError {
    /// A prompt failed or was cancelled.
    #[error(transparent)]
    Prompt(#[from] PromptError),
    /// The project name was invalid or the old directory could not be removed.
    #[error(transparent)]
    Project(#[from] ProjectError),
    /// The template could not be found or parsed.
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// Cloning the template failed.
    #[error(transparent)]
    Clone(#[from] CloneError),
    /// The generator command failed.
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

/// Inputs for the new-project flow.
#[derive(Debug, Clone, Default)]
pub struct NewOptions {
    /// Project name from the command line.
    pub name: Option<String>,
    /// Template value or repository spec from the command line.
    pub template: Option<String>,
    /// Explicit git choice (`--git` / `--no-git`).
    pub git: Option<bool>,
    /// Overwrite an existing directory without asking.
    pub force: bool,
    /// Directory the project is created in.
    pub base: PathBuf,
    /// Loaded configuration.
    pub config: RailyardConfig,
}

fn resolve_name<R: BufRead, W: Write>(
    options: &NewOptions,
    prompter: &mut Prompter<R, W>,
) -> Result<ResolveResult, NewCommandError> {
    let name = match &options.name {
        Some(name) => {
            validate_project_name(name)?;
            name.clone()
        }
        None => prompter.project_name(&options.config.default_project_name)?,
    };

    if options.force && directory_exists(&options.base, &name) {
        return Ok(ResolveResult::overwrite(name));
    }
    Ok(prompter.resolve_project_name(&options.base, &name)?)
}

fn choose_template<R: BufRead, W: Write>(
    options: &NewOptions,
    prompter: &mut Prompter<R, W>,
) -> Result<Template, NewCommandError> {
    let templates = catalog(&options.config.templates);
    match &options.template {
        Some(value) => Ok(resolve_template(&templates, value)?),
        None => Ok(prompter.template(&templates)?.clone()),
    }
}

fn choose_git<R: BufRead, W: Write>(
    options: &NewOptions,
    prompter: &mut Prompter<R, W>,
) -> Result<bool, NewCommandError> {
    if let Some(choice) = options.git {
        return Ok(choice);
    }
    match options.config.git_init {
        GitInit::Always => Ok(true),
        GitInit::Never => Ok(false),
        GitInit::Ask => Ok(prompter.confirm("Initialize a git repository?", true)?),
    }
}

async fn materialise(
    template: &Template,
    name: &str,
    base: &Path,
) -> Result<(), NewCommandError> {
    match &template.kind {
        TemplateKind::Git { repo } => {
            let source = TemplateSource::parse(repo)?;
            clone_repo(&source, &project_path(base, name)).await?;
        }
        TemplateKind::Generator { command, args } => {
            run_generator(command, args, name, base).await?;
        }
    }
    Ok(())
}

async fn setup_git(target: &Path) {
    if !git::git_available() {
        logger::warn("git not found on PATH, skipping repository setup");
        return;
    }
    if let Err(e) = init_git(target).await {
        logger::warn(&format!("Git setup failed: {e}"));
    }
}

/// Run the new-project flow, returning the created project's path.
pub async fn new_project<R: BufRead, W: Write>(
    options: &NewOptions,
    prompter: &mut Prompter<R, W>,
) -> NewCommandResult {
    let resolved = resolve_name(options, prompter)?;
    let template = choose_template(options, prompter)?;
    let use_git = choose_git(options, prompter)?;

    let name = resolved.project_name.as_str();
    tracing::debug!(
        project = name,
        template = %template.value,
        overwrite = resolved.should_overwrite,
        use_git,
        "creating project"
    );

    if resolved.should_overwrite {
        remove_directory(&options.base, name)?;
    }

    materialise(&template, name, &options.base).await?;

    let target = project_path(&options.base, name);
    if use_git {
        setup_git(&target).await;
    }

    println!();
    logger::success(&format!("Project {name} is ready!"));
    logger::hint(&format!("Next: cd {name}"));

    Ok(target)
}
