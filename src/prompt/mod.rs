//! Interactive prompts for the new-project flow.
//!
//! [`Prompter`] reads answers line by line from any `BufRead` and writes
//! questions to any `Write`, so the same flows run against stdin/stdout and
//! against in-memory buffers in tests.

use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::path::Path;

use crate::project::{
    directory_exists, generate_unique_name, validate_project_name, ResolveResult,
};
use crate::templates::Template;

/// Width the template names are padded to in the selection list.
const NAME_COLUMN: usize = 20;

/// Error type for prompt operations.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// Input ended before an answer was given.
    #[error("Prompt cancelled")]
    Cancelled,
    /// Reading or writing the terminal failed.
    #[error("Prompt I/O failed: {0}")]
    Io(#[from] io::Error),
    /// There was nothing to choose from.
    #[error("No templates available")]
    NoTemplates,
}

/// What to do when the project directory already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictAction {
    /// Ask for a different name.
    Custom,
    /// Replace the existing directory.
    Overwrite,
    /// Use the suggested free name.
    Rename(String),
}

/// Line-based question and answer over a reader and a writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    /// Prompter on the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Create a prompter from an input and an output.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompter, returning the output writer.
    pub fn into_output(self) -> W {
        self.output
    }

    fn question(&mut self, text: &str) -> io::Result<()> {
        write!(self.output, "\x1b[32m?\x1b[0m \x1b[1m{text}\x1b[0m")
    }

    fn read_answer(&mut self) -> Result<String, PromptError> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Cancelled);
        }
        Ok(line.trim().to_string())
    }

    fn error_line(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "\x1b[31m>>\x1b[0m {message}")
    }

    /// Ask a free-text question. An empty answer yields the default, if any.
    pub fn input(&mut self, text: &str, default: Option<&str>) -> Result<String, PromptError> {
        self.question(text)?;
        if let Some(default) = default {
            write!(self.output, " \x1b[2m({default})\x1b[0m")?;
        }
        write!(self.output, " ")?;

        let answer = self.read_answer()?;
        match default {
            Some(default) if answer.is_empty() => Ok(default.to_string()),
            _ => Ok(answer),
        }
    }

    /// Ask a yes/no question.
    pub fn confirm(&mut self, text: &str, default: bool) -> Result<bool, PromptError> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            self.question(text)?;
            write!(self.output, " {hint} ")?;
            let answer = self.read_answer()?.to_lowercase();
            match answer.as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.error_line("Please answer y or n")?,
            }
        }
    }

    /// Pick one of several numbered choices, returning its index.
    ///
    /// Lines in `separators` are printed before the choice at the same
    /// index and are not selectable.
    fn select(
        &mut self,
        text: &str,
        choices: &[String],
        separators: &[(usize, String)],
    ) -> Result<usize, PromptError> {
        self.question(text)?;
        writeln!(self.output)?;
        for (i, choice) in choices.iter().enumerate() {
            for (_, separator) in separators.iter().filter(|(at, _)| *at == i) {
                writeln!(self.output, "  \x1b[2m{separator}\x1b[0m")?;
            }
            writeln!(self.output, "  \x1b[36m{}\x1b[0m. {choice}", i + 1)?;
        }

        loop {
            write!(self.output, "Choice [1-{}, default=1]: ", choices.len())?;
            let answer = self.read_answer()?;
            if answer.is_empty() {
                return Ok(0);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => return Ok(n - 1),
                _ => self.error_line("Invalid selection.")?,
            }
        }
    }

    fn valid_name(&mut self, text: &str, default: Option<&str>) -> Result<String, PromptError> {
        loop {
            let name = self.input(text, default)?;
            match validate_project_name(&name) {
                Ok(()) => return Ok(name),
                Err(e) => self.error_line(&e.to_string())?,
            }
        }
    }

    /// Ask for the project name, re-asking until it is valid.
    pub fn project_name(&mut self, default: &str) -> Result<String, PromptError> {
        self.valid_name("Enter project name:", Some(default))
    }

    /// Ask for a replacement name after a conflict. No default is offered.
    pub fn custom_project_name(&mut self) -> Result<String, PromptError> {
        self.valid_name("Enter a new project name:", None)
    }

    /// Ask which template to use.
    ///
    /// Git templates are listed first, then a separator, then generators.
    pub fn template<'a>(
        &mut self,
        templates: &'a [Template],
    ) -> Result<&'a Template, PromptError> {
        let ordered: Vec<&Template> = templates
            .iter()
            .filter(|t| t.is_git())
            .chain(templates.iter().filter(|t| !t.is_git()))
            .collect();
        if ordered.is_empty() {
            return Err(PromptError::NoTemplates);
        }

        let choices: Vec<String> = ordered
            .iter()
            .map(|t| format!("{:<width$} - {}", t.name, t.description, width = NAME_COLUMN))
            .collect();

        let git_count = ordered.iter().filter(|t| t.is_git()).count();
        let separators = if git_count > 0 && git_count < ordered.len() {
            vec![(git_count, "─".repeat(50))]
        } else {
            Vec::new()
        };

        let index = self.select("Select a project template:", &choices, &separators)?;
        Ok(ordered[index])
    }

    /// Ask what to do about an existing directory.
    pub fn conflict_action(
        &mut self,
        base: &Path,
        name: &str,
    ) -> Result<ConflictAction, PromptError> {
        let suggested = generate_unique_name(base, name);
        let choices = vec![
            "Enter a custom name".to_string(),
            "Overwrite existing directory".to_string(),
            format!("Rename to \"{suggested}\""),
        ];

        let question = format!("Directory \"{name}\" already exists. What would you like to do?");
        Ok(match self.select(&question, &choices, &[])? {
            0 => ConflictAction::Custom,
            1 => ConflictAction::Overwrite,
            _ => ConflictAction::Rename(suggested),
        })
    }

    /// Resolve a conflict on an existing directory.
    ///
    /// Custom names are checked again, so this keeps asking until the user
    /// picks a free name, overwrites, or accepts the suggested rename.
    pub fn conflict_resolution(
        &mut self,
        base: &Path,
        name: &str,
    ) -> Result<ResolveResult, PromptError> {
        let mut name = name.to_string();
        loop {
            match self.conflict_action(base, &name)? {
                ConflictAction::Overwrite => return Ok(ResolveResult::overwrite(name)),
                ConflictAction::Rename(suggested) => return Ok(ResolveResult::fresh(suggested)),
                ConflictAction::Custom => {
                    name = self.custom_project_name()?;
                    if !directory_exists(base, &name) {
                        return Ok(ResolveResult::fresh(name));
                    }
                }
            }
        }
    }

    /// Resolve a name against `base`, prompting only if it is taken.
    pub fn resolve_project_name(
        &mut self,
        base: &Path,
        name: &str,
    ) -> Result<ResolveResult, PromptError> {
        if !directory_exists(base, name) {
            return Ok(ResolveResult::fresh(name));
        }
        self.conflict_resolution(base, name)
    }
}
