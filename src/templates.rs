//! Project templates.
//!
//! A template is either a GitHub repository snapshot (optionally a
//! subdirectory of one, at a given ref) or a generator command that creates
//! the project itself, such as `cargo new`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a template produces the project directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TemplateKind {
    /// Download a repository snapshot, e.g. `owner/repo/sub/dir#main`.
    Git {
        /// Repository spec, parsed by [`TemplateSource::parse`].
        repo: String,
    },
    /// Run a command with the project name appended.
    Generator {
        /// Program to run.
        command: String,
        /// Arguments placed before the project name.
        #[serde(default)]
        args: Vec<String>,
    },
}

/// A selectable project template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Display name.
    pub name: String,
    /// Identifier used on the command line and in config.
    pub value: String,
    /// One-line description.
    pub description: String,
    /// Source of the template.
    #[serde(flatten)]
    pub kind: TemplateKind,
}

impl Template {
    /// Create a git template.
    pub fn git(name: &str, value: &str, description: &str, repo: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            description: description.to_string(),
            kind: TemplateKind::Git {
                repo: repo.to_string(),
            },
        }
    }

    /// Create a generator template.
    pub fn generator(
        name: &str,
        value: &str,
        description: &str,
        command: &str,
        args: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            description: description.to_string(),
            kind: TemplateKind::Generator {
                command: command.to_string(),
                args: args.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    /// Whether this template is fetched from a repository.
    pub fn is_git(&self) -> bool {
        matches!(self.kind, TemplateKind::Git { .. })
    }
}

/// Error type for template lookup and parsing.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// No template has the requested value.
    #[error("Template not found: {0}")]
    NotFound(String),
    /// The repository spec could not be parsed.
    #[error("Invalid template source '{0}': expected owner/repo[/subdir][#ref]")]
    InvalidSource(String),
}

/// Templates shipped with railyard.
pub fn builtin_templates() -> Vec<Template> {
    vec![
        Template::git(
            "Axum hello world",
            "axum-hello",
            "Minimal axum web server",
            "tokio-rs/axum/examples/hello-world",
        ),
        Template::git(
            "Leptos + Trunk",
            "leptos-trunk",
            "Client-side Leptos app built with Trunk",
            "leptos-rs/start-trunk",
        ),
        Template::git(
            "Bevy 2D",
            "bevy-2d",
            "Bevy game template with a 2D setup",
            "TheBevyFlock/bevy_new_2d",
        ),
        Template::generator(
            "Cargo binary",
            "cargo-bin",
            "Empty binary crate via cargo new",
            "cargo",
            &["new", "--bin"],
        ),
        Template::generator(
            "Cargo library",
            "cargo-lib",
            "Empty library crate via cargo new",
            "cargo",
            &["new", "--lib"],
        ),
    ]
}

/// Built-in templates followed by extra ones from config.
///
/// An extra template whose value matches a built-in one replaces it in place.
pub fn catalog(extra: &[Template]) -> Vec<Template> {
    let mut templates = builtin_templates();
    for template in extra {
        match templates.iter_mut().find(|t| t.value == template.value) {
            Some(existing) => *existing = template.clone(),
            None => templates.push(template.clone()),
        }
    }
    templates
}

/// Find a template by value.
pub fn find_template<'a>(
    templates: &'a [Template],
    value: &str,
) -> Result<&'a Template, TemplateError> {
    templates
        .iter()
        .find(|t| t.value == value)
        .ok_or_else(|| TemplateError::NotFound(value.to_string()))
}

/// Find a template by value, or treat the value as a repository spec.
///
/// Lets `--template owner/repo` work without a config entry.
pub fn resolve_template(templates: &[Template], value: &str) -> Result<Template, TemplateError> {
    match find_template(templates, value) {
        Ok(template) => Ok(template.clone()),
        Err(_) if value.contains('/') => {
            let source = TemplateSource::parse(value)?;
            let label = source.to_string();
            Ok(Template::git(&label, value, "Repository template", value))
        }
        Err(not_found) => Err(not_found),
    }
}

/// A parsed GitHub repository location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Subdirectory to extract, if any.
    pub subdir: Option<String>,
    /// Branch, tag or commit. Default branch when `None`.
    pub reference: Option<String>,
}

/// Root of the public GitHub REST API.
pub const GITHUB_API: &str = "https://api.github.com";

const SOURCE_PREFIXES: &[&str] = &[
    "github:",
    "https://github.com/",
    "http://github.com/",
    "git@github.com:",
    "github.com/",
];

fn valid_segment(segment: &str) -> bool {
    !matches!(segment, "" | "." | "..")
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl TemplateSource {
    /// Parse `owner/repo[/sub/dir][#ref]`.
    ///
    /// Accepts `github:` and GitHub URL prefixes, and a trailing `.git` on the
    /// repository name.
    pub fn parse(spec: &str) -> Result<Self, TemplateError> {
        let invalid = || TemplateError::InvalidSource(spec.to_string());

        let mut rest = spec.trim();
        for prefix in SOURCE_PREFIXES {
            if let Some(stripped) = rest.strip_prefix(prefix) {
                rest = stripped;
                break;
            }
        }

        let (path, reference) = match rest.split_once('#') {
            Some((path, reference)) if !reference.is_empty() => {
                (path, Some(reference.to_string()))
            }
            Some(_) => return Err(invalid()),
            None => (rest, None),
        };

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let owner = segments.next().ok_or_else(invalid)?;
        let repo = segments.next().ok_or_else(invalid)?;
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if !valid_segment(owner) || !valid_segment(repo) {
            return Err(invalid());
        }

        let subdir: Vec<&str> = segments.collect();
        if subdir.iter().any(|s| matches!(*s, "." | "..")) {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            subdir: (!subdir.is_empty()).then(|| subdir.join("/")),
            reference,
        })
    }

    /// GitHub API URL of the zip archive for this source.
    pub fn archive_url(&self) -> String {
        self.archive_url_at(GITHUB_API)
    }

    /// Zip archive URL under another API root, e.g. a GitHub Enterprise host.
    pub fn archive_url_at(&self, api_base: &str) -> String {
        let mut url = format!(
            "{}/repos/{}/{}/zipball",
            api_base.trim_end_matches('/'),
            self.owner,
            self.repo
        );
        if let Some(reference) = &self.reference {
            url.push('/');
            url.push_str(reference);
        }
        url
    }
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)?;
        if let Some(subdir) = &self.subdir {
            write!(f, "/{subdir}")?;
        }
        if let Some(reference) = &self.reference {
            write!(f, "#{reference}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_values_are_unique() {
        let templates = builtin_templates();
        let mut values: Vec<&str> = templates.iter().map(|t| t.value.as_str()).collect();
        values.sort();
        values.dedup();
        assert_eq!(values.len(), templates.len());
    }

    #[test]
    fn test_builtin_git_sources_parse() {
        for template in builtin_templates() {
            if let TemplateKind::Git { repo } = &template.kind {
                assert!(TemplateSource::parse(repo).is_ok(), "bad source: {repo}");
            }
        }
    }

    #[test]
    fn test_find_template() {
        let templates = builtin_templates();
        let found = find_template(&templates, "cargo-lib").unwrap();
        assert_eq!(found.name, "Cargo library");
        assert!(!found.is_git());

        let err = find_template(&templates, "nope").unwrap_err();
        assert_eq!(err.to_string(), "Template not found: nope");
    }

    #[test]
    fn test_resolve_template_falls_back_to_repo() {
        let templates = builtin_templates();
        assert_eq!(
            resolve_template(&templates, "bevy-2d").unwrap().value,
            "bevy-2d"
        );

        let custom = resolve_template(&templates, "github:foo/bar#dev").unwrap();
        assert_eq!(
            custom.kind,
            TemplateKind::Git {
                repo: "github:foo/bar#dev".to_string()
            }
        );
        assert_eq!(custom.name, "foo/bar#dev");

        assert!(matches!(
            resolve_template(&templates, "missing"),
            Err(TemplateError::NotFound(_))
        ));
        assert!(matches!(
            resolve_template(&templates, "bad/"),
            Err(TemplateError::InvalidSource(_))
        ));
    }

    #[test]
    fn test_catalog_appends_and_overrides() {
        let extra = vec![
            Template::git("Mine", "mine", "My template", "me/mine"),
            Template::git("Bevy fork", "bevy-2d", "Forked", "me/bevy"),
        ];
        let templates = catalog(&extra);

        assert_eq!(templates.len(), builtin_templates().len() + 1);
        assert_eq!(templates.last().unwrap().value, "mine");
        let bevy = find_template(&templates, "bevy-2d").unwrap();
        assert_eq!(bevy.description, "Forked");
    }

    #[test]
    fn test_template_json_shape() {
        let json = r#"{
            "name": "Cargo bin",
            "value": "bin",
            "description": "d",
            "type": "generator",
            "command": "cargo",
            "args": ["new", "--bin"]
        }"#;
        let template: Template = serde_json::from_str(json).unwrap();
        assert_eq!(
            template.kind,
            TemplateKind::Generator {
                command: "cargo".to_string(),
                args: vec!["new".to_string(), "--bin".to_string()],
            }
        );

        let git: Template = serde_json::from_str(
            r#"{"name": "n", "value": "v", "description": "d", "type": "git", "repo": "a/b"}"#,
        )
        .unwrap();
        assert!(git.is_git());
    }

    #[test]
    fn test_parse_owner_repo() {
        let source = TemplateSource::parse("foo/bar").unwrap();
        assert_eq!(source.owner, "foo");
        assert_eq!(source.repo, "bar");
        assert_eq!(source.subdir, None);
        assert_eq!(source.reference, None);
        assert_eq!(
            source.archive_url(),
            "https://api.github.com/repos/foo/bar/zipball"
        );
    }

    #[test]
    fn test_parse_subdir_and_ref() {
        let source = TemplateSource::parse("github:foo/bar/examples/basic#v1.2").unwrap();
        assert_eq!(source.subdir.as_deref(), Some("examples/basic"));
        assert_eq!(source.reference.as_deref(), Some("v1.2"));
        assert_eq!(
            source.archive_url(),
            "https://api.github.com/repos/foo/bar/zipball/v1.2"
        );
        assert_eq!(source.to_string(), "foo/bar/examples/basic#v1.2");
    }

    #[test]
    fn test_archive_url_at_custom_root() {
        let source = TemplateSource::parse("foo/bar#main").unwrap();
        assert_eq!(
            source.archive_url_at("http://127.0.0.1:8080/"),
            "http://127.0.0.1:8080/repos/foo/bar/zipball/main"
        );
    }

    #[test]
    fn test_parse_url_forms() {
        let https = TemplateSource::parse("https://github.com/foo/bar.git").unwrap();
        assert_eq!((https.owner.as_str(), https.repo.as_str()), ("foo", "bar"));

        let ssh = TemplateSource::parse("git@github.com:foo/bar").unwrap();
        assert_eq!(ssh.to_string(), "foo/bar");
    }

    #[test]
    fn test_parse_rejects_bad_sources() {
        for spec in [
            "",
            "foo",
            "foo/",
            "foo/bar#",
            "fo o/bar",
            "foo/bar/../x",
            "foo/bar/./x",
            "./bar",
            "foo/..",
            "foo/bar/x/.",
        ] {
            assert!(
                matches!(
                    TemplateSource::parse(spec),
                    Err(TemplateError::InvalidSource(_))
                ),
                "accepted: {spec:?}"
            );
        }
    }
}
