//! Templates command implementation.

use std::io::{self, Write};

use crate::config::RailyardConfig;
use crate::templates::{catalog, Template, TemplateKind};

fn source_label(template: &Template) -> String {
    match &template.kind {
        TemplateKind::Git { repo } => repo.clone(),
        TemplateKind::Generator { command, args } if args.is_empty() => command.clone(),
        TemplateKind::Generator { command, args } => format!("{command} {}", args.join(" ")),
    }
}

/// Write the template table to `out`.
pub fn write_templates(config: &RailyardConfig, out: &mut dyn Write) -> io::Result<()> {
    let templates = catalog(&config.templates);

    writeln!(out, "\x1b[1mAvailable Templates\x1b[0m")?;
    writeln!(out)?;
    writeln!(out, "{:<16} {:<10} {:<40} SOURCE", "VALUE", "TYPE", "DESCRIPTION")?;
    writeln!(out, "{}", "-".repeat(90))?;

    for template in &templates {
        let kind = if template.is_git() { "git" } else { "generator" };
        writeln!(
            out,
            "{:<16} {:<10} {:<40} \x1b[2m{}\x1b[0m",
            template.value,
            kind,
            template.description,
            source_label(template)
        )?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "\x1b[2mAny GitHub repository works too: railyard new -t owner/repo[/subdir][#ref]\x1b[0m"
    )?;
    Ok(())
}

/// Execute the templates command.
pub fn list_templates(config: &RailyardConfig) {
    if let Err(e) = write_templates(config, &mut io::stdout()) {
        tracing::debug!(error = %e, "failed to write template list");
    }
}
