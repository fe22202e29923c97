//! User-facing messages and diagnostic logging.
//!
//! Messages meant for the user are printed directly with ANSI colours.
//! Diagnostics go through `tracing` to stderr and are silent unless enabled
//! with `--verbose` or the `RAILYARD_LOG` environment variable.

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "RAILYARD_LOG";

/// Install the global tracing subscriber.
///
/// `RAILYARD_LOG` wins when set; otherwise `--verbose` selects debug output
/// for this crate and the default is warnings only. Calling this twice is
/// harmless.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "railyard=debug" } else { "railyard=warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

/// Plain informational line.
pub fn info(message: &str) {
    println!("\x1b[36mℹ\x1b[0m {message}");
}

/// Success line with a green check.
pub fn success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {message}");
}

/// Warning on stderr.
pub fn warn(message: &str) {
    eprintln!("\x1b[33mWarning:\x1b[0m {message}");
}

/// Error on stderr.
pub fn error(message: &str) {
    eprintln!("\x1b[31mError:\x1b[0m {message}");
}

/// Dimmed hint line, e.g. for next steps.
pub fn hint(message: &str) {
    println!("\x1b[2m{message}\x1b[0m");
}
