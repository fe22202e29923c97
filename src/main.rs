//! railyard - scaffold new projects, with a train for company.
//!
//! This is the main entry point for the railyard CLI tool.

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use railyard::cli::{self, handle_result, Cli};
use railyard::logger;

/// Exit code used when interrupted with Ctrl-C.
const INTERRUPTED: i32 = 130;

fn install_interrupt_handler() {
    let result = ctrlc::set_handler(|| {
        // A train may be mid-frame with the cursor hidden.
        let mut stdout = std::io::stdout();
        let _ = writeln!(stdout, "\x1b[?25h");
        let _ = stdout.flush();
        std::process::exit(INTERRUPTED);
    });
    if let Err(e) = result {
        tracing::debug!(error = %e, "could not install Ctrl-C handler");
    }
}

fn run(cli: Cli) -> anyhow::Result<std::process::ExitCode> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    Ok(handle_result(runtime.block_on(cli::execute(cli))))
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    logger::init_tracing(cli.verbose);
    install_interrupt_handler();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            logger::error(&format!("{e:#}"));
            std::process::ExitCode::FAILURE
        }
    }
}
