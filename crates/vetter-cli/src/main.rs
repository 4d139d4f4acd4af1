//! vetter CLI entry point

mod args;
mod check;
mod explain;
mod input;

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use args::{Cli, Command};

/// Exit code for configuration and I/O errors.
const EXIT_ERROR: i32 = 2;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check {
            data,
            rules,
            templates,
            format,
        } => check::run_check(&data, &rules, templates.as_deref(), format),
        Command::Explain { rules } => explain::run_explain(&rules).map(|_| check::EXIT_VALID),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    process::exit(exit_code);
}
