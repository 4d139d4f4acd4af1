//! CLI argument parsing using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for `check`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per failed rule
    Text,
    /// The full report as a JSON object
    Json,
}

/// vetter CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "vetter")]
#[command(about = "Validate data files against declarative rule files")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a data file against a rule file
    Check {
        /// Data file (JSON, or YAML for any other extension)
        #[arg(short, long)]
        data: PathBuf,

        /// Rule file mapping field paths to rule strings
        #[arg(short, long)]
        rules: PathBuf,

        /// YAML file of message templates overriding the builtin ones
        #[arg(short, long)]
        templates: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the normalized rule table for a rule file
    Explain {
        /// Rule file mapping field paths to rule strings
        #[arg(short, long)]
        rules: PathBuf,
    },
}
