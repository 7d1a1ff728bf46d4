/// CLI argument definitions for the `cw` command.
///
/// Defines all subcommands and their arguments using the `clap`
/// derive macros.
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Top-level CLI parser with a single subcommand selector.
#[derive(Parser)]
#[command(
    name = "cw",
    version,
    about = "Structural complexity of syntax trees"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// All available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Score syntax trees exported as JSON by a language front end
    Analyze {
        /// Tree files to analyze
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// TOML rule table (default: built-in rules)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// List every increment with its depth and breakdown
        #[arg(long, conflicts_with = "json")]
        trace: bool,

        /// Exit with status 1 when any tree scores above this total
        #[arg(long)]
        threshold: Option<usize>,

        /// Fail on the first malformed or unreadable tree instead of skipping it
        #[arg(long)]
        strict: bool,
    },

    /// Print the effective rule table as TOML
    Rules {
        /// TOML rule table to validate and echo (default: built-in rules)
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}
