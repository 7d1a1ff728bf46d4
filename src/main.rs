mod cli;

use std::io;
use std::path::Path;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use cogwalk::analyze::{self, AnalyzeOptions};
use cogwalk::{Result, RuleTable};

fn load_rules(path: Option<&Path>) -> Result<RuleTable> {
    match path {
        Some(p) => RuleTable::load(p).map_err(|e| e.in_file(p)),
        None => Ok(RuleTable::default()),
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Analyze {
            paths,
            rules,
            json,
            trace,
            threshold,
            strict,
        } => {
            let table = load_rules(rules.as_deref())?;
            let opts = AnalyzeOptions {
                json,
                trace,
                threshold,
                strict,
            };
            let over = analyze::run(&paths, &table, &opts)?;
            Ok(if over > 0 { 1 } else { 0 })
        }
        Commands::Rules { rules } => {
            let table = load_rules(rules.as_deref())?;
            print!("{}", table.to_toml_string()?);
            Ok(0)
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "cw", &mut io::stdout());
            Ok(0)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
