//! settings-sync CLI
//!
//! Prepares settings files for upload and applies downloaded ones to this
//! machine.

mod cli;
mod commands;
mod error;
mod logging;
mod settings;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::{CliError, Result};
use settings::SyncConfig;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("Failed to initialize logging: {e}")))?;
    tracing::debug!("Verbose mode enabled");

    let config = SyncConfig::load(cli.config.as_deref())?;
    execute_command(cli.command, &config)
}

fn execute_command(cmd: Commands, config: &SyncConfig) -> Result<()> {
    match cmd {
        Commands::Prepare { file, output } => commands::run_prepare(&file, output.as_deref()),
        Commands::Apply {
            local,
            incoming,
            machine,
            dry_run,
        } => {
            let facts = config.machine_facts(&machine);
            let lock_path = config.lock_path(&local);
            commands::run_apply(&local, &incoming, &facts, &lock_path, dry_run)
        }
        Commands::Check { file } => commands::run_check(&file),
        Commands::Inspect {
            file,
            machine,
            json,
        } => {
            let facts = config.machine_facts(&machine);
            commands::run_inspect(&file, &facts, json)
        }
    }
}
