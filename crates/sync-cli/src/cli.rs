//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sync_directives::OsType;

/// settings-sync - Keep one editor settings file in sync across machines
#[derive(Parser, Debug)]
#[command(name = "settings-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to <config dir>/settings-sync/config.toml)
    #[arg(long, global = true, env = "SETTINGS_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the facts directives are evaluated against
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineArgs {
    /// Operating system to evaluate `os=` conditions against
    /// (windows, linux, mac)
    #[arg(long)]
    pub os: Option<OsType>,

    /// Host name to evaluate `host=` conditions against
    #[arg(long, env = "SETTINGS_SYNC_HOST")]
    pub host: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Produce the canonical form of a settings file for upload
    ///
    /// Ignore regions are removed and every sync region is uncommented.
    /// Prints to stdout unless --output is given.
    Prepare {
        /// Local settings file
        file: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rewrite a local settings file from a downloaded copy
    ///
    /// Sync regions are commented or uncommented for this machine and the
    /// local ignore regions are kept.
    ///
    /// Examples:
    ///   settings-sync apply settings.json --incoming remote.json
    ///   settings-sync apply settings.json -i remote.json --os mac --dry-run
    Apply {
        /// Local settings file to overwrite
        local: PathBuf,

        /// Downloaded settings file
        #[arg(short, long)]
        incoming: PathBuf,

        #[command(flatten)]
        machine: MachineArgs,

        /// Print a diff instead of writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Check that a settings file is well-formed JSON with comments
    Check {
        /// Settings file to check
        file: PathBuf,
    },

    /// List the directives of a settings file and what they do here
    Inspect {
        /// Settings file to inspect
        file: PathBuf,

        #[command(flatten)]
        machine: MachineArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
