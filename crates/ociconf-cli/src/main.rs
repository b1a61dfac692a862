//! ociconf CLI
//!
//! Registers OCI runtimes in a container engine's TOML config and looks up
//! existing ones.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use commands::Target;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to initialize logging: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!(config = %cli.config.display(), root = %cli.root, "Starting ociconf");

    let target = Target::new(cli.config, cli.root);
    execute_command(&target, cli.command)
}

fn execute_command(target: &Target, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::AddRuntime {
            name,
            binary_path,
            set_as_default,
            dry_run,
        } => commands::run_add_runtime(target, &name, &binary_path, set_as_default, dry_run),
        Commands::RemoveRuntime { name, dry_run } => {
            commands::run_remove_runtime(target, &name, dry_run)
        }
        Commands::GetRuntime { name, json } => commands::run_get_runtime(target, &name, json),
        Commands::ListRuntimes { json } => commands::run_list_runtimes(target, json),
    }
}
