//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ociconf_core::CRIO_ROOT;

/// Config file edited when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "/etc/crio/crio.conf";

/// ociconf - Register OCI runtimes in a container engine config
#[derive(Parser, Debug)]
#[command(name = "ociconf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the config file to edit
    #[arg(
        short,
        long,
        global = true,
        env = "OCICONF_CONFIG",
        default_value = DEFAULT_CONFIG_PATH
    )]
    pub config: PathBuf,

    /// Root table holding the `runtime` section
    #[arg(long, global = true, env = "OCICONF_ROOT", default_value = CRIO_ROOT)]
    pub root: String,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Register a runtime, inheriting options from the default runtime or runc
    ///
    /// Examples:
    ///   ociconf add-runtime nvidia /usr/bin/nvidia-container-runtime
    ///   ociconf add-runtime nvidia /usr/bin/nvidia-container-runtime --set-as-default
    AddRuntime {
        /// Name of the runtime entry
        name: String,

        /// Path to the runtime executable
        binary_path: String,

        /// Make this runtime the default runtime
        #[arg(long)]
        set_as_default: bool,

        /// Print a diff of the change instead of writing the file
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove a runtime (and the default pointer if it names it)
    RemoveRuntime {
        /// Name of the runtime entry
        name: String,

        /// Print a diff of the change instead of writing the file
        #[arg(long)]
        dry_run: bool,
    },

    /// Print a runtime's binary path (empty if not registered)
    GetRuntime {
        /// Name of the runtime entry
        name: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List registered runtimes
    ListRuntimes {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
