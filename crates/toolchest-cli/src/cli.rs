//! Command-line definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Tool launcher and network interface configurator.
#[derive(Debug, Parser)]
#[command(name = "toolchest", version, about)]
pub struct Cli {
    /// Path to the JSON store document (defaults to the user data dir).
    #[arg(long, global = true, env = "TOOLCHEST_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List registered tools and scripts.
    List,
    /// Register a tool or script.
    Add(AddArgs),
    /// Launch an entity and stream its output until it exits.
    Run(RunArgs),
    /// Stop a running entity.
    Stop {
        /// Entity id.
        id: i64,
    },
    /// Open a terminal window in an entity's directory.
    Terminal {
        /// Entity id.
        id: i64,
    },
    /// Network interface configuration.
    #[command(subcommand)]
    Net(NetCommands),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Display name.
    pub name: String,
    /// Path to the executable or script.
    pub path: PathBuf,
    /// Entity kind: native-executable, archive-executable,
    /// interpreted-python, interpreted-shell, interpreted-batch,
    /// interpreted-powershell, or other.
    #[arg(long, default_value = "native-executable")]
    pub kind: String,
    /// Interpreter override (e.g. a venv python).
    #[arg(long)]
    pub interpreter: Option<String>,
    /// Default parameter string, split on whitespace at launch.
    #[arg(long)]
    pub parameters: Option<String>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Entity id.
    pub id: i64,
    /// Stop the process after this many seconds.
    #[arg(long)]
    pub kill_after: Option<u64>,
    /// Parameters overriding the stored ones.
    #[arg(last = true)]
    pub parameters: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum NetCommands {
    /// Apply a static configuration from a saved template or from flags.
    Apply(ApplyArgs),
    /// Reset an interface to DHCP.
    Reset { interface: String },
    /// Enable an interface.
    Enable { interface: String },
    /// Disable an interface.
    Disable { interface: String },
    /// Query the operational state of an interface.
    Status { interface: String },
    /// Save a configuration as a named template.
    SaveTemplate(SaveTemplateArgs),
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Apply a saved template by name.
    #[arg(long, conflicts_with_all = ["interface", "address", "netmask"])]
    pub template: Option<String>,
    #[arg(long, requires_all = ["address", "netmask"])]
    pub interface: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub netmask: Option<String>,
    #[arg(long)]
    pub gateway: Option<String>,
    #[arg(long)]
    pub dns1: Option<String>,
    #[arg(long)]
    pub dns2: Option<String>,
}

#[derive(Debug, Args)]
pub struct SaveTemplateArgs {
    /// Template name.
    pub name: String,
    #[arg(long)]
    pub interface: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub netmask: String,
    #[arg(long)]
    pub gateway: Option<String>,
    #[arg(long)]
    pub dns1: Option<String>,
    #[arg(long)]
    pub dns2: Option<String>,
}
