use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "peerdraft")]
#[command(about = "Manage local Peerdraft settings and subscription state")]
#[command(version)]
pub struct Cli {
    /// Operator endpoint overrides (YAML). Defaults to ~/.peerdraft/operator.yaml if present
    #[arg(long, global = true)]
    pub operator_config: Option<PathBuf>,

    /// Settings file to use instead of ~/.peerdraft/data.json
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the settings screen
    Show,

    /// Set the name shown to collaborators
    SetName { name: String },

    /// Connect an existing subscription by the email it was bought with
    Connect { email: String },

    /// Pull the latest subscription data for this installation
    Refresh,

    /// Migrate the stored settings and print the resulting record
    Migrate,
}
