//! CLI argument definitions using clap derive

use crate::platform::Platform;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Carton - prebuilt Swift package dependencies
///
/// Resolves Swift Package Manager dependencies, builds them into
/// xcframeworks and caches the result inside the project.
#[derive(Parser, Debug)]
#[command(name = "carton")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CARTON_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve, build and cache dependencies
    Fetch(FetchArgs),

    /// Remove cached dependencies
    Clean(ProjectArgs),

    /// Print the Package.swift generated from the dependencies manifest
    Manifest(ProjectArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Project location arguments shared by project commands
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project directory (defaults to current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Dependencies cache directory (defaults to the configured cache_dir)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Platform to build for (repeatable; overrides the manifest)
    #[arg(long = "platform", value_enum)]
    pub platforms: Vec<Platform>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}
