//! Carton - prebuilt Swift package dependencies
//!
//! CLI entry point that dispatches to subcommands.

use carton::cli::{Cli, Commands};
use carton::config::ConfigManager;
use carton::error::CartonResult;
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CartonResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    // 0 = warn (spinners only), 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("carton=warn"),
        1 => EnvFilter::new("carton=info"),
        _ => EnvFilter::new("carton=debug"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if config.general.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.without_time().init();
    }

    match cli.command {
        Commands::Fetch(args) => carton::cli::commands::fetch(args, &config).await,
        Commands::Clean(args) => carton::cli::commands::clean(args, &config).await,
        Commands::Manifest(args) => carton::cli::commands::manifest(args, &config).await,
        Commands::Config(args) => {
            carton::cli::commands::config(args, &config, &config_manager).await
        }
    }
}
