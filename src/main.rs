// ABOUTME: Entry point for the capstan CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;

use capstan::config::{self, DeployOverrides, FileConfig, Settings};
use capstan::error::Result;
use capstan::output::{Output, OutputMode};
use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli, mode).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    match cli.command {
        Commands::Init { force } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, force)
        }
        Commands::Deploy {
            host,
            port,
            user,
            ssh_key,
            ssh_key_file,
            source,
            destination,
            keep_archive,
            skip_restart,
            config,
        } => {
            let file = match config {
                Some(path) => Some(FileConfig::load(&path)?),
                None => FileConfig::discover(&env::current_dir()?)?,
            };

            let overrides = DeployOverrides {
                host,
                port,
                user,
                ssh_key,
                ssh_key_file,
                source,
                destination,
                keep_archive,
                skip_restart,
            };

            let settings = Settings::resolve(overrides, file)?;
            capstan::commands::deploy(settings, Output::new(mode)).await
        }
    }
}
