// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "capstan")]
#[command(about = "Archive deployment over SSH for CI pipelines")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new capstan.yml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Deploy an archive to the configured host
    Deploy {
        /// Remote host to deploy to
        #[arg(long, env = "CAPSTAN_HOST")]
        host: Option<String>,

        /// SSH port
        #[arg(long, env = "CAPSTAN_PORT")]
        port: Option<u16>,

        /// Remote username
        #[arg(long, env = "CAPSTAN_USER")]
        user: Option<String>,

        /// Private key material in PEM form
        #[arg(long, env = "CAPSTAN_SSH_KEY", hide_env_values = true)]
        ssh_key: Option<String>,

        /// Path to a private key file
        #[arg(long, env = "CAPSTAN_SSH_KEY_FILE")]
        ssh_key_file: Option<PathBuf>,

        /// Local archive to deploy
        #[arg(long, env = "CAPSTAN_SOURCE")]
        source: Option<PathBuf>,

        /// Remote destination path or directory
        #[arg(long, env = "CAPSTAN_DESTINATION")]
        destination: Option<String>,

        /// Keep the uploaded archive after extraction
        ///
        /// An explicit `false` (flag value or environment value) still
        /// overrides a `true` in the configuration file.
        #[arg(
            long,
            env = "CAPSTAN_KEEP_ARCHIVE",
            num_args = 0..=1,
            default_missing_value = "true"
        )]
        keep_archive: Option<bool>,

        /// Skip the dependency reinstall and service reload stage
        ///
        /// An explicit `false` (flag value or environment value) still
        /// overrides a `true` in the configuration file.
        #[arg(
            long,
            env = "CAPSTAN_SKIP_RESTART",
            num_args = 0..=1,
            default_missing_value = "true"
        )]
        skip_restart: Option<bool>,

        /// Explicit configuration file path (default: ./capstan.yml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
