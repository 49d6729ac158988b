// ABOUTME: Application-wide error types for capstan.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("missing required input: {0} (supply a flag, CAPSTAN environment variable, or capstan.yml entry)")]
    MissingInput(&'static str),

    #[error("missing SSH key: supply CAPSTAN_SSH_KEY, CAPSTAN_SSH_KEY_FILE, or the matching flags")]
    MissingKey,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Deploy(#[from] crate::deploy::DeployError),
}

pub type Result<T> = std::result::Result<T, Error>;
