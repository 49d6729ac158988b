// ABOUTME: Error types for the deployment pipeline stages.
// ABOUTME: Each stage raises its own kind; nothing is caught or retried locally.

use std::path::PathBuf;

/// Errors that can occur during deployment pipeline stages.
///
/// One kind per stage, so a failure names the stage that produced it. A
/// transport fault inside a stage surfaces as that stage's kind with the
/// transport error as its reason.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// SSH handshake or authentication failed.
    #[error(transparent)]
    Connection(crate::ssh::Error),

    /// Local source artifact missing or not a regular file.
    #[error("source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Remote home directory could not be determined.
    #[error("could not resolve destination: {0}")]
    Resolution(String),

    /// Destination directory creation failed.
    #[error("failed to create directory {dir}: {reason}")]
    DirectoryCreation { dir: String, reason: String },

    /// Artifact upload failed.
    #[error("failed to send archive to {destination}: {reason}")]
    Transfer { destination: String, reason: String },

    /// Extraction tool absent on the remote host.
    #[error("extraction tool '{0}' is not available on the remote host")]
    MissingTool(String),

    /// Combined extraction-and-retention command failed.
    #[error("failed to extract archive in {dir}: {reason}")]
    Extraction { dir: String, reason: String },

    /// Dependency reinstall or process reload failed.
    #[error("service restart failed: {0}")]
    ServiceRestart(String),
}
