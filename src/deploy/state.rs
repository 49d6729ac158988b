// ABOUTME: Pipeline stage marker types for the type state pattern.
// ABOUTME: Stages carry the resolved target once it exists, enforcing order at compile time.

use std::path::PathBuf;

use super::target::DeploymentTarget;

/// Session established; destination not yet resolved.
/// Available actions: `resolve_path()`
#[derive(Debug)]
pub struct Connected {
    pub(crate) source: PathBuf,
    pub(crate) raw_destination: String,
}

/// Destination resolved and frozen.
/// Available actions: `verify_source()`, `ensure_directory()`
#[derive(Debug)]
pub struct PathResolved {
    pub(crate) target: DeploymentTarget,
}

/// Destination directory exists on the remote host.
/// Available actions: `transfer()`
#[derive(Debug)]
pub struct DirectoryEnsured {
    pub(crate) target: DeploymentTarget,
}

/// Artifact uploaded to the resolved destination.
/// Available actions: `extract()`
#[derive(Debug)]
pub struct Transferred {
    pub(crate) target: DeploymentTarget,
}

/// Archive unpacked in place and retention applied.
/// Available actions: `restart_service()`, `finish()`
#[derive(Debug)]
pub struct Extracted {
    pub(crate) target: DeploymentTarget,
}

/// Dependencies reinstalled and the managed process reloaded.
/// Available actions: `finish()`
#[derive(Debug)]
pub struct ServiceRestarted {
    pub(crate) target: DeploymentTarget,
}
