// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports state markers and Deployment struct for compile-time safe deployments.

mod deployment;
mod error;
mod remote;
mod state;
mod target;
mod transitions;

pub use deployment::Deployment;
pub use error::DeployError;
pub use state::{
    Connected, DirectoryEnsured, Extracted, PathResolved, ServiceRestarted, Transferred,
};
pub use target::DeploymentTarget;
