// ABOUTME: Generic deployment struct parameterized by pipeline stage.
// ABOUTME: Stage types carry the resolved target for compile-time guarantees.

use std::path::PathBuf;

use crate::config::RetentionPolicy;

use super::state::{Connected, Extracted, PathResolved, ServiceRestarted};
use super::target::DeploymentTarget;

/// A deployment run in progress, parameterized by its current stage.
///
/// The state type parameter `S` carries stage-specific data (the resolved
/// target) directly in the stage type. Later stages cannot be constructed
/// without a resolved destination, and no stage can be re-entered or skipped.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) user: String,
    pub(crate) retention: RetentionPolicy,
    pub(crate) state: S,
}

impl Deployment<Connected> {
    /// Begin a run over an established session.
    pub fn new(
        user: impl Into<String>,
        retention: RetentionPolicy,
        source: impl Into<PathBuf>,
        raw_destination: impl Into<String>,
    ) -> Self {
        Deployment {
            user: user.into(),
            retention,
            state: Connected {
                source: source.into(),
                raw_destination: raw_destination.into(),
            },
        }
    }
}

impl Deployment<PathResolved> {
    /// The frozen deployment target.
    pub fn target(&self) -> &DeploymentTarget {
        &self.state.target
    }
}

impl Deployment<Extracted> {
    /// Consume the run without restarting the service.
    pub fn finish(self) -> DeploymentTarget {
        self.state.target
    }
}

impl Deployment<ServiceRestarted> {
    /// Consume the completed run.
    pub fn finish(self) -> DeploymentTarget {
        self.state.target
    }
}
