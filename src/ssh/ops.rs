// ABOUTME: Capability traits the deployment pipeline is generic over.
// ABOUTME: Implemented by the live SSH session and by scripted test doubles.

use std::path::Path;

use async_trait::async_trait;

use super::client::{ExecResult, Probe};
use super::error::Result;
use super::stream::LineSink;

/// Remote command execution capability.
#[async_trait]
pub trait CommandOps: Send + Sync {
    /// Run a command, streaming its output lines to `sink` as they arrive.
    ///
    /// A nonzero exit code is not an error here; callers interpret it.
    async fn exec(
        &self,
        command: &str,
        cwd: Option<&str>,
        sink: &dyn LineSink,
    ) -> Result<ExecResult>;

    /// Run a short diagnostic command, capturing its stdout.
    async fn probe(&self, command: &str, cwd: Option<&str>) -> Result<Probe>;
}

/// File upload capability.
#[async_trait]
pub trait TransferOps: Send + Sync {
    /// Copy a local file to an absolute remote path.
    ///
    /// The remote parent directory must already exist; nothing is created
    /// implicitly.
    async fn upload(&self, local: &Path, remote: &str) -> Result<()>;
}

/// Complete session capability, including teardown.
#[async_trait]
pub trait SessionOps: CommandOps + TransferOps {
    /// Release the session.
    ///
    /// Runs on the success and the failure path alike; callers report a
    /// failure here as a warning, never as the run's result.
    async fn close(self) -> Result<()>;
}
