// ABOUTME: Stage transition methods for the deployment pipeline.
// ABOUTME: Each method consumes self and returns the next stage on success.

use crate::ssh::{CommandOps, LineSink, TransferOps};

use super::Deployment;
use super::error::DeployError;
use super::remote;
use super::state::{
    Connected, DirectoryEnsured, Extracted, PathResolved, ServiceRestarted, Transferred,
};
use super::target;

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S> Deployment<S> {
    /// Internal helper to transition, carrying data out of the old stage.
    fn transition<T>(self, next: impl FnOnce(S) -> T) -> Deployment<T> {
        Deployment {
            user: self.user,
            retention: self.retention,
            state: next(self.state),
        }
    }

    /// Working-directory anchor for commands that could be handed a relative
    /// path: `/root` for root, the conventional home otherwise.
    fn home_anchor(&self) -> String {
        if self.user == "root" {
            "/root".to_string()
        } else {
            format!("/home/{}", self.user)
        }
    }
}

/// Outcome of the extraction-tool lookup.
///
/// `command -v` polarity: exit 0 means the tool resolves to an executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolLookup {
    Present,
    Absent,
}

// =============================================================================
// Connected -> PathResolved
// =============================================================================

impl Deployment<Connected> {
    /// Resolve the raw destination into the frozen deployment target.
    ///
    /// May probe the remote home directory and whether the destination is an
    /// existing directory; issues no mutating command.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Resolution` if the remote home directory cannot
    /// be determined.
    #[must_use = "deployment state must be used"]
    pub async fn resolve_path<R: CommandOps>(
        self,
        shell: &R,
    ) -> Result<Deployment<PathResolved>, DeployError> {
        let resolved =
            target::resolve(shell, &self.state.source, &self.state.raw_destination).await?;
        tracing::debug!(
            destination = %resolved.destination(),
            directory = %resolved.destination_dir(),
            "destination resolved"
        );
        Ok(self.transition(|_| PathResolved { target: resolved }))
    }
}

// =============================================================================
// PathResolved -> DirectoryEnsured
// =============================================================================

impl Deployment<PathResolved> {
    /// Check the local artifact exists before any remote side effect.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::SourceNotFound` if the artifact is missing or
    /// not a regular file.
    pub fn verify_source(&self) -> Result<(), DeployError> {
        let source = self.state.target.source();
        if !source.is_file() {
            return Err(DeployError::SourceNotFound(source.to_path_buf()));
        }
        Ok(())
    }

    /// Create the destination directory and any missing parents.
    ///
    /// Idempotent: an existing directory is success. Anchored at the user's
    /// home so a relative path cannot land in an unintended location.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::DirectoryCreation` on nonzero exit or transport
    /// failure.
    #[must_use = "deployment state must be used"]
    pub async fn ensure_directory<R: CommandOps>(
        self,
        shell: &R,
        sink: &dyn LineSink,
    ) -> Result<Deployment<DirectoryEnsured>, DeployError> {
        let dir = self.state.target.destination_dir().to_string();
        let command = remote::make_directories(&dir);
        let anchor = self.home_anchor();

        let result = shell
            .exec(&command, Some(&anchor), sink)
            .await
            .map_err(|e| DeployError::DirectoryCreation {
                dir: dir.clone(),
                reason: e.to_string(),
            })?;
        if !result.success() {
            return Err(DeployError::DirectoryCreation {
                dir,
                reason: format!("exit code {}", result.exit_code),
            });
        }

        Ok(self.transition(|s| DirectoryEnsured { target: s.target }))
    }
}

// =============================================================================
// DirectoryEnsured -> Transferred
// =============================================================================

impl Deployment<DirectoryEnsured> {
    /// Upload the artifact to the resolved destination.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Transfer` on any I/O or protocol failure.
    #[must_use = "deployment state must be used"]
    pub async fn transfer<R: TransferOps>(
        self,
        shell: &R,
    ) -> Result<Deployment<Transferred>, DeployError> {
        let destination = self.state.target.destination().to_string();
        shell
            .upload(self.state.target.source(), &destination)
            .await
            .map_err(|e| DeployError::Transfer {
                destination,
                reason: e.to_string(),
            })?;

        Ok(self.transition(|s| Transferred { target: s.target }))
    }
}

// =============================================================================
// Transferred -> Extracted
// =============================================================================

impl Deployment<Transferred> {
    /// Verify the extraction tool exists, then unpack the archive stripping
    /// its wrapper directory and apply the retention policy as one remote
    /// invocation.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::MissingTool` if the lookup reports absence,
    /// `DeployError::Extraction` if the combined command fails.
    #[must_use = "deployment state must be used"]
    pub async fn extract<R: CommandOps>(
        self,
        shell: &R,
        sink: &dyn LineSink,
    ) -> Result<Deployment<Extracted>, DeployError> {
        let dir = self.state.target.destination_dir().to_string();

        match lookup_extraction_tool(shell, &dir).await? {
            ToolLookup::Present => {}
            ToolLookup::Absent => {
                return Err(DeployError::MissingTool(remote::EXTRACTION_TOOL.to_string()));
            }
        }

        let command = remote::extract_and_settle(self.state.target.destination(), self.retention);
        let result = shell
            .exec(&command, Some(&dir), sink)
            .await
            .map_err(|e| DeployError::Extraction {
                dir: dir.clone(),
                reason: e.to_string(),
            })?;
        if !result.success() {
            return Err(DeployError::Extraction {
                dir,
                reason: format!("exit code {}", result.exit_code),
            });
        }

        Ok(self.transition(|s| Extracted { target: s.target }))
    }
}

async fn lookup_extraction_tool<R: CommandOps>(
    shell: &R,
    cwd: &str,
) -> Result<ToolLookup, DeployError> {
    let probe = shell
        .probe(&remote::tool_lookup(remote::EXTRACTION_TOOL), Some(cwd))
        .await
        .map_err(|e| DeployError::Extraction {
            dir: cwd.to_string(),
            reason: format!("tool lookup failed: {}", e),
        })?;
    Ok(if probe.success() {
        ToolLookup::Present
    } else {
        ToolLookup::Absent
    })
}

// =============================================================================
// Extracted -> ServiceRestarted
// =============================================================================

impl Deployment<Extracted> {
    /// Reinstall production dependencies and reload the managed process, as
    /// one compound command rooted in the destination directory.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::ServiceRestart` on nonzero exit.
    #[must_use = "deployment state must be used"]
    pub async fn restart_service<R: CommandOps>(
        self,
        shell: &R,
        sink: &dyn LineSink,
    ) -> Result<Deployment<ServiceRestarted>, DeployError> {
        let dir = self.state.target.destination_dir().to_string();
        let result = shell
            .exec(remote::reinstall_and_reload(), Some(&dir), sink)
            .await
            .map_err(|e| DeployError::ServiceRestart(e.to_string()))?;
        if !result.success() {
            return Err(DeployError::ServiceRestart(format!(
                "exit code {}",
                result.exit_code
            )));
        }

        Ok(self.transition(|s| ServiceRestarted { target: s.target }))
    }
}
