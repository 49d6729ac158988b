// ABOUTME: Deploy command implementation.
// ABOUTME: Drives the pipeline stages in order with scoped session teardown.

use crate::config::Settings;
use crate::deploy::{Connected, DeployError, Deployment};
use crate::error::Result;
use crate::output::Output;
use crate::ssh::{CommandOps, Session, SessionOps, TransferOps};

/// Run one deployment against the configured host.
///
/// Any stage failure aborts the remaining stages; the session is torn down
/// on both the success and the failure path before the result propagates.
pub async fn deploy(settings: Settings, mut output: Output) -> Result<()> {
    output.start_timer();

    let Settings {
        session: session_config,
        source,
        destination,
        retention,
        restart,
    } = settings;
    let user = session_config.user.clone();

    output.progress(&format!("connecting to {}...", session_config.host));
    let session = Session::connect(session_config)
        .await
        .map_err(DeployError::Connection)?;
    output.progress("connected");

    let deployment = Deployment::new(user, retention, source, destination);
    run_deployment(session, deployment, restart, &output).await?;

    output.success("deployment complete");
    Ok(())
}

/// Drive the pipeline over an established session, then release the session.
///
/// The release runs on the success and the failure path alike, before the
/// pipeline's result propagates. A release failure after a successful run is
/// reported as a warning, never as the run's result.
pub async fn run_deployment<R>(
    shell: R,
    deployment: Deployment<Connected>,
    restart: bool,
    output: &Output,
) -> Result<()>
where
    R: SessionOps,
{
    let result = run_pipeline(deployment, &shell, restart, output).await;

    if let Err(e) = shell.close().await {
        output.warning(&format!("failed to close the SSH session: {}", e));
    }

    result
}

/// Run the pipeline stages in order.
async fn run_pipeline<R>(
    deployment: Deployment<Connected>,
    shell: &R,
    restart: bool,
    output: &Output,
) -> Result<()>
where
    R: CommandOps + TransferOps,
{
    let deployment = deployment.resolve_path(shell).await?;

    deployment.verify_source()?;

    let deployment = deployment.ensure_directory(shell, output).await?;
    output.progress("initialization complete");

    let deployment = deployment.transfer(shell).await?;
    output.progress("file sent");

    let deployment = deployment.extract(shell, output).await?;
    output.progress("archive extracted");

    let target = if restart {
        let deployment = deployment.restart_service(shell, output).await?;
        deployment.finish()
    } else {
        deployment.finish()
    };

    tracing::debug!(destination = %target.destination(), "pipeline finished");

    Ok(())
}
