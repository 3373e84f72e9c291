//! Run orchestration: deploy agents, connect, drive the pattern, render.
use std::time::Duration;

use tracing::info;

use crate::args::OutputFormat;
use crate::config::RunSettings;
use crate::deploy::{AgentDeployer, AgentLaunch, DeployedAgent, deploy_all};
use crate::error::AppResult;
use crate::experiment::{Controller, ExperimentOutcome, TokioPacer, render_json, render_text};
use crate::link::Fleet;

/// Grace period between starting remote agents and dialing them.
pub const DEPLOY_SETTLE: Duration = Duration::from_secs(5);

/// Starts every planned agent and waits for them to open their management
/// port. An empty plan returns immediately.
///
/// # Errors
///
/// Returns the first deployment failure.
pub async fn deploy_agents<D>(deployer: &D, plan: &[AgentLaunch]) -> AppResult<Vec<DeployedAgent>>
where
    D: AgentDeployer + ?Sized,
{
    if plan.is_empty() {
        return Ok(Vec::new());
    }
    let deployed = deploy_all(deployer, plan).await?;
    info!(
        "Deployed {} agents; waiting {} s before connecting",
        deployed.len(),
        DEPLOY_SETTLE.as_secs()
    );
    tokio::time::sleep(DEPLOY_SETTLE).await;
    Ok(deployed)
}

/// Connects to the roster and runs the configured pattern to completion.
///
/// # Errors
///
/// Returns connection, transport, protocol, configuration and experiment
/// failures as they occur. Nothing is retried.
pub async fn run_experiment(settings: &RunSettings) -> AppResult<ExperimentOutcome> {
    let experiment = &settings.experiment;
    info!(
        "Target {} ({}, {}), key count {}",
        settings.server.target,
        settings.server.comm_proto.as_str(),
        settings.server.app_proto,
        settings.server.key_count
    );
    let fleet = Fleet::connect(&experiment.roster, experiment.agent_port).await?;
    let mut controller = Controller::new(fleet, TokioPacer, settings.controller_settings());
    let outcome = controller.run(experiment.pattern).await?;
    info!(
        "Pattern {} finished with {} points",
        outcome.pattern,
        outcome.points.len()
    );
    Ok(outcome)
}

/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(outcome: &ExperimentOutcome, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Text => Ok(render_text(outcome)),
        OutputFormat::Json => render_json(outcome),
    }
}
