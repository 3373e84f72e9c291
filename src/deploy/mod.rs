//! Agent deployment: argument lines per role and the SSH launcher.
mod launch;
mod ssh;


use std::path::Path;

use async_trait::async_trait;
use tokio::process::Child;
use tracing::info;

use crate::error::AppResult;

pub use launch::{AgentLaunch, agent_args, agent_type, launch_plan};
pub use ssh::SshDeployer;

/// Starts an agent binary on a remote host.
#[async_trait]
pub trait AgentDeployer: Send + Sync {
    /// # Errors
    ///
    /// Returns a deployment error when the binary cannot be copied or the
    /// remote session cannot be started.
    async fn deploy(&self, host: &str, binary: &Path, args: &[String]) -> AppResult<DeployedAgent>;
}

/// A running remote agent. Dropping it terminates the remote session.
#[derive(Debug)]
pub struct DeployedAgent {
    host: String,
    session: Option<Child>,
}

impl DeployedAgent {
    #[must_use]
    pub const fn new(host: String, session: Child) -> Self {
        Self {
            host,
            session: Some(session),
        }
    }

    /// An agent that was started out of band.
    #[must_use]
    pub const fn unmanaged(host: String) -> Self {
        Self {
            host,
            session: None,
        }
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub const fn is_managed(&self) -> bool {
        self.session.is_some()
    }
}

/// Deploys every entry of `plan` in order and keeps the sessions alive.
///
/// # Errors
///
/// Stops at the first failed deployment; sessions already started are
/// terminated when the returned error drops them.
pub async fn deploy_all<D>(deployer: &D, plan: &[AgentLaunch]) -> AppResult<Vec<DeployedAgent>>
where
    D: AgentDeployer + ?Sized,
{
    let mut deployed = Vec::with_capacity(plan.len());
    for launch in plan {
        info!(
            "Deploying {} agent on {} ({})",
            launch.role,
            launch.host,
            launch.binary.display()
        );
        deployed.push(
            deployer
                .deploy(&launch.host, &launch.binary, &launch.args)
                .await?,
        );
    }
    Ok(deployed)
}
