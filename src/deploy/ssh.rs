use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{AppError, AppResult, DeployError};

use super::{AgentDeployer, DeployedAgent};

/// Copies the agent binary with `scp` and runs it under `sudo` over `ssh -tt`.
///
/// Relies on key-based authentication already set up for the local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshDeployer {
    user: String,
}

impl SshDeployer {
    #[must_use]
    pub const fn new(user: String) -> Self {
        Self { user }
    }

    /// Uses the current login name for the remote staging directory.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::UnknownUser` when neither `USER` nor `LOGNAME`
    /// is set.
    pub fn from_env() -> AppResult<Self> {
        std::env::var("USER")
            .or_else(|_err| std::env::var("LOGNAME"))
            .map(Self::new)
            .map_err(|_err| AppError::deploy(DeployError::UnknownUser))
    }

    #[must_use]
    pub fn staging_dir(&self) -> String {
        format!("/tmp/{}", self.user)
    }

    /// Remote shell line that starts the agent.
    #[must_use]
    pub fn launch_command(remote_path: &str, args: &[String]) -> String {
        format!(
            "ulimit -c unlimited && sudo {} {}",
            remote_path,
            args.join(" ")
        )
    }
}

#[async_trait]
impl AgentDeployer for SshDeployer {
    async fn deploy(&self, host: &str, binary: &Path, args: &[String]) -> AppResult<DeployedAgent> {
        tokio::fs::metadata(binary).await.map_err(|err| {
            AppError::deploy(DeployError::BinaryUnreadable {
                path: binary.to_path_buf(),
                source: err,
            })
        })?;
        let file_name = binary.file_name().ok_or_else(|| {
            AppError::deploy(DeployError::BinaryWithoutName {
                path: binary.to_path_buf(),
            })
        })?;
        let staging_dir = self.staging_dir();
        let remote_path = format!("{}/{}", staging_dir, file_name.to_string_lossy());

        let mut mkdir = Command::new("ssh");
        mkdir.arg(host).arg("mkdir").arg("-p").arg(&staging_dir);
        run_checked("ssh", host, &mut mkdir).await?;

        let mut copy = Command::new("scp");
        copy.arg("-p")
            .arg(binary)
            .arg(format!("{}:{}", host, remote_path));
        run_checked("scp", host, &mut copy).await?;

        let launch = Self::launch_command(&remote_path, args);
        debug!("Starting agent on {}: {}", host, launch);
        let mut session = Command::new("ssh");
        session
            .arg("-tt")
            .arg(host)
            .arg(&launch)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        let mut child = session.spawn().map_err(|err| {
            AppError::deploy(DeployError::Spawn {
                program: "ssh",
                host: host.to_owned(),
                source: err,
            })
        })?;
        if let Ok(Some(status)) = child.try_wait() {
            return Err(AppError::deploy(DeployError::SessionEnded {
                host: host.to_owned(),
                status,
            }));
        }
        Ok(DeployedAgent::new(host.to_owned(), child))
    }
}

async fn run_checked(program: &'static str, host: &str, command: &mut Command) -> AppResult<()> {
    let status = command
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|err| {
            AppError::deploy(DeployError::Spawn {
                program,
                host: host.to_owned(),
                source: err,
            })
        })?;
    if !status.success() {
        return Err(AppError::deploy(DeployError::CommandFailed {
            program,
            host: host.to_owned(),
            status,
        }));
    }
    Ok(())
}
