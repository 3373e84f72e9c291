use std::path::PathBuf;

use tracing::info;

use crate::config::{RunSettings, ServerConfig};
use crate::link::AgentRole;

pub const THROUGHPUT_AGENT_TYPE: u32 = 0;
pub const LATENCY_AGENT_TYPE: u32 = 1;
pub const SYMMETRIC_NIC_TS_AGENT_TYPE: u32 = 2;
pub const SYMMETRIC_USERSPACE_TS_AGENT_TYPE: u32 = 3;

/// One remote agent to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentLaunch {
    pub host: String,
    pub role: AgentRole,
    pub binary: PathBuf,
    pub args: Vec<String>,
}

/// Value of the agent's `-a` flag.
#[must_use]
pub const fn agent_type(role: AgentRole, nic_ts: bool) -> u32 {
    match role {
        AgentRole::Throughput => THROUGHPUT_AGENT_TYPE,
        AgentRole::Latency => LATENCY_AGENT_TYPE,
        AgentRole::Symmetric if nic_ts => SYMMETRIC_NIC_TS_AGENT_TYPE,
        AgentRole::Symmetric => SYMMETRIC_USERSPACE_TS_AGENT_TYPE,
    }
}

/// Command-line arguments for an agent of `role`. Symmetric agents run with
/// the throughput thread and connection counts.
#[must_use]
pub fn agent_args(server: &ServerConfig, role: AgentRole, nic_ts: bool) -> Vec<String> {
    let (threads, connections) = match role {
        AgentRole::Throughput | AgentRole::Symmetric => (server.load_threads, server.load_conn),
        AgentRole::Latency => (server.lt_threads, server.lt_conn),
    };
    vec![
        "-s".to_owned(),
        server.target.clone(),
        "-t".to_owned(),
        threads.to_string(),
        "-c".to_owned(),
        connections.to_string(),
        "-i".to_owned(),
        server.idist.clone(),
        "-p".to_owned(),
        server.comm_proto.as_str().to_owned(),
        "-r".to_owned(),
        server.app_proto.clone(),
        "-a".to_owned(),
        agent_type(role, nic_ts).to_string(),
    ]
}

/// Agents to deploy, in roster order. Roles without a configured binary are
/// skipped and assumed to be running already.
#[must_use]
pub fn launch_plan(settings: &RunSettings) -> Vec<AgentLaunch> {
    let experiment = &settings.experiment;
    if experiment.roster.symmetric.is_empty() {
        info!("Asymmetric deployment");
    } else if experiment.nic_ts {
        info!("Symmetric agents use NIC timestamping");
    } else {
        info!("Symmetric agents use userspace timestamping");
    }

    experiment
        .roster
        .entries()
        .filter_map(|(host, role)| {
            let binary = match role {
                AgentRole::Throughput | AgentRole::Symmetric => experiment.load_binary.as_ref(),
                AgentRole::Latency => experiment.lt_binary.as_ref(),
            }?;
            Some(AgentLaunch {
                host: host.to_owned(),
                role,
                binary: binary.clone(),
                args: agent_args(&settings.server, role, experiment.nic_ts),
            })
        })
        .collect()
}
