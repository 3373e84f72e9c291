use std::path::PathBuf;

use tracing::info;

use crate::args::{CommProto, CoordinatorArgs, OutputFormat};
use crate::error::{AppError, AppResult, ValidationError};
use crate::experiment::{ControllerSettings, ExperimentPattern};
use crate::link::AgentRoster;

/// Settings handed to every agent about the system under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub target: String,
    pub load_threads: u32,
    pub lt_threads: u32,
    pub load_conn: u32,
    pub lt_conn: u32,
    pub idist: String,
    pub app_proto: String,
    pub comm_proto: CommProto,
    pub key_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    pub roster: AgentRoster,
    pub agent_port: u16,
    pub load_binary: Option<PathBuf>,
    pub lt_binary: Option<PathBuf>,
    /// Per-agent rate of each latency agent, in ops/s.
    pub latency_rate: u32,
    pub pattern: ExperimentPattern,
    pub ci_size_us: u64,
    pub nic_ts: bool,
    pub max_tries: u32,
}

/// Fully resolved run configuration. Built once, before any deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub server: ServerConfig,
    pub experiment: ExperimentConfig,
    pub output_format: OutputFormat,
}

impl RunSettings {
    /// Resolves CLI arguments (already merged with any config file).
    ///
    /// # Errors
    ///
    /// Returns a validation error when no agents are configured or a host
    /// appears in more than one role, and a configuration error when the load
    /// pattern is malformed or the roster cannot run it.
    pub fn resolve(args: &CoordinatorArgs) -> AppResult<Self> {
        let roster = AgentRoster {
            throughput: args.load_agents.as_slice().to_vec(),
            latency: args.lt_agents.as_slice().to_vec(),
            symmetric: args.sym_agents.as_slice().to_vec(),
        };
        if roster.is_empty() {
            return Err(AppError::validation(ValidationError::NoAgents));
        }
        ensure_distinct_hosts(&roster)?;

        let pattern = args.load_pattern.parse::<ExperimentPattern>()?;
        pattern.ensure_agents(|group| roster.count(group))?;
        info!(
            "Resolved {} throughput, {} latency and {} symmetric agents for pattern {}",
            roster.throughput.len(),
            roster.latency.len(),
            roster.symmetric.len(),
            pattern
        );

        Ok(Self {
            server: ServerConfig {
                target: args.target_host.clone(),
                load_threads: args.load_threads.get(),
                lt_threads: args.lt_threads.get(),
                load_conn: args.load_conn.get(),
                lt_conn: args.lt_conn.get(),
                idist: args.idist.clone(),
                app_proto: args.app_proto.clone(),
                comm_proto: args.comm_proto,
                key_count: args.key_count,
            },
            experiment: ExperimentConfig {
                roster,
                agent_port: args.agent_port,
                load_binary: args.load_binary.clone(),
                lt_binary: args.lt_binary.clone(),
                latency_rate: args.lqps.get(),
                pattern,
                ci_size_us: args.ci_size.get(),
                nic_ts: args.nic_ts,
                max_tries: args.max_tries.get(),
            },
            output_format: args.output_format,
        })
    }

    #[must_use]
    pub const fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            latency_rate: self.experiment.latency_rate,
            ci_size_us: self.experiment.ci_size_us,
            max_tries: self.experiment.max_tries,
        }
    }
}

fn ensure_distinct_hosts(roster: &AgentRoster) -> AppResult<()> {
    let mut seen: Vec<&str> = Vec::new();
    for (name, _role) in roster.entries() {
        if seen.contains(&name) {
            return Err(AppError::validation(ValidationError::DuplicateAgent {
                name: name.to_owned(),
            }));
        }
        seen.push(name);
    }
    Ok(())
}
