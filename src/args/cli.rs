use clap::Parser;
use std::path::PathBuf;

use super::defaults::{
    DEFAULT_AGENT_PORT, DEFAULT_APP_PROTO, DEFAULT_CI_SIZE_US, DEFAULT_CONNECTIONS, DEFAULT_IDIST,
    DEFAULT_KEY_COUNT, DEFAULT_LATENCY_RATE, DEFAULT_LOAD_PATTERN, DEFAULT_LOAD_THREADS,
    DEFAULT_LT_THREADS, DEFAULT_MAX_TRIES, DEFAULT_TARGET_HOST,
};
use super::parsers::{parse_agent_list, parse_bool_env, parse_positive_u32, parse_positive_u64};
use super::types::{AgentList, CommProto, OutputFormat, PositiveU32, PositiveU64};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Coordinator for distributed load-testing agents - deploys throughput, latency and symmetric agents, drives load patterns, and aggregates their statistics."
)]
pub struct CoordinatorArgs {
    /// host:port of the system under test
    #[arg(long = "target-host", default_value = DEFAULT_TARGET_HOST)]
    pub target_host: String,

    /// Throughput agent hosts, comma-separated
    #[arg(long = "load-agents", default_value = "", value_parser = parse_agent_list)]
    pub load_agents: AgentList,

    /// Latency agent hosts, comma-separated
    #[arg(long = "lt-agents", default_value = "", value_parser = parse_agent_list)]
    pub lt_agents: AgentList,

    /// Symmetric agent hosts, comma-separated
    #[arg(long = "sym-agents", default_value = "", value_parser = parse_agent_list)]
    pub sym_agents: AgentList,

    /// Management port every agent listens on
    #[arg(long = "agent-port", default_value_t = DEFAULT_AGENT_PORT)]
    pub agent_port: u16,

    /// Throughput agent binary to deploy (also used for symmetric agents)
    #[arg(long = "load-binary")]
    pub load_binary: Option<PathBuf>,

    /// Latency agent binary to deploy
    #[arg(long = "lt-binary")]
    pub lt_binary: Option<PathBuf>,

    /// Worker threads per throughput agent
    #[arg(long = "load-threads", default_value = DEFAULT_LOAD_THREADS, value_parser = parse_positive_u32)]
    pub load_threads: PositiveU32,

    /// Worker threads per latency agent
    #[arg(long = "lt-threads", default_value = DEFAULT_LT_THREADS, value_parser = parse_positive_u32)]
    pub lt_threads: PositiveU32,

    /// Connections per throughput agent
    #[arg(long = "load-conn", default_value = DEFAULT_CONNECTIONS, value_parser = parse_positive_u32)]
    pub load_conn: PositiveU32,

    /// Connections per latency agent
    #[arg(long = "lt-conn", default_value = DEFAULT_CONNECTIONS, value_parser = parse_positive_u32)]
    pub lt_conn: PositiveU32,

    /// Inter-arrival distribution (fixed, exp)
    #[arg(long = "idist", default_value = DEFAULT_IDIST)]
    pub idist: String,

    /// Application protocol descriptor passed to the agents
    #[arg(long = "app-proto", default_value = DEFAULT_APP_PROTO)]
    pub app_proto: String,

    /// Transport protocol towards the target
    #[arg(long = "comm-proto", default_value = "TCP", ignore_case = true)]
    pub comm_proto: CommProto,

    /// Per-agent rate of each latency agent, in ops/s
    #[arg(long = "lqps", default_value = DEFAULT_LATENCY_RATE, value_parser = parse_positive_u32)]
    pub lqps: PositiveU32,

    /// Load pattern: fixed:<rate> | step:<start>:<end>:<step> | test:<rate>:<samples> | corr:<rate>:<samples>
    #[arg(long = "load-pattern", default_value = DEFAULT_LOAD_PATTERN)]
    pub load_pattern: String,

    /// Widest acceptable p99 confidence interval, in microseconds
    #[arg(long = "ci-size", default_value = DEFAULT_CI_SIZE_US, value_parser = parse_positive_u64)]
    pub ci_size: PositiveU64,

    /// Key space size for key-value application protocols
    #[arg(long = "key-count", default_value_t = DEFAULT_KEY_COUNT)]
    pub key_count: u32,

    /// Use NIC timestamping on symmetric agents
    #[arg(long = "nic-ts")]
    pub nic_ts: bool,

    /// Iteration budget of the adaptive fixed pattern
    #[arg(long = "max-tries", default_value = DEFAULT_MAX_TRIES, value_parser = parse_positive_u32)]
    pub max_tries: PositiveU32,

    /// Result format on stdout
    #[arg(long = "output-format", default_value = "text", ignore_case = true)]
    pub output_format: OutputFormat,

    /// Path to a TOML or JSON config file
    #[arg(long)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
