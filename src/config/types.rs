use std::path::PathBuf;

use serde::Deserialize;

use crate::args::{CommProto, OutputFormat};

/// File form of the coordinator options. Every field is optional and only
/// fills in options that were not given on the command line.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub target_host: Option<String>,
    pub load_agents: Option<Vec<String>>,
    pub lt_agents: Option<Vec<String>>,
    pub sym_agents: Option<Vec<String>>,
    pub agent_port: Option<u16>,
    pub load_binary: Option<PathBuf>,
    pub lt_binary: Option<PathBuf>,
    pub load_threads: Option<u32>,
    pub lt_threads: Option<u32>,
    #[serde(alias = "load_connections")]
    pub load_conn: Option<u32>,
    #[serde(alias = "lt_connections")]
    pub lt_conn: Option<u32>,
    pub idist: Option<String>,
    pub app_proto: Option<String>,
    pub comm_proto: Option<CommProto>,
    #[serde(alias = "latency_rate")]
    pub lqps: Option<u32>,
    pub load_pattern: Option<String>,
    #[serde(alias = "ci_size_us")]
    pub ci_size: Option<u64>,
    pub key_count: Option<u32>,
    pub nic_ts: Option<bool>,
    pub max_tries: Option<u32>,
    pub output_format: Option<OutputFormat>,
}
