use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{AgentList, CoordinatorArgs, PositiveU32, PositiveU64};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments.
///
/// # Errors
///
/// Returns an error when a config value is out of range or an agent list is
/// malformed.
pub fn apply_config(
    args: &mut CoordinatorArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "target_host")
        && let Some(target) = config.target_host.clone()
    {
        args.target_host = target;
    }

    if !is_cli(matches, "load_agents")
        && let Some(agents) = config.load_agents.clone()
    {
        args.load_agents = AgentList::try_from(agents)?;
    }

    if !is_cli(matches, "lt_agents")
        && let Some(agents) = config.lt_agents.clone()
    {
        args.lt_agents = AgentList::try_from(agents)?;
    }

    if !is_cli(matches, "sym_agents")
        && let Some(agents) = config.sym_agents.clone()
    {
        args.sym_agents = AgentList::try_from(agents)?;
    }

    if !is_cli(matches, "agent_port")
        && let Some(port) = config.agent_port
    {
        args.agent_port = port;
    }

    if !is_cli(matches, "load_binary")
        && let Some(path) = config.load_binary.clone()
    {
        args.load_binary = Some(path);
    }

    if !is_cli(matches, "lt_binary")
        && let Some(path) = config.lt_binary.clone()
    {
        args.lt_binary = Some(path);
    }

    if !is_cli(matches, "load_threads")
        && let Some(threads) = config.load_threads
    {
        args.load_threads = ensure_positive_u32(threads, "load_threads")?;
    }

    if !is_cli(matches, "lt_threads")
        && let Some(threads) = config.lt_threads
    {
        args.lt_threads = ensure_positive_u32(threads, "lt_threads")?;
    }

    if !is_cli(matches, "load_conn")
        && let Some(conn) = config.load_conn
    {
        args.load_conn = ensure_positive_u32(conn, "load_conn")?;
    }

    if !is_cli(matches, "lt_conn")
        && let Some(conn) = config.lt_conn
    {
        args.lt_conn = ensure_positive_u32(conn, "lt_conn")?;
    }

    if !is_cli(matches, "idist")
        && let Some(idist) = config.idist.clone()
    {
        args.idist = idist;
    }

    if !is_cli(matches, "app_proto")
        && let Some(proto) = config.app_proto.clone()
    {
        args.app_proto = proto;
    }

    if !is_cli(matches, "comm_proto")
        && let Some(proto) = config.comm_proto
    {
        args.comm_proto = proto;
    }

    if !is_cli(matches, "lqps")
        && let Some(rate) = config.lqps
    {
        args.lqps = ensure_positive_u32(rate, "lqps")?;
    }

    if !is_cli(matches, "load_pattern")
        && let Some(pattern) = config.load_pattern.clone()
    {
        args.load_pattern = pattern;
    }

    if !is_cli(matches, "ci_size")
        && let Some(ci_size) = config.ci_size
    {
        args.ci_size = ensure_positive_u64(ci_size, "ci_size")?;
    }

    if !is_cli(matches, "key_count")
        && let Some(count) = config.key_count
    {
        args.key_count = count;
    }

    if !is_cli(matches, "nic_ts")
        && let Some(nic_ts) = config.nic_ts
    {
        args.nic_ts = nic_ts;
    }

    if !is_cli(matches, "max_tries")
        && let Some(max_tries) = config.max_tries
    {
        args.max_tries = ensure_positive_u32(max_tries, "max_tries")?;
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_u32(value: u32, field: &'static str) -> AppResult<PositiveU32> {
    PositiveU32::try_from(value)
        .map_err(|_err| AppError::config(ConfigError::FieldMustBePositive { field }))
}

fn ensure_positive_u64(value: u64, field: &'static str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value)
        .map_err(|_err| AppError::config(ConfigError::FieldMustBePositive { field }))
}
