use clap::{CommandFactory, FromArgMatches};
use tempfile::tempdir;

use super::{RunSettings, apply_config, load_config_file};
use crate::args::{CommProto, CoordinatorArgs, OutputFormat};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::experiment::ExperimentPattern;

fn parse_with_matches(argv: &[&str]) -> AppResult<(CoordinatorArgs, clap::ArgMatches)> {
    let matches = CoordinatorArgs::command().try_get_matches_from(argv.iter().copied())?;
    let args = CoordinatorArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

#[test]
fn parse_toml_config() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("fleetbench.toml");
    let content = r#"
target_host = "10.0.0.5:11211"
load_agents = ["node1", "node2"]
lt_agents = ["node3"]
comm_proto = "R2P2"
load_pattern = "step:1000:5000:1000"
ci_size = 10
output_format = "json"
"#;
    std::fs::write(&path, content)?;

    let config = load_config_file(&path)?;
    if config.target_host.as_deref() != Some("10.0.0.5:11211") {
        return Err(AppError::config("Unexpected target host"));
    }
    if config.load_agents.as_ref().map(Vec::len) != Some(2) {
        return Err(AppError::config("Expected two load agents"));
    }
    if config.comm_proto != Some(CommProto::R2p2) || config.output_format != Some(OutputFormat::Json)
    {
        return Err(AppError::config("Unexpected enum values"));
    }
    if config.ci_size != Some(10) {
        return Err(AppError::config("Unexpected ci size"));
    }
    Ok(())
}

#[test]
fn parse_json_config() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("fleetbench.json");
    std::fs::write(
        &path,
        r#"{"sym_agents": ["sym1"], "load_pattern": "fixed:20000", "nic_ts": true}"#,
    )?;

    let config = load_config_file(&path)?;
    if config.sym_agents != Some(vec!["sym1".to_owned()]) || config.nic_ts != Some(true) {
        return Err(AppError::config("Unexpected JSON values"));
    }
    Ok(())
}

#[test]
fn unsupported_extension_rejected() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("fleetbench.yaml");
    std::fs::write(&path, "target_host: x")?;

    match load_config_file(&path) {
        Err(AppError::Config(ConfigError::UnsupportedExtension { ext })) if ext == "yaml" => Ok(()),
        Err(err) => Err(AppError::config(format!("Unexpected error: {}", err))),
        Ok(_) => Err(AppError::config("Expected unsupported extension error")),
    }
}

#[test]
fn malformed_toml_reports_path() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "load_agents = [\"a\"")?;

    match load_config_file(&path) {
        Err(AppError::Config(ConfigError::ParseToml { path: reported, .. })) if reported == path => {
            Ok(())
        }
        Err(err) => Err(AppError::config(format!("Unexpected error: {}", err))),
        Ok(_) => Err(AppError::config("Expected parse failure")),
    }
}

#[test]
fn cli_values_win_over_config() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("fleetbench.toml");
    std::fs::write(
        &path,
        "target_host = \"file:1\"\nload_pattern = \"fixed:100\"\nlt_threads = 4\n",
    )?;
    let config = load_config_file(&path)?;

    let (mut args, matches) =
        parse_with_matches(&["fleetbench", "--load-pattern", "test:100:1000"])?;
    apply_config(&mut args, &matches, &config)?;

    if args.load_pattern != "test:100:1000" {
        return Err(AppError::config(format!(
            "CLI pattern overridden: {}",
            args.load_pattern
        )));
    }
    if args.target_host != "file:1" || args.lt_threads.get() != 4 {
        return Err(AppError::config("Config values should fill defaults"));
    }
    Ok(())
}

#[test]
fn zero_from_config_rejected() -> AppResult<()> {
    let config = super::types::ConfigFile {
        max_tries: Some(0),
        ..Default::default()
    };
    let (mut args, matches) = parse_with_matches(&["fleetbench"])?;
    match apply_config(&mut args, &matches, &config) {
        Err(AppError::Config(ConfigError::FieldMustBePositive { field })) if field == "max_tries" => {
            Ok(())
        }
        Err(err) => Err(AppError::config(format!("Unexpected error: {}", err))),
        Ok(()) => Err(AppError::config("Expected zero max_tries to be rejected")),
    }
}

#[test]
fn resolve_builds_settings() -> AppResult<()> {
    let (args, _matches) = parse_with_matches(&[
        "fleetbench",
        "--load-agents",
        "node1,node2",
        "--lt-agents",
        "node3",
        "--lqps",
        "8000",
    ])?;
    let settings = RunSettings::resolve(&args)?;

    if settings.experiment.pattern
        != (ExperimentPattern::Step {
            start: 10_000,
            end: 100_000,
            step: 50_000,
        })
    {
        return Err(AppError::config("Unexpected default pattern"));
    }
    let controller = settings.controller_settings();
    if controller.latency_rate != 8_000 || controller.ci_size_us != 5 || controller.max_tries != 20
    {
        return Err(AppError::config(format!(
            "Unexpected controller settings: {:?}",
            controller
        )));
    }
    if settings.experiment.roster.throughput.len() != 2 || settings.experiment.roster.latency.len() != 1
    {
        return Err(AppError::config("Unexpected roster"));
    }
    Ok(())
}

#[test]
fn resolve_requires_agents() -> AppResult<()> {
    let (args, _matches) = parse_with_matches(&["fleetbench"])?;
    match RunSettings::resolve(&args) {
        Err(AppError::Validation(ValidationError::NoAgents)) => Ok(()),
        Err(err) => Err(AppError::config(format!("Unexpected error: {}", err))),
        Ok(_) => Err(AppError::config("Expected missing agents error")),
    }
}

#[test]
fn resolve_rejects_host_in_two_roles() -> AppResult<()> {
    let (args, _matches) = parse_with_matches(&[
        "fleetbench",
        "--load-agents",
        "node1",
        "--lt-agents",
        "node1",
    ])?;
    match RunSettings::resolve(&args) {
        Err(AppError::Validation(ValidationError::DuplicateAgent { name })) if name == "node1" => {
            Ok(())
        }
        Err(err) => Err(AppError::config(format!("Unexpected error: {}", err))),
        Ok(_) => Err(AppError::config("Expected duplicate host error")),
    }
}

#[test]
fn resolve_checks_pattern_against_roster() -> AppResult<()> {
    let (args, _matches) = parse_with_matches(&[
        "fleetbench",
        "--load-agents",
        "node1",
        "--load-pattern",
        "fixed:10000",
    ])?;
    match RunSettings::resolve(&args) {
        Err(AppError::Config(ConfigError::FixedRequiresSymmetricAgents)) => Ok(()),
        Err(err) => Err(AppError::config(format!("Unexpected error: {}", err))),
        Ok(_) => Err(AppError::config("Expected fixed pattern to need symmetric agents")),
    }
}
