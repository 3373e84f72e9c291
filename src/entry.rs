use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::info;

use crate::args::CoordinatorArgs;
use crate::config::{RunSettings, apply_config, load_config};
use crate::coordinator::{deploy_agents, render, run_experiment};
use crate::deploy::{SshDeployer, launch_plan};
use crate::error::AppResult;

/// Parses the command line, resolves settings and runs the coordinator.
///
/// # Errors
///
/// Returns any configuration, deployment, transport, protocol or experiment
/// error; the caller reports it and exits non-zero.
pub fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;

    crate::logger::init_logging(args.verbose, args.no_color);

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }
    let settings = RunSettings::resolve(&args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(settings))
}

fn parse_args() -> AppResult<(CoordinatorArgs, ArgMatches)> {
    let matches = CoordinatorArgs::command().get_matches();
    let args = CoordinatorArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

async fn run_async(settings: RunSettings) -> AppResult<()> {
    let plan = launch_plan(&settings);
    let deployed = if plan.is_empty() {
        info!("No agent binaries configured; using agents that are already running");
        Vec::new()
    } else {
        deploy_agents(&SshDeployer::from_env()?, &plan).await?
    };

    let outcome = run_experiment(&settings).await?;
    print!("{}", render(&outcome, settings.output_format)?);

    info!("Stopping {} deployed agents", deployed.len());
    drop(deployed);
    Ok(())
}
