use std::time::Duration;

use tracing::info;

use crate::error::AppResult;
use crate::link::AgentGroup;
use crate::stats::aggregate_latency;

use super::acceptance::measurement_window;
use super::fixed::agent_count_u32;
use super::port::{FleetPort, Pacer};
use super::report::{PointReport, TrailerSummary};
use super::runner::Controller;
use super::state::ExperimentState;

const SYMMETRIC_WARM_UP: Duration = Duration::from_secs(5);
const SYMMETRIC_COOL_DOWN: Duration = Duration::from_secs(5);

impl<F, P> Controller<F, P>
where
    F: FleetPort,
    P: Pacer,
{
    /// One measurement on the symmetric agents with the given sample count
    /// and sampling rate. No acceptance checks.
    pub(super) async fn run_symmetric_test(
        &mut self,
        rate: u32,
        state: ExperimentState,
    ) -> AppResult<PointReport> {
        let agents = agent_count_u32(self.fleet.agent_count(AgentGroup::Symmetric));
        let per_agent_load = rate.checked_div(agents).unwrap_or(0);
        self.fleet
            .start_load(AgentGroup::Symmetric, per_agent_load)
            .await?;
        self.pacer.pause(SYMMETRIC_WARM_UP).await;

        info!(
            "Start measure: {} samples at {}% per agent",
            state.sample_count, state.sampling_rate
        );
        self.fleet
            .start_measure(AgentGroup::Symmetric, state.sample_count, state.sampling_rate)
            .await?;
        let window = measurement_window(state.sample_count, per_agent_load, state.sampling_rate)?;
        info!("Will run for {} s", window.as_secs());
        self.pacer.pause(window).await;

        let reports = self.fleet.report_latency(AgentGroup::Symmetric).await?;
        self.pacer.pause(SYMMETRIC_COOL_DOWN).await;

        let stats: Vec<_> = reports.iter().map(|report| report.stats).collect();
        let latency = aggregate_latency(&stats);
        let state = state.begin_iteration();
        Ok(PointReport {
            mode: "symmetric",
            offered_load: rate,
            latency_rate: None,
            sampling_rate: state.sampling_rate,
            sample_count: state.sample_count,
            window_secs: window.as_secs(),
            iterations: state.iterations,
            retries: state.retries,
            throughput: latency.throughput.summarize(window),
            counters: latency.throughput,
            latency,
            trailers: TrailerSummary::from_latency(&reports),
        })
    }
}
