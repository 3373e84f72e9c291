use std::time::Duration;

use tracing::info;

use crate::error::AppResult;
use crate::link::AgentGroup;
use crate::stats::{aggregate_latency, aggregate_throughput};

use super::acceptance::{latency_sampling_rate, measurement_window};
use super::fixed::agent_count_u32;
use super::pattern::ExperimentPattern;
use super::port::{FleetPort, Pacer};
use super::report::{PointReport, TrailerSummary};
use super::runner::Controller;
use super::state::ExperimentState;

const ASYMMETRIC_WARM_UP: Duration = Duration::from_secs(10);

impl<F, P> Controller<F, P>
where
    F: FleetPort,
    P: Pacer,
{
    /// Throughput agents carry `load_rate` between them while each latency
    /// agent runs at `latency_rate`.
    pub(super) async fn run_asymmetric_test(
        &mut self,
        load_rate: u32,
        latency_rate: u32,
        state: ExperimentState,
    ) -> AppResult<PointReport> {
        let throughput_agents = agent_count_u32(self.fleet.agent_count(AgentGroup::Throughput));
        if throughput_agents > 0 {
            let per_agent_load = load_rate.checked_div(throughput_agents).unwrap_or(0);
            self.fleet
                .start_load(AgentGroup::Throughput, per_agent_load)
                .await?;
        }
        self.fleet
            .start_load(AgentGroup::Latency, latency_rate)
            .await?;
        self.pacer.pause(ASYMMETRIC_WARM_UP).await;

        let sampling_rate = latency_sampling_rate(load_rate, latency_rate, state.sampling_rate);
        self.fleet
            .start_measure(AgentGroup::Load, state.sample_count, sampling_rate)
            .await?;
        let window = measurement_window(state.sample_count, latency_rate, sampling_rate)?;
        info!("Will run for {} s", window.as_secs());
        self.pacer.pause(window).await;

        let throughput_reports = self.fleet.report_throughput(AgentGroup::Throughput).await?;
        let latency_reports = self.fleet.report_latency(AgentGroup::Latency).await?;

        let latency_stats: Vec<_> = latency_reports.iter().map(|report| report.stats).collect();
        let latency = aggregate_latency(&latency_stats);
        let counters = aggregate_throughput(
            &throughput_reports
                .iter()
                .map(|report| report.stats)
                .chain(latency_stats.iter().map(|stats| stats.throughput))
                .collect::<Vec<_>>(),
        );
        let mut trailers = TrailerSummary::from_latency(&latency_reports);
        trailers.extend_ia(&throughput_reports);
        let state = state.begin_iteration();

        Ok(PointReport {
            mode: "asymmetric",
            offered_load: load_rate,
            latency_rate: Some(latency_rate),
            sampling_rate,
            sample_count: state.sample_count,
            window_secs: window.as_secs(),
            iterations: state.iterations,
            retries: state.retries,
            throughput: counters.summarize(window),
            counters,
            latency,
            trailers,
        })
    }

    /// Asymmetric test at every load of the sweep. The first failing point
    /// aborts the sweep.
    pub(super) async fn run_step(
        &mut self,
        start: u32,
        end: u32,
        step: u32,
        state: ExperimentState,
    ) -> AppResult<Vec<PointReport>> {
        let loads = ExperimentPattern::step_loads(start, end, step);
        let mut points = Vec::with_capacity(loads.len());
        for load in loads {
            info!("Step point at {} ops/s", load);
            let point = self
                .run_asymmetric_test(load, self.settings.latency_rate, state)
                .await?;
            points.push(point);
        }
        Ok(points)
    }
}
