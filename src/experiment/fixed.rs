use std::time::Duration;

use tracing::{info, warn};

use crate::error::{AppError, AppResult, ExperimentError};
use crate::link::AgentGroup;
use crate::stats::{aggregate_latency, aggregate_throughput};

use super::acceptance::{judge_latency, measurement_window, throughput_in_band};
use super::port::{FleetPort, Pacer};
use super::report::{PointReport, TrailerSummary};
use super::runner::Controller;
use super::state::{ExperimentState, GrowReason, LatencyVerdict, Phase};

const FIXED_SETTLE: Duration = Duration::from_secs(2);
const THROUGHPUT_PROBE: Duration = Duration::from_secs(1);
/// Added to the computed window before reading latency.
const LATENCY_SLACK: Duration = Duration::from_secs(1);

impl<F, P> Controller<F, P>
where
    F: FleetPort,
    P: Pacer,
{
    /// Adaptive symmetric run: probe throughput until it lands in band, then
    /// measure latency until correlation, convergence and interval width pass.
    pub(super) async fn run_fixed(
        &mut self,
        rate: u32,
        initial: ExperimentState,
    ) -> AppResult<PointReport> {
        let agents = agent_count_u32(self.fleet.agent_count(AgentGroup::Symmetric));
        let per_agent_load = rate.checked_div(agents).unwrap_or(0);
        self.fleet
            .start_load(AgentGroup::Symmetric, per_agent_load)
            .await?;
        self.pacer.pause(FIXED_SETTLE).await;

        let mut state = initial;
        let mut accepted = None;
        while state.phase != Phase::Exit && state.iterations < self.settings.max_tries {
            state = state.begin_iteration();
            let per_agent_sampling_rate = f64::from(agents) * state.sampling_rate;
            match state.phase {
                Phase::WaitForThroughput => {
                    self.fleet
                        .start_measure(
                            AgentGroup::Symmetric,
                            state.sample_count,
                            per_agent_sampling_rate,
                        )
                        .await?;
                    self.pacer.pause(THROUGHPUT_PROBE).await;
                    let reports = self.fleet.report_throughput(AgentGroup::Symmetric).await?;
                    let stats: Vec<_> = reports.iter().map(|report| report.stats).collect();
                    let rps = aggregate_throughput(&stats).summarize(THROUGHPUT_PROBE).rps;
                    if throughput_in_band(rps, rate) {
                        info!("Throughput {:.2} rps within band of {} ops/s", rps, rate);
                        state = state.throughput_accepted();
                    } else {
                        warn!(
                            "Throughput {:.2} rps outside band of {} ops/s (iteration {})",
                            rps, rate, state.iterations
                        );
                        state = state.retry();
                    }
                }
                Phase::WaitForLatency => {
                    self.fleet
                        .start_measure(
                            AgentGroup::Symmetric,
                            state.sample_count,
                            per_agent_sampling_rate,
                        )
                        .await?;
                    let window = measurement_window(
                        state.sample_count,
                        per_agent_load,
                        per_agent_sampling_rate,
                    )?;
                    let waited = window.saturating_add(LATENCY_SLACK);
                    info!(
                        "Measuring {} samples at {}% for {} s",
                        state.sample_count,
                        state.sampling_rate,
                        waited.as_secs()
                    );
                    self.pacer.pause(waited).await;
                    let reports = self.fleet.report_latency(AgentGroup::Symmetric).await?;
                    let stats: Vec<_> = reports.iter().map(|report| report.stats).collect();
                    let latency = aggregate_latency(&stats);
                    let trailers = TrailerSummary::from_latency(&reports);
                    let verdict = judge_latency(
                        &trailers.correlations,
                        &latency.p99,
                        self.settings.ci_size_us,
                    );
                    log_verdict(verdict, &state);
                    let measured = state;
                    state = state.apply(verdict);
                    if state.phase == Phase::Exit {
                        accepted = Some(PointReport {
                            mode: "fixed",
                            offered_load: rate,
                            latency_rate: None,
                            sampling_rate: measured.sampling_rate,
                            sample_count: measured.sample_count,
                            window_secs: waited.as_secs(),
                            iterations: state.iterations,
                            retries: state.retries,
                            throughput: latency.throughput.summarize(waited),
                            counters: latency.throughput,
                            latency,
                            trailers,
                        });
                    }
                }
                Phase::Exit => break,
            }
        }

        accepted.ok_or_else(|| {
            AppError::experiment(ExperimentError::MaxTriesReached {
                pattern: format!("fixed:{}", rate),
                iterations: state.iterations,
                retries: state.retries,
                phase: state.phase.label(),
            })
        })
    }
}

fn log_verdict(verdict: LatencyVerdict, state: &ExperimentState) {
    match verdict {
        LatencyVerdict::HalveSamplingRate => warn!(
            "IID correlation above threshold at {}% sampling; halving sampling rate",
            state.sampling_rate
        ),
        LatencyVerdict::GrowSamples(GrowReason::ZeroCorrelation) => warn!(
            "Latency not converged with {} samples; adding more",
            state.sample_count
        ),
        LatencyVerdict::GrowSamples(GrowReason::WideInterval) => warn!(
            "p99 confidence interval too wide with {} samples; adding more",
            state.sample_count
        ),
        LatencyVerdict::Accept => info!(
            "Latency accepted after {} iterations ({} retries)",
            state.iterations, state.retries
        ),
    }
}

pub(super) fn agent_count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
