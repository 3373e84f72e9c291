use tracing::info;

use crate::error::AppResult;
use crate::link::AgentGroup;

use super::pattern::ExperimentPattern;
use super::port::{FleetPort, Pacer};
use super::report::ExperimentOutcome;
use super::state::{DEFAULT_MAX_TRIES, ExperimentState};

/// Sampling rates visited by the correlation sweep, in percent.
pub const CORRELATION_SWEEP_RATES: [f64; 5] = [0.01, 0.05, 0.1, 0.5, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Per-agent rate of the latency agents in asymmetric runs, in ops/s.
    pub latency_rate: u32,
    /// Widest acceptable p99 confidence interval, in microseconds.
    pub ci_size_us: u64,
    pub max_tries: u32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            latency_rate: 16_000,
            ci_size_us: 5,
            max_tries: DEFAULT_MAX_TRIES,
        }
    }
}

/// Drives one pattern invocation against a fleet.
pub struct Controller<F, P> {
    pub(super) fleet: F,
    pub(super) pacer: P,
    pub(super) settings: ControllerSettings,
}

impl<F, P> Controller<F, P>
where
    F: FleetPort,
    P: Pacer,
{
    pub const fn new(fleet: F, pacer: P, settings: ControllerSettings) -> Self {
        Self {
            fleet,
            pacer,
            settings,
        }
    }

    pub fn into_parts(self) -> (F, P) {
        (self.fleet, self.pacer)
    }

    /// Runs `pattern` from fresh adaptive state.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the fleet lacks the agents the pattern
    /// needs, any transport or protocol error, or
    /// `ExperimentError::MaxTriesReached` when a fixed run never converges.
    pub async fn run(&mut self, pattern: ExperimentPattern) -> AppResult<ExperimentOutcome> {
        pattern.ensure_agents(|group| self.fleet.agent_count(group))?;
        info!("Running load pattern {}", pattern);
        let state = ExperimentState::initial();
        let points = match pattern {
            ExperimentPattern::Fixed { rate } => vec![self.run_fixed(rate, state).await?],
            ExperimentPattern::Step { start, end, step } => {
                self.run_step(start, end, step, state).await?
            }
            ExperimentPattern::Test { rate, samples } => {
                let state = state.with_sample_count(samples);
                if self.fleet.agent_count(AgentGroup::Symmetric) > 0 {
                    vec![self.run_symmetric_test(rate, state).await?]
                } else {
                    let latency_rate = self.settings.latency_rate;
                    vec![self.run_asymmetric_test(rate, latency_rate, state).await?]
                }
            }
            ExperimentPattern::Corr { rate, samples } => {
                let base = state.with_sample_count(samples);
                let mut points = Vec::with_capacity(CORRELATION_SWEEP_RATES.len());
                for sampling_rate in CORRELATION_SWEEP_RATES {
                    info!("Correlation sweep at {}% sampling", sampling_rate);
                    let sweep_state = base.with_sampling_rate(sampling_rate);
                    points.push(self.run_symmetric_test(rate, sweep_state).await?);
                }
                points
            }
        };
        Ok(ExperimentOutcome {
            pattern: pattern.to_string(),
            points,
        })
    }
}
