use serde::Serialize;

pub const INITIAL_SAMPLE_COUNT: u32 = 10_000;
/// Percent of operations sampled when a pattern starts.
pub const INITIAL_SAMPLING_RATE: f64 = 20.0;
pub const SAMPLE_STEP: u32 = 10_000;
pub const DEFAULT_MAX_TRIES: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    WaitForThroughput,
    WaitForLatency,
    Exit,
}

impl Phase {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Phase::WaitForThroughput => "wait-for-throughput",
            Phase::WaitForLatency => "wait-for-latency",
            Phase::Exit => "exit",
        }
    }
}

/// Why a latency measurement asks for more samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowReason {
    /// An agent reported an IID correlation of exactly zero.
    ZeroCorrelation,
    /// The merged p99 confidence interval is wider than allowed.
    WideInterval,
}

/// Outcome of the latency acceptance checks, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyVerdict {
    /// Samples are correlated; sample less often.
    HalveSamplingRate,
    GrowSamples(GrowReason),
    Accept,
}

/// Adaptive parameters of one pattern invocation.
///
/// The sampling rate only ever halves and the sample count only ever grows
/// until the next invocation starts from [`ExperimentState::initial`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExperimentState {
    pub sample_count: u32,
    pub sampling_rate: f64,
    pub phase: Phase,
    /// Loop iterations so far, checked against the try budget.
    pub iterations: u32,
    /// Failed acceptance checks so far.
    pub retries: u32,
}

impl Default for ExperimentState {
    fn default() -> Self {
        Self::initial()
    }
}

impl ExperimentState {
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            sample_count: INITIAL_SAMPLE_COUNT,
            sampling_rate: INITIAL_SAMPLING_RATE,
            phase: Phase::WaitForThroughput,
            iterations: 0,
            retries: 0,
        }
    }

    #[must_use]
    pub const fn with_sample_count(self, sample_count: u32) -> Self {
        Self {
            sample_count,
            ..self
        }
    }

    #[must_use]
    pub const fn with_sampling_rate(self, sampling_rate: f64) -> Self {
        Self {
            sampling_rate,
            ..self
        }
    }

    #[must_use]
    pub const fn begin_iteration(self) -> Self {
        Self {
            iterations: self.iterations.saturating_add(1),
            ..self
        }
    }

    /// Throughput landed in band; move on to the latency phase.
    #[must_use]
    pub const fn throughput_accepted(self) -> Self {
        Self {
            phase: Phase::WaitForLatency,
            ..self
        }
    }

    /// Same parameters, same phase, one more retry.
    #[must_use]
    pub const fn retry(self) -> Self {
        Self {
            retries: self.retries.saturating_add(1),
            ..self
        }
    }

    #[must_use]
    pub fn apply(self, verdict: LatencyVerdict) -> Self {
        match verdict {
            LatencyVerdict::HalveSamplingRate => Self {
                sampling_rate: self.sampling_rate / 2.0,
                ..self.retry()
            },
            LatencyVerdict::GrowSamples(_) => Self {
                sample_count: self.sample_count.saturating_add(SAMPLE_STEP),
                ..self.retry()
            },
            LatencyVerdict::Accept => Self {
                phase: Phase::Exit,
                ..self
            },
        }
    }
}
