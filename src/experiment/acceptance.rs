use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;
use crate::wire::PercentileEstimate;

use super::state::{GrowReason, LatencyVerdict};

/// Correlations above this mean the samples are not independent.
pub const MAX_IID_CORRELATION: f64 = 0.25;
pub const THROUGHPUT_LOWER_BAND: f64 = 0.9;
pub const THROUGHPUT_UPPER_BAND: f64 = 1.1;

/// `rps` must land within 90% to 110% of the offered rate.
#[must_use]
pub fn throughput_in_band(rps: f64, rate: u32) -> bool {
    let expected = f64::from(rate);
    rps >= expected * THROUGHPUT_LOWER_BAND && rps <= expected * THROUGHPUT_UPPER_BAND
}

/// Latency checks in order: correlation, zero correlation, p99 interval width.
#[must_use]
pub fn judge_latency(
    correlations: &[f64],
    p99: &PercentileEstimate,
    ci_size_us: u64,
) -> LatencyVerdict {
    if correlations
        .iter()
        .any(|correlation| *correlation > MAX_IID_CORRELATION)
    {
        return LatencyVerdict::HalveSamplingRate;
    }
    if correlations.iter().any(|correlation| *correlation == 0.0) {
        warn!("An agent reported an IID correlation of exactly 0; treating it as unconverged");
        return LatencyVerdict::GrowSamples(GrowReason::ZeroCorrelation);
    }
    if p99.interval_width() > ci_size_us.saturating_mul(1_000) {
        return LatencyVerdict::GrowSamples(GrowReason::WideInterval);
    }
    LatencyVerdict::Accept
}

/// Seconds needed to collect `sample_count` samples from an agent offering
/// `load` ops/s at `sampling_rate` percent, rounded up.
///
/// # Errors
///
/// Returns `ConfigError::NoSampleFlow` when no samples would ever arrive.
pub fn measurement_window(
    sample_count: u32,
    load: u32,
    sampling_rate: f64,
) -> Result<Duration, ConfigError> {
    let samples_per_sec = f64::from(load) * sampling_rate / 100.0;
    let no_flow = || ConfigError::NoSampleFlow {
        load: u64::from(load),
        sampling_rate,
    };
    if samples_per_sec.is_nan() || samples_per_sec <= 0.0 {
        return Err(no_flow());
    }
    let seconds = (f64::from(sample_count) / samples_per_sec).ceil();
    Duration::try_from_secs_f64(seconds).map_err(|_err| no_flow())
}

/// Sampling rate for the asymmetric test, where latency agents carry only a
/// `latency_rate / (load_rate + latency_rate)` share of the traffic.
#[must_use]
pub fn latency_sampling_rate(load_rate: u32, latency_rate: u32, sampling_rate: f64) -> f64 {
    let total = f64::from(load_rate) + f64::from(latency_rate);
    if total <= 0.0 {
        return 100.0;
    }
    let latency_portion = 100.0 * f64::from(latency_rate) / total;
    if latency_portion > sampling_rate {
        100.0 * sampling_rate / latency_portion
    } else {
        100.0
    }
}
