use std::time::Duration;

use crate::error::{AppError, AppResult, ConfigError};
use crate::wire::PercentileEstimate;

use super::super::acceptance::{
    judge_latency, latency_sampling_rate, measurement_window, throughput_in_band,
};
use super::super::state::{ExperimentState, GrowReason, LatencyVerdict, Phase};
use super::close_to;

fn p99(lower: u64, upper: u64) -> PercentileEstimate {
    PercentileEstimate {
        lower,
        value: lower,
        upper,
    }
}

#[test]
fn window_covers_sample_count() -> AppResult<()> {
    let window = measurement_window(10_000, 1_000, 20.0)?;
    if window != Duration::from_secs(50) {
        return Err(AppError::config(format!("Unexpected window: {:?}", window)));
    }
    let rounded = measurement_window(10_000, 5_200, 100.0)?;
    if rounded != Duration::from_secs(2) {
        return Err(AppError::config(format!("Expected ceil to 2 s, got {:?}", rounded)));
    }
    Ok(())
}

#[test]
fn window_without_sample_flow_is_rejected() -> AppResult<()> {
    if !matches!(
        measurement_window(10_000, 0, 20.0),
        Err(ConfigError::NoSampleFlow { load: 0, .. })
    ) {
        return Err(AppError::config("Zero load must be rejected"));
    }
    if !matches!(
        measurement_window(10_000, 1_000, 0.0),
        Err(ConfigError::NoSampleFlow { .. })
    ) {
        return Err(AppError::config("Zero sampling rate must be rejected"));
    }
    Ok(())
}

#[test]
fn throughput_band_is_ten_percent() -> AppResult<()> {
    if !throughput_in_band(9_200.0, 10_000) {
        return Err(AppError::config("9200 rps should be accepted at 10000"));
    }
    if throughput_in_band(8_900.0, 10_000) {
        return Err(AppError::config("8900 rps should be rejected at 10000"));
    }
    if throughput_in_band(11_001.0, 10_000) {
        return Err(AppError::config("11001 rps should be rejected at 10000"));
    }
    Ok(())
}

#[test]
fn latency_checks_run_in_order() -> AppResult<()> {
    let wide = p99(100_000, 106_000);
    let narrow = p99(100_000, 102_000);
    let cases = [
        (vec![0.3, 0.0], wide, LatencyVerdict::HalveSamplingRate),
        (
            vec![0.1, 0.0],
            narrow,
            LatencyVerdict::GrowSamples(GrowReason::ZeroCorrelation),
        ),
        (
            vec![0.1],
            wide,
            LatencyVerdict::GrowSamples(GrowReason::WideInterval),
        ),
        (vec![0.1, 0.25], narrow, LatencyVerdict::Accept),
        (Vec::new(), narrow, LatencyVerdict::Accept),
    ];
    for (correlations, estimate, expected) in cases {
        let verdict = judge_latency(&correlations, &estimate, 5);
        if verdict != expected {
            return Err(AppError::config(format!(
                "Correlations {:?}: got {:?}, expected {:?}",
                correlations, verdict, expected
            )));
        }
    }
    Ok(())
}

#[test]
fn wide_interval_adds_one_sample_step() -> AppResult<()> {
    let verdict = judge_latency(&[0.1], &p99(100_000, 106_000), 5);
    let state = ExperimentState::initial().apply(verdict);
    if state.sample_count != 20_000 || state.retries != 1 {
        return Err(AppError::config(format!("Unexpected state: {:?}", state)));
    }
    if state.phase != Phase::WaitForThroughput {
        return Err(AppError::config("Growing samples must not change phase"));
    }
    Ok(())
}

#[test]
fn each_correlation_trigger_halves_sampling_rate() -> AppResult<()> {
    let mut state = ExperimentState::initial();
    for triggers in 1..=4_i32 {
        state = state.apply(LatencyVerdict::HalveSamplingRate);
        let expected = 20.0 / 2f64.powi(triggers);
        if !close_to(state.sampling_rate, expected) {
            return Err(AppError::config(format!(
                "After {} triggers rate is {}, expected {}",
                triggers, state.sampling_rate, expected
            )));
        }
    }
    if state.sample_count != 10_000 {
        return Err(AppError::config("Halving must not touch the sample count"));
    }
    Ok(())
}

#[test]
fn latency_agents_sample_their_share() -> AppResult<()> {
    let rate = latency_sampling_rate(10_000, 16_000, 20.0);
    let expected = 100.0 * 20.0 / (100.0 * 16_000.0 / 26_000.0);
    if !close_to(rate, expected) {
        return Err(AppError::config(format!("Unexpected rate {}", rate)));
    }
    let everything = latency_sampling_rate(1_000_000, 1_000, 20.0);
    if !close_to(everything, 100.0) {
        return Err(AppError::config(format!(
            "Small latency share should sample everything, got {}",
            everything
        )));
    }
    Ok(())
}
