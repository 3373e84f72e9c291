use std::time::Duration;

use crate::error::{AppError, AppResult, ConfigError, ExperimentError, TransportError};
use crate::link::AgentGroup;

use super::super::pattern::ExperimentPattern;
use super::super::runner::{CORRELATION_SWEEP_RATES, Controller, ControllerSettings};
use super::{RecordingPacer, ScriptedFleet, close_to, good_latency, latency, throughput};

fn settings(max_tries: u32) -> ControllerSettings {
    ControllerSettings {
        latency_rate: 16_000,
        ci_size_us: 5,
        max_tries,
    }
}

#[tokio::test(flavor = "current_thread")]
async fn fixed_gives_up_after_max_tries() -> AppResult<()> {
    let fleet =
        ScriptedFleet::symmetric(2).with_throughput(vec![throughput(2_000), throughput(2_500)]);
    let mut controller = Controller::new(fleet, RecordingPacer::default(), settings(3));

    let result = controller.run(ExperimentPattern::Fixed { rate: 10_000 }).await;

    match result {
        Err(AppError::Experiment(ExperimentError::MaxTriesReached {
            iterations,
            retries,
            phase,
            ..
        })) => {
            if iterations != 3 || retries != 3 || phase != "wait-for-throughput" {
                return Err(AppError::experiment(format!(
                    "Unexpected failure details: {} {} {}",
                    iterations, retries, phase
                )));
            }
        }
        Err(err) => {
            return Err(AppError::experiment(format!("Unexpected error: {}", err)));
        }
        Ok(outcome) => {
            return Err(AppError::experiment(format!(
                "Expected max tries, got {:?}",
                outcome
            )));
        }
    }
    let (fleet, _pacer) = controller.into_parts();
    let measures = fleet.measure_calls().len();
    if measures != 3 {
        return Err(AppError::experiment(format!(
            "Expected 3 measurements, got {}",
            measures
        )));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn fixed_halves_sampling_rate_on_correlated_samples() -> AppResult<()> {
    let fleet = ScriptedFleet::symmetric(2)
        .with_throughput(vec![throughput(5_000), throughput(5_000)])
        .with_latency(vec![latency(Some(0.5), 100_000, 101_000), good_latency()])
        .with_latency(vec![good_latency(), latency(Some(0.4), 100_000, 101_000)])
        .with_latency(vec![good_latency(), good_latency()]);
    let mut controller = Controller::new(fleet, RecordingPacer::default(), settings(20));

    let outcome = controller.run(ExperimentPattern::Fixed { rate: 10_000 }).await?;

    let point = outcome
        .points
        .first()
        .ok_or_else(|| AppError::experiment("Expected one point"))?;
    if !close_to(point.sampling_rate, 5.0) || point.retries != 2 || point.iterations != 4 {
        return Err(AppError::experiment(format!(
            "Unexpected point: rate {} retries {} iterations {}",
            point.sampling_rate, point.retries, point.iterations
        )));
    }
    let (fleet, _pacer) = controller.into_parts();
    let rates: Vec<f64> = fleet
        .measure_calls()
        .iter()
        .map(|(_, _, rate)| *rate)
        .collect();
    let expected = [40.0, 40.0, 20.0, 10.0];
    if rates.len() != expected.len()
        || rates
            .iter()
            .zip(expected.iter())
            .any(|(actual, wanted)| !close_to(*actual, *wanted))
    {
        return Err(AppError::experiment(format!(
            "Unexpected per-agent sampling rates: {:?}",
            rates
        )));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn fixed_wide_interval_grows_sample_count() -> AppResult<()> {
    let fleet = ScriptedFleet::symmetric(1)
        .with_throughput(vec![throughput(10_000)])
        .with_latency(vec![latency(Some(0.1), 100_000, 106_000)])
        .with_latency(vec![good_latency()]);
    let mut controller = Controller::new(fleet, RecordingPacer::default(), settings(20));

    let outcome = controller.run(ExperimentPattern::Fixed { rate: 10_000 }).await?;

    let samples: Vec<u32> = outcome.points.iter().map(|point| point.sample_count).collect();
    if samples != vec![20_000] {
        return Err(AppError::experiment(format!("Unexpected samples: {:?}", samples)));
    }
    let (fleet, _pacer) = controller.into_parts();
    let counts: Vec<u32> = fleet
        .measure_calls()
        .iter()
        .map(|(_, count, _)| *count)
        .collect();
    if counts != vec![10_000, 10_000, 20_000] {
        return Err(AppError::experiment(format!(
            "Unexpected measurement sample counts: {:?}",
            counts
        )));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn fixed_zero_correlation_grows_sample_count() -> AppResult<()> {
    let fleet = ScriptedFleet::symmetric(1)
        .with_throughput(vec![throughput(10_000)])
        .with_latency(vec![latency(Some(0.0), 100_000, 101_000)])
        .with_latency(vec![good_latency()]);
    let mut controller = Controller::new(fleet, RecordingPacer::default(), settings(20));

    let outcome = controller.run(ExperimentPattern::Fixed { rate: 10_000 }).await?;

    let point = outcome
        .points
        .first()
        .ok_or_else(|| AppError::experiment("Expected one point"))?;
    if point.sample_count != 20_000 || !close_to(point.sampling_rate, 20.0) {
        return Err(AppError::experiment(format!(
            "Unexpected point: {} samples at {}%",
            point.sample_count, point.sampling_rate
        )));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn fixed_waits_window_plus_slack() -> AppResult<()> {
    let fleet = ScriptedFleet::symmetric(2)
        .with_throughput(vec![throughput(1_000), throughput(1_000)])
        .with_latency(vec![good_latency(), good_latency()]);
    let mut controller = Controller::new(fleet, RecordingPacer::default(), settings(20));

    controller.run(ExperimentPattern::Fixed { rate: 2_000 }).await?;

    let (fleet, pacer) = controller.into_parts();
    let expected = vec![
        Duration::from_secs(2),
        Duration::from_secs(1),
        Duration::from_secs(26),
    ];
    if pacer.pauses != expected {
        return Err(AppError::experiment(format!(
            "Unexpected pauses: {:?}",
            pacer.pauses
        )));
    }
    if fleet.load_calls() != vec![(AgentGroup::Symmetric, 1_000)] {
        return Err(AppError::experiment(format!(
            "Unexpected load calls: {:?}",
            fleet.load_calls()
        )));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn fixed_requires_symmetric_agents() -> AppResult<()> {
    let fleet = ScriptedFleet::asymmetric(1, 1);
    let mut controller = Controller::new(fleet, RecordingPacer::default(), settings(20));

    let result = controller.run(ExperimentPattern::Fixed { rate: 1_000 }).await;

    if matches!(
        result,
        Err(AppError::Config(ConfigError::FixedRequiresSymmetricAgents))
    ) {
        return Ok(());
    }
    Err(AppError::experiment(format!(
        "Expected configuration error, got {:?}",
        result
    )))
}

#[tokio::test(flavor = "current_thread")]
async fn step_runs_asymmetric_test_per_load() -> AppResult<()> {
    let fleet = ScriptedFleet::asymmetric(1, 1)
        .with_throughput(vec![throughput(10_000)])
        .with_latency(vec![good_latency()]);
    let mut controller = Controller::new(fleet, RecordingPacer::default(), settings(20));

    let pattern = "step:10000:100000:50000".parse::<ExperimentPattern>()?;
    let outcome = controller.run(pattern).await?;

    let loads: Vec<u32> = outcome.points.iter().map(|point| point.offered_load).collect();
    if loads != vec![10_000, 60_000] {
        return Err(AppError::experiment(format!("Unexpected loads: {:?}", loads)));
    }
    let (fleet, _pacer) = controller.into_parts();
    let expected = vec![
        (AgentGroup::Throughput, 10_000),
        (AgentGroup::Latency, 16_000),
        (AgentGroup::Throughput, 60_000),
        (AgentGroup::Latency, 16_000),
    ];
    if fleet.load_calls() != expected {
        return Err(AppError::experiment(format!(
            "Unexpected load calls: {:?}",
            fleet.load_calls()
        )));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn asymmetric_test_merges_latency_agent_throughput() -> AppResult<()> {
    let fleet = ScriptedFleet::asymmetric(2, 1)
        .with_throughput(vec![throughput(4_000), throughput(6_000)])
        .with_latency(vec![good_latency()]);
    let mut controller = Controller::new(fleet, RecordingPacer::default(), settings(20));

    let outcome = controller
        .run(ExperimentPattern::Test {
            rate: 10_000,
            samples: 10_000,
        })
        .await?;

    let point = outcome
        .points
        .first()
        .ok_or_else(|| AppError::experiment("Expected one point"))?;
    if point.counters.agents != 3 || point.counters.rx_reqs != 20_000 {
        return Err(AppError::experiment(format!(
            "Unexpected merged counters: {:?}",
            point.counters
        )));
    }
    if point.trailers.ia_compliance.len() != 3 {
        return Err(AppError::experiment(format!(
            "Expected IA flags from every agent, got {:?}",
            point.trailers.ia_compliance
        )));
    }
    let (fleet, pacer) = controller.into_parts();
    if pacer.pauses != vec![Duration::from_secs(10), Duration::from_secs(2)] {
        return Err(AppError::experiment(format!(
            "Unexpected pauses: {:?}",
            pacer.pauses
        )));
    }
    let measures = fleet.measure_calls();
    let Some((group, samples, rate)) = measures.first().copied() else {
        return Err(AppError::experiment("Expected a measurement"));
    };
    let expected_rate = 100.0 * 20.0 / (100.0 * 16_000.0 / 26_000.0);
    if group != AgentGroup::Load || samples != 10_000 || !close_to(rate, expected_rate) {
        return Err(AppError::experiment(format!(
            "Unexpected measurement: {:?} {} {}",
            group, samples, rate
        )));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn test_prefers_symmetric_agents() -> AppResult<()> {
    let fleet = ScriptedFleet::symmetric(1).with_latency(vec![good_latency()]);
    let mut controller = Controller::new(fleet, RecordingPacer::default(), settings(20));

    let outcome = controller
        .run(ExperimentPattern::Test {
            rate: 2_000,
            samples: 10_000,
        })
        .await?;

    let modes: Vec<&str> = outcome.points.iter().map(|point| point.mode).collect();
    if modes != vec!["symmetric"] {
        return Err(AppError::experiment(format!("Unexpected modes: {:?}", modes)));
    }
    let (_fleet, pacer) = controller.into_parts();
    let expected = vec![
        Duration::from_secs(5),
        Duration::from_secs(25),
        Duration::from_secs(5),
    ];
    if pacer.pauses != expected {
        return Err(AppError::experiment(format!(
            "Unexpected pauses: {:?}",
            pacer.pauses
        )));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn corr_sweeps_sampling_rates() -> AppResult<()> {
    let fleet = ScriptedFleet::symmetric(1).with_latency(vec![good_latency()]);
    let mut controller = Controller::new(fleet, RecordingPacer::default(), settings(20));

    let outcome = controller
        .run(ExperimentPattern::Corr {
            rate: 100_000,
            samples: 1_000,
        })
        .await?;

    if outcome.points.len() != CORRELATION_SWEEP_RATES.len() {
        return Err(AppError::experiment(format!(
            "Expected {} points, got {}",
            CORRELATION_SWEEP_RATES.len(),
            outcome.points.len()
        )));
    }
    let (fleet, _pacer) = controller.into_parts();
    let rates: Vec<f64> = fleet
        .measure_calls()
        .iter()
        .map(|(_, _, rate)| *rate)
        .collect();
    if rates.len() != CORRELATION_SWEEP_RATES.len()
        || rates
            .iter()
            .zip(CORRELATION_SWEEP_RATES.iter())
            .any(|(actual, wanted)| !close_to(*actual, *wanted))
    {
        return Err(AppError::experiment(format!(
            "Unexpected sweep rates: {:?}",
            rates
        )));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn transport_failure_aborts_pattern() -> AppResult<()> {
    let mut fleet = ScriptedFleet::asymmetric(1, 1).with_throughput(vec![throughput(10_000)]);
    fleet.fail_latency = true;
    let mut controller = Controller::new(fleet, RecordingPacer::default(), settings(20));

    let result = controller
        .run(ExperimentPattern::Step {
            start: 10_000,
            end: 100_000,
            step: 50_000,
        })
        .await;

    if !matches!(
        result,
        Err(AppError::Transport(TransportError::ReadTimeout { .. }))
    ) {
        return Err(AppError::experiment(format!(
            "Expected transport failure, got {:?}",
            result
        )));
    }
    let (fleet, _pacer) = controller.into_parts();
    if fleet.load_calls().len() != 2 {
        return Err(AppError::experiment(
            "Sweep must stop at the first failing point",
        ));
    }
    Ok(())
}
