use std::time::Duration;

use serde::Serialize;

use crate::error::AppResult;
use crate::stats::{LatencyAggregate, ThroughputAggregate, ThroughputSummary};
use crate::wire::{LatencyReport, PercentileEstimate, ThroughputReport};

/// Per-agent trailer values, in agent order. Agents that sent no trailer are
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrailerSummary {
    pub convergence: Vec<u32>,
    pub correlations: Vec<f64>,
    pub ia_compliance: Vec<u32>,
}

impl TrailerSummary {
    #[must_use]
    pub fn from_latency(reports: &[LatencyReport]) -> Self {
        let mut summary = Self::default();
        for trailer in reports.iter().filter_map(|report| report.trailer) {
            summary.convergence.push(trailer.convergence);
            summary.correlations.push(trailer.iid_correlation);
            summary.ia_compliance.push(trailer.ia_compliance);
        }
        summary
    }

    /// Adds the inter-arrival flags of throughput-only agents.
    pub fn extend_ia(&mut self, reports: &[ThroughputReport]) {
        self.ia_compliance
            .extend(reports.iter().filter_map(|report| report.ia_compliance));
    }
}

/// One accepted measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointReport {
    /// `fixed`, `symmetric` or `asymmetric`.
    pub mode: &'static str,
    /// Aggregate offered load, in ops/s.
    pub offered_load: u32,
    /// Per-agent rate of the latency agents, for asymmetric runs.
    pub latency_rate: Option<u32>,
    pub sampling_rate: f64,
    pub sample_count: u32,
    pub window_secs: u64,
    pub iterations: u32,
    pub retries: u32,
    pub throughput: ThroughputSummary,
    pub counters: ThroughputAggregate,
    pub latency: LatencyAggregate,
    pub trailers: TrailerSummary,
}

impl PointReport {
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExperimentOutcome {
    pub pattern: String,
    pub points: Vec<PointReport>,
}

/// Human-readable report, one block per point.
#[must_use]
pub fn render_text(outcome: &ExperimentOutcome) -> String {
    if outcome.points.is_empty() {
        return format!("Pattern {}: no points measured.\n", outcome.pattern);
    }
    let blocks: Vec<String> = outcome
        .points
        .iter()
        .map(|point| point_lines(&outcome.pattern, point).join("\n"))
        .collect();
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

fn point_lines(pattern: &str, point: &PointReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Pattern {} ({}): offered load {} ops/s",
        pattern, point.mode, point.offered_load
    )];
    if let Some(rate) = point.latency_rate {
        lines.push(format!("  Latency agents:  {} ops/s each", rate));
    }
    lines.push(format!(
        "  Sampling:        {:.4}% of operations, {} samples, {} s window",
        point.sampling_rate, point.sample_count, point.window_secs
    ));
    lines.push(format!(
        "  Attempts:        {} iterations, {} retries",
        point.iterations, point.retries
    ));
    lines.push(format!(
        "  Throughput:      {:.2} rps over {} agents ({} completed)",
        point.throughput.rps, point.counters.agents, point.throughput.completed
    ));
    lines.push(format!(
        "  Bandwidth:       rx {:.2} B/s, tx {:.2} B/s",
        point.throughput.rx_bytes_per_sec, point.throughput.tx_bytes_per_sec
    ));
    lines.push(format!(
        "  Latency (us):    avg {:.3}",
        nanos_to_micros(point.latency.avg_ns)
    ));
    for (label, estimate) in [
        ("p50", &point.latency.p50),
        ("p90", &point.latency.p90),
        ("p95", &point.latency.p95),
        ("p99", &point.latency.p99),
    ] {
        lines.push(format!("    {}: {}", label, format_estimate(estimate)));
    }
    lines.push(format!("  Convergence:     {:?}", point.trailers.convergence));
    lines.push(format!("  IID correlation: {:?}", point.trailers.correlations));
    lines.push(format!("  IA compliance:   {:?}", point.trailers.ia_compliance));
    lines
}

fn format_estimate(estimate: &PercentileEstimate) -> String {
    format!(
        "{:.3} [{:.3}, {:.3}]",
        nanos_to_micros(estimate.value),
        nanos_to_micros(estimate.lower),
        nanos_to_micros(estimate.upper)
    )
}

fn nanos_to_micros(nanos: u64) -> f64 {
    Duration::from_nanos(nanos).as_secs_f64() * 1_000_000.0
}

/// One JSON object per point, newline separated.
///
/// # Errors
///
/// Returns an error if a point fails to serialize.
pub fn render_json(outcome: &ExperimentOutcome) -> AppResult<String> {
    let mut out = String::new();
    for point in &outcome.points {
        out.push_str(&serde_json::to_string(point)?);
        out.push('\n');
    }
    Ok(out)
}
