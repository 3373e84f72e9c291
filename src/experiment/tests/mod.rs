use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, AppResult, TransportError};
use crate::link::AgentGroup;
use crate::wire::{
    LatencyReply, LatencyReport, LatencyTrailer, PercentileEstimate, ThroughputReply,
    ThroughputReport,
};

use super::port::{FleetPort, Pacer};

mod acceptance;
mod controller;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Call {
    StartLoad(AgentGroup, u32),
    StartMeasure(AgentGroup, u32, f64),
    ReportThroughput(AgentGroup),
    ReportLatency(AgentGroup),
}

/// Replays canned replies. The last queued reply set repeats once the queue
/// is down to it.
#[derive(Debug, Default)]
struct ScriptedFleet {
    symmetric: usize,
    throughput_agents: usize,
    latency_agents: usize,
    throughput: VecDeque<Vec<ThroughputReport>>,
    latency: VecDeque<Vec<LatencyReport>>,
    fail_latency: bool,
    calls: Vec<Call>,
}

impl ScriptedFleet {
    fn symmetric(agents: usize) -> Self {
        Self {
            symmetric: agents,
            ..Self::default()
        }
    }

    fn asymmetric(throughput_agents: usize, latency_agents: usize) -> Self {
        Self {
            throughput_agents,
            latency_agents,
            ..Self::default()
        }
    }

    fn with_throughput(mut self, replies: Vec<ThroughputReport>) -> Self {
        self.throughput.push_back(replies);
        self
    }

    fn with_latency(mut self, replies: Vec<LatencyReport>) -> Self {
        self.latency.push_back(replies);
        self
    }

    fn measure_calls(&self) -> Vec<(AgentGroup, u32, f64)> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                Call::StartMeasure(group, samples, rate) => Some((group, samples, rate)),
                Call::StartLoad(..) | Call::ReportThroughput(_) | Call::ReportLatency(_) => None,
            })
            .collect()
    }

    fn load_calls(&self) -> Vec<(AgentGroup, u32)> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                Call::StartLoad(group, load) => Some((group, load)),
                Call::StartMeasure(..) | Call::ReportThroughput(_) | Call::ReportLatency(_) => {
                    None
                }
            })
            .collect()
    }
}

fn next_from<T: Clone>(queue: &mut VecDeque<Vec<T>>) -> Vec<T> {
    if queue.len() > 1 {
        return queue.pop_front().unwrap_or_default();
    }
    queue.front().cloned().unwrap_or_default()
}

#[async_trait]
impl FleetPort for ScriptedFleet {
    fn agent_count(&self, group: AgentGroup) -> usize {
        match group {
            AgentGroup::Symmetric => self.symmetric,
            AgentGroup::Throughput => self.throughput_agents,
            AgentGroup::Latency => self.latency_agents,
            AgentGroup::Load => self.throughput_agents.saturating_add(self.latency_agents),
        }
    }

    async fn start_load(&mut self, group: AgentGroup, load: u32) -> AppResult<()> {
        self.calls.push(Call::StartLoad(group, load));
        Ok(())
    }

    async fn start_measure(
        &mut self,
        group: AgentGroup,
        sample_count: u32,
        sampling_rate: f64,
    ) -> AppResult<()> {
        self.calls
            .push(Call::StartMeasure(group, sample_count, sampling_rate));
        Ok(())
    }

    async fn report_throughput(&mut self, group: AgentGroup) -> AppResult<Vec<ThroughputReport>> {
        self.calls.push(Call::ReportThroughput(group));
        Ok(next_from(&mut self.throughput))
    }

    async fn report_latency(&mut self, group: AgentGroup) -> AppResult<Vec<LatencyReport>> {
        self.calls.push(Call::ReportLatency(group));
        if self.fail_latency {
            return Err(AppError::transport(TransportError::ReadTimeout {
                agent: "scripted".to_owned(),
                timeout_ms: 5_000,
            }));
        }
        Ok(next_from(&mut self.latency))
    }
}

#[derive(Debug, Default)]
struct RecordingPacer {
    pauses: Vec<Duration>,
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}

fn throughput(rx_reqs: u64) -> ThroughputReport {
    ThroughputReport {
        stats: ThroughputReply {
            rx_bytes: rx_reqs.saturating_mul(64),
            tx_bytes: rx_reqs.saturating_mul(24),
            rx_reqs,
            tx_reqs: rx_reqs,
        },
        ia_compliance: Some(1),
    }
}

fn latency(correlation: Option<f64>, p99_lower: u64, p99_upper: u64) -> LatencyReport {
    let value = p99_lower.saturating_add(p99_upper).saturating_div(2);
    LatencyReport {
        stats: LatencyReply {
            throughput: throughput(10_000).stats,
            avg_ns: 20_000,
            p99: PercentileEstimate {
                lower: p99_lower,
                value,
                upper: p99_upper,
            },
            ..LatencyReply::default()
        },
        trailer: correlation.map(|iid_correlation| LatencyTrailer {
            convergence: 1,
            iid_correlation,
            ia_compliance: 1,
        }),
    }
}

/// Independent samples with a 2 us p99 interval.
fn good_latency() -> LatencyReport {
    latency(Some(0.05), 100_000, 102_000)
}

fn close_to(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}
