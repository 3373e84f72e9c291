use std::time::Duration;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::link::{self, AgentGroup, Fleet};
use crate::wire::{LatencyReport, ThroughputReport};

/// Agent operations the controller sequences, addressed by group.
#[async_trait]
pub trait FleetPort: Send {
    fn agent_count(&self, group: AgentGroup) -> usize;

    async fn start_load(&mut self, group: AgentGroup, load: u32) -> AppResult<()>;

    async fn start_measure(
        &mut self,
        group: AgentGroup,
        sample_count: u32,
        sampling_rate: f64,
    ) -> AppResult<()>;

    async fn report_throughput(&mut self, group: AgentGroup) -> AppResult<Vec<ThroughputReport>>;

    async fn report_latency(&mut self, group: AgentGroup) -> AppResult<Vec<LatencyReport>>;
}

/// Real-time waits between protocol steps.
#[async_trait]
pub trait Pacer: Send {
    async fn pause(&mut self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[async_trait]
impl FleetPort for Fleet {
    fn agent_count(&self, group: AgentGroup) -> usize {
        self.count(group)
    }

    async fn start_load(&mut self, group: AgentGroup, load: u32) -> AppResult<()> {
        let mut links = self.select_mut(group);
        link::start_load(&mut links, load).await
    }

    async fn start_measure(
        &mut self,
        group: AgentGroup,
        sample_count: u32,
        sampling_rate: f64,
    ) -> AppResult<()> {
        let mut links = self.select_mut(group);
        link::start_measure(&mut links, sample_count, sampling_rate).await
    }

    async fn report_throughput(&mut self, group: AgentGroup) -> AppResult<Vec<ThroughputReport>> {
        let mut links = self.select_mut(group);
        link::report_throughput(&mut links).await
    }

    async fn report_latency(&mut self, group: AgentGroup) -> AppResult<Vec<LatencyReport>> {
        let mut links = self.select_mut(group);
        link::report_latency(&mut links).await
    }
}
