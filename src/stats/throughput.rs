use std::time::Duration;

use serde::Serialize;

use crate::wire::ThroughputReply;

/// Counters summed across agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ThroughputAggregate {
    pub agents: usize,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_reqs: u64,
    pub tx_reqs: u64,
}

/// Rates over the window the controller waited for.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ThroughputSummary {
    pub rps: f64,
    pub rx_bytes_per_sec: f64,
    pub tx_bytes_per_sec: f64,
    pub completed: u64,
}

#[must_use]
pub fn aggregate_throughput(replies: &[ThroughputReply]) -> ThroughputAggregate {
    let mut aggregate = ThroughputAggregate::default();
    for reply in replies {
        aggregate.absorb(reply);
    }
    aggregate
}

impl ThroughputAggregate {
    /// Adds one more agent's counters.
    pub fn absorb(&mut self, reply: &ThroughputReply) {
        self.agents = self.agents.saturating_add(1);
        self.rx_bytes = self.rx_bytes.saturating_add(reply.rx_bytes);
        self.tx_bytes = self.tx_bytes.saturating_add(reply.tx_bytes);
        self.rx_reqs = self.rx_reqs.saturating_add(reply.rx_reqs);
        self.tx_reqs = self.tx_reqs.saturating_add(reply.tx_reqs);
    }

    /// A zero window yields zero rates.
    #[must_use]
    pub fn summarize(&self, window: Duration) -> ThroughputSummary {
        let seconds = window.as_secs_f64();
        if seconds <= 0.0 {
            return ThroughputSummary {
                completed: self.rx_reqs,
                ..ThroughputSummary::default()
            };
        }
        ThroughputSummary {
            rps: per_second(self.rx_reqs, seconds),
            rx_bytes_per_sec: per_second(self.rx_bytes, seconds),
            tx_bytes_per_sec: per_second(self.tx_bytes, seconds),
            completed: self.rx_reqs,
        }
    }
}

fn per_second(count: u64, seconds: f64) -> f64 {
    count as f64 / seconds
}
