use serde::Serialize;

use crate::wire::{LatencyReply, PercentileEstimate, ThroughputReply};

use super::throughput::{ThroughputAggregate, aggregate_throughput};

/// Latency merged across agents.
///
/// Every field is a mean weighted by the agent's completed requests, or a
/// plain mean when no agent completed any. Since each agent reports
/// `lower <= value <= upper`, the merged triples keep that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LatencyAggregate {
    pub agents: usize,
    pub avg_ns: u64,
    pub p50: PercentileEstimate,
    pub p90: PercentileEstimate,
    pub p95: PercentileEstimate,
    pub p99: PercentileEstimate,
    /// Sum of the throughput counters embedded in each latency reply.
    pub throughput: ThroughputAggregate,
}

#[must_use]
pub fn aggregate_latency(replies: &[LatencyReply]) -> LatencyAggregate {
    if replies.is_empty() {
        return LatencyAggregate::default();
    }
    let embedded: Vec<ThroughputReply> = replies.iter().map(|reply| reply.throughput).collect();
    let total_weight: u128 = replies
        .iter()
        .map(|reply| u128::from(reply.throughput.rx_reqs))
        .sum();
    let weight_of = |reply: &LatencyReply| -> u128 {
        if total_weight == 0 {
            1
        } else {
            u128::from(reply.throughput.rx_reqs)
        }
    };

    LatencyAggregate {
        agents: replies.len(),
        avg_ns: weighted_mean(replies, weight_of, |reply| reply.avg_ns),
        p50: merge_percentile(replies, weight_of, |reply| reply.p50),
        p90: merge_percentile(replies, weight_of, |reply| reply.p90),
        p95: merge_percentile(replies, weight_of, |reply| reply.p95),
        p99: merge_percentile(replies, weight_of, |reply| reply.p99),
        throughput: aggregate_throughput(&embedded),
    }
}

fn merge_percentile<W, F>(replies: &[LatencyReply], weight_of: W, field: F) -> PercentileEstimate
where
    W: Fn(&LatencyReply) -> u128 + Copy,
    F: Fn(&LatencyReply) -> PercentileEstimate + Copy,
{
    PercentileEstimate {
        lower: weighted_mean(replies, weight_of, |reply| field(reply).lower),
        value: weighted_mean(replies, weight_of, |reply| field(reply).value),
        upper: weighted_mean(replies, weight_of, |reply| field(reply).upper),
    }
}

fn weighted_mean<W, F>(replies: &[LatencyReply], weight_of: W, field: F) -> u64
where
    W: Fn(&LatencyReply) -> u128,
    F: Fn(&LatencyReply) -> u64,
{
    let mut weighted_sum = 0u128;
    let mut weight_total = 0u128;
    for reply in replies {
        let weight = weight_of(reply);
        weighted_sum = weighted_sum.saturating_add(u128::from(field(reply)).saturating_mul(weight));
        weight_total = weight_total.saturating_add(weight);
    }
    let mean = weighted_sum.checked_div(weight_total).unwrap_or(0);
    u64::try_from(mean).unwrap_or(u64::MAX)
}
