//! Merges per-agent replies into experiment-wide figures.
//!
//! Nothing here measures time: throughput rates are computed over the window
//! the caller supplies.
mod latency;
mod throughput;


pub use latency::{LatencyAggregate, aggregate_latency};
pub use throughput::{ThroughputAggregate, ThroughputSummary, aggregate_throughput};
