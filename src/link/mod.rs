//! Agent connections and the broadcast/collect engine on top of them.
mod agent;
mod broadcast;
mod fleet;


pub use agent::{AgentLink, AgentRole};
pub use broadcast::{
    ACK_TIMEOUT, LATENCY_TIMEOUT, THROUGHPUT_TIMEOUT, broadcast, collect, report_latency,
    report_throughput, start_load, start_measure,
};
pub use fleet::{AgentGroup, AgentRoster, Fleet};
