//! Core library for the `fleetbench` coordinator.
//!
//! The coordinator deploys measurement agents, speaks their binary management
//! protocol, runs adaptive load patterns against the fleet and aggregates the
//! statistics the agents report. The `fleetbench` binary is a thin wrapper
//! around [`entry::run`].
pub mod args;
pub mod config;
pub mod coordinator;
pub mod deploy;
pub mod entry;
pub mod error;
pub mod experiment;
pub mod link;
pub mod logger;
pub mod stats;
pub mod wire;
