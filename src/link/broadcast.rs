//! Fan-out of one command to many agents and fan-in of their replies.
//!
//! Writes go out sequentially in registration order. Replies are read
//! concurrently and joined with `try_join_all`, so a single failing agent
//! fails the whole collection and no partial result escapes.
use std::time::Duration;

use futures_util::future::try_join_all;
use tracing::debug;

use crate::error::{AppError, AppResult, ProtocolError};
use crate::wire::{
    Command, LatencyReport, Reply, ReplyExpectation, ReportKind, ThroughputReport,
};

use super::agent::{AgentLink, duration_ms};

pub const ACK_TIMEOUT: Duration = Duration::from_millis(500);
pub const THROUGHPUT_TIMEOUT: Duration = Duration::from_millis(500);
pub const LATENCY_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Encodes `command` once and writes it to every link, stopping at the first
/// failure.
///
/// # Errors
///
/// Returns a protocol error if encoding fails, or the first transport error.
pub async fn broadcast(command: &Command, links: &mut [&mut AgentLink]) -> AppResult<()> {
    let bytes = command
        .encode()
        .map_err(|err| AppError::protocol(ProtocolError::Encode { source: err }))?;
    for link in links.iter_mut() {
        link.send(&bytes).await?;
    }
    debug!("Sent {} to {} agents", command.name(), links.len());
    Ok(())
}

/// Reads one reply from every link concurrently. Results are in link order.
///
/// # Errors
///
/// Returns the first transport or protocol error; no partial results.
pub async fn collect(
    links: &mut [&mut AgentLink],
    expectation: ReplyExpectation,
    deadline: Duration,
) -> AppResult<Vec<Reply>> {
    let agents = links.len();
    let buffer_len = expectation.buffer_len();
    let reads = links
        .iter_mut()
        .map(|link| link.read_reply(expectation, buffer_len, deadline));
    let replies = try_join_all(reads).await?;
    debug!(
        "Collected {} {} replies (deadline {}ms)",
        agents,
        expectation.label(),
        duration_ms(deadline)
    );
    Ok(replies)
}

async fn exchange(
    command: Command,
    links: &mut [&mut AgentLink],
    deadline: Duration,
) -> AppResult<Vec<Reply>> {
    if links.is_empty() {
        return Ok(Vec::new());
    }
    broadcast(&command, links).await?;
    collect(links, command.expected_reply(), deadline).await
}

/// Sets the offered load on every link and waits for their ACKs.
///
/// # Errors
///
/// Returns the first transport or protocol error.
pub async fn start_load(links: &mut [&mut AgentLink], load: u32) -> AppResult<()> {
    exchange(Command::StartLoad { load }, links, ACK_TIMEOUT).await?;
    Ok(())
}

/// Starts a measurement window on every link and waits for their ACKs.
///
/// # Errors
///
/// Returns the first transport or protocol error.
pub async fn start_measure(
    links: &mut [&mut AgentLink],
    sample_count: u32,
    sampling_rate: f64,
) -> AppResult<()> {
    let command = Command::StartMeasure {
        sample_count,
        sampling_rate,
    };
    exchange(command, links, ACK_TIMEOUT).await?;
    Ok(())
}

/// # Errors
///
/// Returns the first transport or protocol error.
pub async fn report_throughput(links: &mut [&mut AgentLink]) -> AppResult<Vec<ThroughputReport>> {
    let command = Command::ReportRequest {
        kind: ReportKind::Throughput,
    };
    let replies = exchange(command, links, THROUGHPUT_TIMEOUT).await?;
    replies
        .into_iter()
        .map(|reply| {
            reply
                .into_throughput()
                .map_err(|err| AppError::protocol(ProtocolError::ReplyKind { source: err }))
        })
        .collect()
}

/// # Errors
///
/// Returns the first transport or protocol error.
pub async fn report_latency(links: &mut [&mut AgentLink]) -> AppResult<Vec<LatencyReport>> {
    let command = Command::ReportRequest {
        kind: ReportKind::Latency,
    };
    let replies = exchange(command, links, LATENCY_TIMEOUT).await?;
    replies
        .into_iter()
        .map(|reply| {
            reply
                .into_latency()
                .map_err(|err| AppError::protocol(ProtocolError::ReplyKind { source: err }))
        })
        .collect()
}
