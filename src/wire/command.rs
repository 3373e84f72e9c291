use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

use crate::error::WireError;

use super::constants::{
    HEADER_LEN, REPORT_LATENCY, REPORT_REQ, REPORT_THROUGHPUT, START_LOAD, START_MEASURE,
};
use super::reader::WireReader;
use super::reply::ReplyExpectation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Throughput,
    Latency,
}

impl ReportKind {
    #[must_use]
    pub const fn wire_value(self) -> u32 {
        match self {
            ReportKind::Throughput => REPORT_THROUGHPUT,
            ReportKind::Latency => REPORT_LATENCY,
        }
    }

    const fn from_wire(value: u32) -> Option<Self> {
        match value {
            REPORT_THROUGHPUT => Some(ReportKind::Throughput),
            REPORT_LATENCY => Some(ReportKind::Latency),
            _ => None,
        }
    }
}

/// Coordinator to agent command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Offered load for this agent, in operations per second.
    StartLoad { load: u32 },
    /// Keep the last `sample_count` samples, retaining `sampling_rate`% of operations.
    StartMeasure { sample_count: u32, sampling_rate: f64 },
    ReportRequest { kind: ReportKind },
}

impl Command {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Command::StartLoad { .. } => "START_LOAD",
            Command::StartMeasure { .. } => "START_MEASURE",
            Command::ReportRequest { .. } => "REPORT_REQ",
        }
    }

    #[must_use]
    pub const fn message_type(&self) -> u32 {
        match self {
            Command::StartLoad { .. } => START_LOAD,
            Command::StartMeasure { .. } => START_MEASURE,
            Command::ReportRequest { .. } => REPORT_REQ,
        }
    }

    const fn payload_len(&self) -> usize {
        match self {
            Command::StartLoad { .. } | Command::ReportRequest { .. } => 4,
            Command::StartMeasure { .. } => 12,
        }
    }

    /// Reply kind an agent answers this command with.
    #[must_use]
    pub const fn expected_reply(&self) -> ReplyExpectation {
        match self {
            Command::StartLoad { .. } | Command::StartMeasure { .. } => ReplyExpectation::Ack,
            Command::ReportRequest {
                kind: ReportKind::Throughput,
            } => ReplyExpectation::Throughput,
            Command::ReportRequest {
                kind: ReportKind::Latency,
            } => ReplyExpectation::Latency,
        }
    }

    /// Encodes the command as `header + payload`.
    ///
    /// # Errors
    ///
    /// Returns `WireError::EncodeLengthMismatch` if the written payload does
    /// not match the length declared in the header.
    pub fn encode(&self) -> Result<Bytes, WireError> {
        let payload_len = self.payload_len();
        let declared = u32::try_from(payload_len).unwrap_or(u32::MAX);
        let mut buf = BytesMut::with_capacity(HEADER_LEN.saturating_add(payload_len));
        buf.put_u32_le(self.message_type());
        buf.put_u32_le(declared);
        match *self {
            Command::StartLoad { load } => buf.put_u32_le(load),
            Command::StartMeasure {
                sample_count,
                sampling_rate,
            } => {
                buf.put_u32_le(sample_count);
                buf.put_f64_le(sampling_rate);
            }
            Command::ReportRequest { kind } => buf.put_u32_le(kind.wire_value()),
        }
        let expected = HEADER_LEN.saturating_add(payload_len);
        if buf.len() != expected {
            return Err(WireError::EncodeLengthMismatch {
                command: self.name(),
                declared: payload_len,
                actual: buf.len().saturating_sub(HEADER_LEN),
            });
        }
        Ok(buf.freeze())
    }

    /// Decodes a command frame, as an agent would.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown message types, unknown report kinds, or
    /// truncated payloads.
    pub fn decode(bytes: Bytes) -> Result<Self, WireError> {
        let mut reader = WireReader::new(bytes);
        let header = reader.header("command header")?;
        match header.message_type {
            START_LOAD => Ok(Command::StartLoad {
                load: reader.u32_le("START_LOAD payload")?,
            }),
            START_MEASURE => {
                let sample_count = reader.u32_le("START_MEASURE sample count")?;
                let sampling_rate = reader.f64_le("START_MEASURE sampling rate")?;
                Ok(Command::StartMeasure {
                    sample_count,
                    sampling_rate,
                })
            }
            REPORT_REQ => {
                let value = reader.u32_le("REPORT_REQ payload")?;
                let kind =
                    ReportKind::from_wire(value).ok_or(WireError::UnexpectedReplyTag {
                        context: "REPORT_REQ kind",
                        expected: REPORT_LATENCY,
                        actual: value,
                    })?;
                Ok(Command::ReportRequest { kind })
            }
            other => Err(WireError::UnexpectedMessageType {
                context: "command header",
                expected: REPORT_REQ,
                actual: other,
            }),
        }
    }
}
