use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

use crate::error::WireError;

use super::constants::{
    ACK_BUFFER_LEN, CONVERGENCE_FRAME_LEN, HEADER_LEN, IA_COMP_FRAME_LEN, IID_FRAME_LEN,
    LATENCY_FRAME_LEN, REPLY, REPLY_ACK, REPLY_CONVERGENCE, REPLY_IA_COMP, REPLY_IID,
    REPLY_STATS_LATENCY, REPLY_STATS_THROUGHPUT, STATS_BUFFER_LEN, TAG_LEN,
    THROUGHPUT_FRAME_LEN,
};
use super::reader::WireReader;

/// Which reply the coordinator is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyExpectation {
    Ack,
    Throughput,
    Latency,
}

impl ReplyExpectation {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ReplyExpectation::Ack => "ACK",
            ReplyExpectation::Throughput => "STATS_THROUGHPUT",
            ReplyExpectation::Latency => "STATS_LATENCY",
        }
    }

    /// Size of the single read used to receive this reply.
    #[must_use]
    pub const fn buffer_len(self) -> usize {
        match self {
            ReplyExpectation::Ack => ACK_BUFFER_LEN,
            ReplyExpectation::Throughput | ReplyExpectation::Latency => STATS_BUFFER_LEN,
        }
    }

    const fn tag(self) -> u32 {
        match self {
            ReplyExpectation::Ack => REPLY_ACK,
            ReplyExpectation::Throughput => REPLY_STATS_THROUGHPUT,
            ReplyExpectation::Latency => REPLY_STATS_LATENCY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ThroughputReply {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    /// Completed operations in the measurement window.
    pub rx_reqs: u64,
    pub tx_reqs: u64,
}

/// A percentile and the bounds of its confidence interval, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PercentileEstimate {
    pub lower: u64,
    pub value: u64,
    pub upper: u64,
}

impl PercentileEstimate {
    #[must_use]
    pub const fn interval_width(&self) -> u64 {
        self.upper.saturating_sub(self.lower)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LatencyReply {
    pub throughput: ThroughputReply,
    pub avg_ns: u64,
    pub p50: PercentileEstimate,
    pub p90: PercentileEstimate,
    pub p95: PercentileEstimate,
    pub p99: PercentileEstimate,
}

/// Auxiliary frames that follow a latency reply when the agent has them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LatencyTrailer {
    pub convergence: u32,
    pub iid_correlation: f64,
    pub ia_compliance: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ThroughputReport {
    pub stats: ThroughputReply,
    pub ia_compliance: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LatencyReport {
    pub stats: LatencyReply,
    pub trailer: Option<LatencyTrailer>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reply {
    Ack,
    Throughput(ThroughputReport),
    Latency(LatencyReport),
}

impl Reply {
    #[must_use]
    pub const fn expectation(&self) -> ReplyExpectation {
        match self {
            Reply::Ack => ReplyExpectation::Ack,
            Reply::Throughput(_) => ReplyExpectation::Throughput,
            Reply::Latency(_) => ReplyExpectation::Latency,
        }
    }

    /// # Errors
    ///
    /// Returns `WireError::UnexpectedReplyTag` if this is not a throughput reply.
    pub fn into_throughput(self) -> Result<ThroughputReport, WireError> {
        match self {
            Reply::Throughput(report) => Ok(report),
            Reply::Ack | Reply::Latency(_) => Err(self.kind_mismatch(ReplyExpectation::Throughput)),
        }
    }

    /// # Errors
    ///
    /// Returns `WireError::UnexpectedReplyTag` if this is not a latency reply.
    pub fn into_latency(self) -> Result<LatencyReport, WireError> {
        match self {
            Reply::Latency(report) => Ok(report),
            Reply::Ack | Reply::Throughput(_) => Err(self.kind_mismatch(ReplyExpectation::Latency)),
        }
    }

    const fn kind_mismatch(&self, wanted: ReplyExpectation) -> WireError {
        WireError::UnexpectedReplyTag {
            context: "reply kind",
            expected: wanted.tag(),
            actual: self.expectation().tag(),
        }
    }

    /// Encodes the reply the way an agent packs it into a single write.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(LATENCY_FRAME_LEN.saturating_mul(2));
        match self {
            Reply::Ack => put_prelude(&mut buf, REPLY_ACK, 0),
            Reply::Throughput(report) => {
                put_prelude(&mut buf, REPLY_STATS_THROUGHPUT, THROUGHPUT_FRAME_LEN);
                put_throughput(&mut buf, &report.stats);
                if let Some(flag) = report.ia_compliance {
                    put_ia_frame(&mut buf, flag);
                }
            }
            Reply::Latency(report) => {
                put_prelude(&mut buf, REPLY_STATS_LATENCY, LATENCY_FRAME_LEN);
                put_latency(&mut buf, &report.stats);
                if let Some(trailer) = report.trailer {
                    put_prelude(&mut buf, REPLY_CONVERGENCE, CONVERGENCE_FRAME_LEN);
                    buf.put_u32_le(trailer.convergence);
                    put_prelude(&mut buf, REPLY_IID, IID_FRAME_LEN);
                    buf.put_f64_le(trailer.iid_correlation);
                    put_ia_frame(&mut buf, trailer.ia_compliance);
                }
            }
        }
        buf.freeze()
    }
}

/// Decodes one read's worth of reply bytes.
///
/// The first frame must match `expectation`. Trailer frames are decoded only
/// when more bytes were read than the first frame occupies.
///
/// # Errors
///
/// Returns a `WireError` on a wrong message type or tag, or on short input.
pub fn decode_reply(expectation: ReplyExpectation, bytes: Bytes) -> Result<Reply, WireError> {
    let bytes_read = bytes.len();
    let mut reader = WireReader::new(bytes);
    match expectation {
        ReplyExpectation::Ack => {
            reader.reply_prelude(REPLY_ACK, "ACK")?;
            Ok(Reply::Ack)
        }
        ReplyExpectation::Throughput => {
            reader.reply_prelude(REPLY_STATS_THROUGHPUT, "throughput reply")?;
            let stats = read_throughput(&mut reader)?;
            let ia_compliance = if bytes_read > THROUGHPUT_FRAME_LEN {
                Some(read_ia_frame(&mut reader)?)
            } else {
                None
            };
            Ok(Reply::Throughput(ThroughputReport {
                stats,
                ia_compliance,
            }))
        }
        ReplyExpectation::Latency => {
            reader.reply_prelude(REPLY_STATS_LATENCY, "latency reply")?;
            let stats = read_latency(&mut reader)?;
            let trailer = if bytes_read > LATENCY_FRAME_LEN {
                reader.reply_prelude(REPLY_CONVERGENCE, "convergence trailer")?;
                let convergence = reader.u32_le("convergence value")?;
                reader.reply_prelude(REPLY_IID, "iid trailer")?;
                let iid_correlation = reader.f64_le("iid correlation")?;
                let ia_compliance = read_ia_frame(&mut reader)?;
                Some(LatencyTrailer {
                    convergence,
                    iid_correlation,
                    ia_compliance,
                })
            } else {
                None
            };
            Ok(Reply::Latency(LatencyReport { stats, trailer }))
        }
    }
}

fn read_throughput(reader: &mut WireReader) -> Result<ThroughputReply, WireError> {
    Ok(ThroughputReply {
        rx_bytes: reader.u64_le("throughput rx_bytes")?,
        tx_bytes: reader.u64_le("throughput tx_bytes")?,
        rx_reqs: reader.u64_le("throughput rx_reqs")?,
        tx_reqs: reader.u64_le("throughput tx_reqs")?,
    })
}

fn read_percentile(
    reader: &mut WireReader,
    context: &'static str,
) -> Result<PercentileEstimate, WireError> {
    Ok(PercentileEstimate {
        lower: reader.u64_le(context)?,
        value: reader.u64_le(context)?,
        upper: reader.u64_le(context)?,
    })
}

fn read_latency(reader: &mut WireReader) -> Result<LatencyReply, WireError> {
    let throughput = read_throughput(reader)?;
    let avg_ns = reader.u64_le("latency average")?;
    Ok(LatencyReply {
        throughput,
        avg_ns,
        p50: read_percentile(reader, "latency p50")?,
        p90: read_percentile(reader, "latency p90")?,
        p95: read_percentile(reader, "latency p95")?,
        p99: read_percentile(reader, "latency p99")?,
    })
}

fn read_ia_frame(reader: &mut WireReader) -> Result<u32, WireError> {
    reader.reply_prelude(REPLY_IA_COMP, "inter-arrival trailer")?;
    reader.u32_le("inter-arrival compliance")
}

/// `frame_len` of zero writes an ACK-sized header.
fn put_prelude(buf: &mut BytesMut, tag: u32, frame_len: usize) {
    let payload_len = frame_len
        .saturating_sub(HEADER_LEN)
        .max(TAG_LEN);
    buf.put_u32_le(REPLY);
    buf.put_u32_le(u32::try_from(payload_len).unwrap_or(u32::MAX));
    buf.put_u32_le(tag);
}

fn put_throughput(buf: &mut BytesMut, stats: &ThroughputReply) {
    buf.put_u64_le(stats.rx_bytes);
    buf.put_u64_le(stats.tx_bytes);
    buf.put_u64_le(stats.rx_reqs);
    buf.put_u64_le(stats.tx_reqs);
}

fn put_percentile(buf: &mut BytesMut, estimate: &PercentileEstimate) {
    buf.put_u64_le(estimate.lower);
    buf.put_u64_le(estimate.value);
    buf.put_u64_le(estimate.upper);
}

fn put_latency(buf: &mut BytesMut, stats: &LatencyReply) {
    put_throughput(buf, &stats.throughput);
    buf.put_u64_le(stats.avg_ns);
    put_percentile(buf, &stats.p50);
    put_percentile(buf, &stats.p90);
    put_percentile(buf, &stats.p95);
    put_percentile(buf, &stats.p99);
}

fn put_ia_frame(buf: &mut BytesMut, flag: u32) {
    put_prelude(buf, REPLY_IA_COMP, IA_COMP_FRAME_LEN);
    buf.put_u32_le(flag);
}
