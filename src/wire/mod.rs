//! Binary codec for the agent management protocol.
//!
//! Every frame is a little-endian `{ message_type: u32, length: u32 }` header
//! followed by a packed payload. Replies may arrive as several frames in a
//! single read; the frame count is inferred from the number of bytes read.
mod command;
pub mod constants;
mod reader;
mod reply;


pub use command::{Command, ReportKind};
pub use reader::FrameHeader;
pub use reply::{
    LatencyReply, LatencyReport, LatencyTrailer, PercentileEstimate, Reply, ReplyExpectation,
    ThroughputReply, ThroughputReport, decode_reply,
};
