//! Message type, tag and frame-size constants of the agent management protocol.

pub const START_LOAD: u32 = 0;
pub const START_MEASURE: u32 = 1;
pub const REPORT_REQ: u32 = 2;
pub const REPLY: u32 = 3;

pub const REPORT_THROUGHPUT: u32 = 0;
pub const REPORT_LATENCY: u32 = 1;

pub const REPLY_ACK: u32 = 0;
pub const REPLY_STATS_THROUGHPUT: u32 = 1;
pub const REPLY_STATS_LATENCY: u32 = 2;
pub const REPLY_CONVERGENCE: u32 = 3;
pub const REPLY_IID: u32 = 4;
pub const REPLY_IA_COMP: u32 = 5;

pub const HEADER_LEN: usize = 8;
/// Reply frames start with a `u32` tag after the header.
pub const TAG_LEN: usize = 4;

pub const THROUGHPUT_REPLY_LEN: usize = 32;
/// Embedded throughput block, average, then four `lower/value/upper` triples.
pub const LATENCY_REPLY_LEN: usize = THROUGHPUT_REPLY_LEN + 8 + 4 * 3 * 8;

pub const ACK_FRAME_LEN: usize = HEADER_LEN + TAG_LEN;
pub const THROUGHPUT_FRAME_LEN: usize = HEADER_LEN + TAG_LEN + THROUGHPUT_REPLY_LEN;
pub const LATENCY_FRAME_LEN: usize = HEADER_LEN + TAG_LEN + LATENCY_REPLY_LEN;
pub const CONVERGENCE_FRAME_LEN: usize = HEADER_LEN + TAG_LEN + 4;
pub const IID_FRAME_LEN: usize = HEADER_LEN + TAG_LEN + 8;
pub const IA_COMP_FRAME_LEN: usize = HEADER_LEN + TAG_LEN + 4;

/// Read buffer for acknowledgements.
pub const ACK_BUFFER_LEN: usize = 64;
/// Read buffer for statistics replies.
pub const STATS_BUFFER_LEN: usize = 1024;
