use std::fmt::Write as _;

use thiserror::Error;

/// Codec-level failure, before any agent identity is attached.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("{context}: expected message type {expected}, got {actual}")]
    UnexpectedMessageType {
        context: &'static str,
        expected: u32,
        actual: u32,
    },
    #[error("{context}: expected reply tag {expected}, got {actual}")]
    UnexpectedReplyTag {
        context: &'static str,
        expected: u32,
        actual: u32,
    },
    #[error("{context}: needed {needed} bytes, {available} available")]
    Truncated {
        context: &'static str,
        needed: usize,
        available: usize,
    },
    #[error("{command} encoded to {actual} bytes, header declares {declared}")]
    EncodeLengthMismatch {
        command: &'static str,
        declared: usize,
        actual: usize,
    },
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Bad reply from agent {agent}: {source} (raw: {})", hex_preview(.raw))]
    Reply {
        agent: String,
        raw: Vec<u8>,
        #[source]
        source: WireError,
    },
    #[error("Collected reply has the wrong kind: {source}")]
    ReplyKind {
        #[source]
        source: WireError,
    },
    #[error("Failed to encode command: {source}")]
    Encode {
        #[source]
        source: WireError,
    },
}

/// Bytes beyond this are elided from error messages.
const RAW_PREVIEW_BYTES: usize = 64;

fn hex_preview(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len().min(RAW_PREVIEW_BYTES).saturating_mul(2));
    for byte in raw.iter().take(RAW_PREVIEW_BYTES) {
        let _write_result = write!(out, "{:02x}", byte);
    }
    if raw.len() > RAW_PREVIEW_BYTES {
        let _write_result = write!(out, "... ({} bytes)", raw.len());
    }
    out
}
