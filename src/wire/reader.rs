use bytes::{Buf, Bytes};

use crate::error::WireError;

use super::constants::{HEADER_LEN, REPLY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub message_type: u32,
    pub length: u32,
}

/// Cursor over one read's worth of bytes. Every accessor checks the
/// remaining length first, so short input surfaces as `WireError::Truncated`.
#[derive(Debug)]
pub(crate) struct WireReader {
    buf: Bytes,
}

impl WireReader {
    pub(crate) const fn new(buf: Bytes) -> Self {
        Self { buf }
    }

    fn ensure(&self, needed: usize, context: &'static str) -> Result<(), WireError> {
        let available = self.buf.remaining();
        if available < needed {
            return Err(WireError::Truncated {
                context,
                needed,
                available,
            });
        }
        Ok(())
    }

    pub(crate) fn u32_le(&mut self, context: &'static str) -> Result<u32, WireError> {
        self.ensure(4, context)?;
        Ok(self.buf.get_u32_le())
    }

    pub(crate) fn u64_le(&mut self, context: &'static str) -> Result<u64, WireError> {
        self.ensure(8, context)?;
        Ok(self.buf.get_u64_le())
    }

    pub(crate) fn f64_le(&mut self, context: &'static str) -> Result<f64, WireError> {
        self.ensure(8, context)?;
        Ok(self.buf.get_f64_le())
    }

    pub(crate) fn header(&mut self, context: &'static str) -> Result<FrameHeader, WireError> {
        self.ensure(HEADER_LEN, context)?;
        Ok(FrameHeader {
            message_type: self.buf.get_u32_le(),
            length: self.buf.get_u32_le(),
        })
    }

    /// Reads a reply header plus tag and checks both against `expected_tag`.
    pub(crate) fn reply_prelude(
        &mut self,
        expected_tag: u32,
        context: &'static str,
    ) -> Result<(), WireError> {
        let header = self.header(context)?;
        if header.message_type != REPLY {
            return Err(WireError::UnexpectedMessageType {
                context,
                expected: REPLY,
                actual: header.message_type,
            });
        }
        let tag = self.u32_le(context)?;
        if tag != expected_tag {
            return Err(WireError::UnexpectedReplyTag {
                context,
                expected: expected_tag,
                actual: tag,
            });
        }
        Ok(())
    }
}
