//! The fixed six-byte frame header.
//!
//! Layout, all big-endian: a 32-bit word holding the 31-bit stream id (bit
//! 31 reserved, zero), then 16 bits holding `frame_type << 10 | flags`.

use bytes::{BufMut, BytesMut};

use super::{CodecError, FrameFlags, FrameType, StreamId};

/// Size of the frame header in bytes.
pub const FRAME_HEADER_SIZE: usize = 6;

const FRAME_TYPE_SHIFT: u16 = 10;

/// Parsed view of a frame header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHeader {
    stream_id: StreamId,
    frame_type: FrameType,
    flags: FrameFlags,
}

impl FrameHeader {
    /// Assemble a header from its parts.
    #[must_use]
    pub const fn new(stream_id: StreamId, frame_type: FrameType, flags: FrameFlags) -> Self {
        Self {
            stream_id,
            frame_type,
            flags,
        }
    }

    /// Parse the leading six bytes of a wire frame.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IncompleteHeader`] when fewer than six bytes
    /// are available and [`CodecError::UnknownFrameType`] when the type
    /// code is not recognised.
    pub fn parse(frame: &[u8]) -> Result<Self, CodecError> {
        if frame.len() < FRAME_HEADER_SIZE {
            return Err(CodecError::IncompleteHeader { actual: frame.len() });
        }

        let word = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]);
        let type_and_flags = u16::from_be_bytes([frame[4], frame[5]]);

        let code = (type_and_flags >> FRAME_TYPE_SHIFT) as u8;
        let frame_type =
            FrameType::from_code(code).ok_or(CodecError::UnknownFrameType { code })?;

        Ok(Self {
            stream_id: StreamId::from_wire(word),
            frame_type,
            flags: FrameFlags::from_bits(type_and_flags),
        })
    }

    /// Append the six header bytes to `buf`.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_u32(self.stream_id.get());
        buf.put_u16(
            (u16::from(self.frame_type.code()) << FRAME_TYPE_SHIFT) | self.flags.bits(),
        );
    }

    /// Stream id of the frame.
    #[must_use]
    pub const fn stream_id(&self) -> StreamId { self.stream_id }

    /// Frame type as carried on the wire (never a synthetic alias).
    #[must_use]
    pub const fn frame_type(&self) -> FrameType { self.frame_type }

    /// The ten flag bits.
    #[must_use]
    pub const fn flags(&self) -> FrameFlags { self.flags }

    /// Whether the payload carries a metadata region.
    #[must_use]
    pub const fn has_metadata(&self) -> bool { self.flags.contains(FrameFlags::METADATA) }

    /// Whether more fragments of the same logical frame follow.
    ///
    /// The FOLLOWS bit position is type-specific on non-fragmentable types,
    /// so this reports `false` for them regardless of the raw bit.
    #[must_use]
    pub const fn has_follows(&self) -> bool {
        self.frame_type.is_fragmentable() && self.flags.contains(FrameFlags::FOLLOWS)
    }
}
