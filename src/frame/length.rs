//! Optional 24-bit big-endian frame-length prefix.
//!
//! Transports that are not self-delimiting (raw TCP) prefix every wire
//! frame with the length of the frame that follows. Self-delimiting
//! transports (WebSocket) skip the prefix entirely; the
//! `encode_length` configuration toggle selects between the two.

use bytes::{BufMut, Bytes, BytesMut};

use super::CodecError;

/// Size of the frame-length prefix in bytes.
pub const FRAME_LENGTH_SIZE: usize = 3;

/// Largest frame expressible by the 24-bit prefix.
pub const MAX_FRAME_LENGTH: usize = 0xFF_FFFF;

/// Read a 24-bit big-endian value. The slice must hold at least three
/// bytes.
pub(crate) fn read_u24(bytes: &[u8]) -> usize {
    (usize::from(bytes[0]) << 16) | (usize::from(bytes[1]) << 8) | usize::from(bytes[2])
}

/// Append `value` as a 24-bit big-endian field. The value must fit.
pub(crate) fn put_u24(buf: &mut BytesMut, value: usize) {
    debug_assert!(value <= MAX_FRAME_LENGTH);
    buf.put_u8((value >> 16) as u8);
    buf.put_u8((value >> 8) as u8);
    buf.put_u8(value as u8);
}

/// Return `frame` with the 24-bit length prefix prepended.
///
/// # Errors
///
/// Returns [`CodecError::FrameTooLong`] when the frame exceeds
/// [`MAX_FRAME_LENGTH`].
pub fn prepend_length(frame: &[u8]) -> Result<Bytes, CodecError> {
    if frame.len() > MAX_FRAME_LENGTH {
        return Err(CodecError::FrameTooLong { actual: frame.len() });
    }
    let mut buf = BytesMut::with_capacity(FRAME_LENGTH_SIZE + frame.len());
    put_u24(&mut buf, frame.len());
    buf.put_slice(frame);
    Ok(buf.freeze())
}

/// Strip and validate the 24-bit length prefix, returning a view of the
/// frame behind it.
///
/// # Errors
///
/// Returns [`CodecError::TruncatedFrame`] when fewer than three bytes are
/// present and [`CodecError::LengthPrefixMismatch`] when the declared
/// length disagrees with the remainder.
pub fn strip_length(frame: Bytes) -> Result<Bytes, CodecError> {
    if frame.len() < FRAME_LENGTH_SIZE {
        return Err(CodecError::TruncatedFrame {
            expected: FRAME_LENGTH_SIZE,
            actual: frame.len(),
        });
    }
    let declared = read_u24(&frame);
    let actual = frame.len() - FRAME_LENGTH_SIZE;
    if declared != actual {
        return Err(CodecError::LengthPrefixMismatch { declared, actual });
    }
    Ok(frame.slice(FRAME_LENGTH_SIZE..))
}
