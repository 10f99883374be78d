//! Errors surfaced by the frame codec.

use thiserror::Error;

use super::FrameType;

/// Structural failures while parsing, slicing, or framing wire bytes.
///
/// Everything except [`UnknownFrameType`](Self::UnknownFrameType) indicates
/// a frame the connection cannot recover from.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Fewer bytes than the six-byte frame header.
    #[error("frame too short for header: {actual} of 6 bytes")]
    IncompleteHeader { actual: usize },
    /// The six-bit type code does not name a known frame type.
    #[error("unknown frame type code {code:#04x}")]
    UnknownFrameType { code: u8 },
    /// The frame ends before its declared layout does.
    #[error("frame truncated: need {expected} bytes, found {actual}")]
    TruncatedFrame { expected: usize, actual: usize },
    /// The 24-bit metadata length points past the end of the frame.
    #[error("metadata length {declared} overruns {available} remaining payload bytes")]
    MetadataOverrun { declared: usize, available: usize },
    /// The type's payload region is opaque to this layer and cannot be
    /// sliced.
    #[error("{frame_type} frames carry an opaque payload region")]
    OpaquePayload { frame_type: FrameType },
    /// A frame-length prefix disagrees with the bytes that follow it.
    #[error("length prefix declares {declared} bytes but {actual} remain")]
    LengthPrefixMismatch { declared: usize, actual: usize },
    /// The frame is too long for the 24-bit length prefix.
    #[error("frame length {actual} exceeds the 24-bit prefix maximum")]
    FrameTooLong { actual: usize },
}
