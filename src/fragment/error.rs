//! Errors emitted by the fragmenter and reassembler.

use std::num::NonZeroUsize;

use thiserror::Error;

use crate::frame::{CodecError, FrameType, StreamId};

/// Errors produced while splitting outbound frames.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FragmentationError {
    /// A non-fragmentable type reached the fragmenter; callers route those
    /// past it.
    #[error("frame type {0} cannot be fragmented")]
    InvalidFrameType(FrameType),
    /// The MTU cannot fit a first fragment that makes progress.
    #[error("mtu {mtu} below the minimum of {min} bytes")]
    MtuTooSmall { mtu: usize, min: usize },
    /// Fragments of this size could not carry a 24-bit length prefix.
    #[error("mtu {mtu} above the maximum of {max} bytes")]
    MtuTooLarge { mtu: usize, max: usize },
    /// The frame to split is structurally invalid.
    #[error("malformed frame: {0}")]
    Malformed(#[from] CodecError),
}

/// Errors produced while re-assembling inbound fragments.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ReassemblyError {
    /// A chain in progress received something other than a PAYLOAD
    /// continuation. The stream's partial state is dropped.
    #[error("stream {stream_id}: expected a PAYLOAD continuation, found {found}")]
    UnexpectedContinuation {
        stream_id: StreamId,
        found: FrameType,
    },
    /// The accumulated frame would exceed the configured cap. The stream's
    /// partial state is dropped.
    #[error("stream {stream_id}: reassembled frame would reach {attempted} bytes, over the {limit} byte cap")]
    FrameTooLarge {
        stream_id: StreamId,
        attempted: usize,
        limit: NonZeroUsize,
    },
    /// Accumulated metadata can no longer be expressed by the 24-bit
    /// metadata length field.
    #[error("stream {stream_id}: accumulated metadata exceeds the 24-bit length field")]
    MetadataOverflow { stream_id: StreamId },
    /// The fragment is structurally invalid.
    #[error("malformed fragment: {0}")]
    Malformed(#[from] CodecError),
}
