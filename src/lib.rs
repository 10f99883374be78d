//! Transparent fragmentation and reassembly for RSocket-style framed
//! transports.
//!
//! Logical frames produced by a protocol engine may exceed the per-write
//! limit of the byte channel underneath (a TCP segment, a WebSocket
//! message). This crate sits between the two as a decorator: outbound, it
//! splits oversized fragmentable frames into wire fragments no larger than
//! a configured MTU; inbound, it buffers fragment chains per stream and
//! emits each reassembled whole.
//!
//! The building blocks are usable on their own:
//!
//! - [`frame`]: the bit-exact frame codec with header layout, flag bits,
//!   payload-region slicing, and the optional 24-bit length prefix.
//! - [`fragment`]: the [`FrameFragmenter`] (lazy, one wire fragment per
//!   iterator step), the [`FrameReassembler`] (per-stream accumulation),
//!   and the [`FragmentingDuplexConnection`] decorator tying both to a
//!   [`DuplexConnection`].

pub mod connection;
pub mod fragment;
pub mod frame;

pub use connection::{ConnectionError, DuplexConnection};
pub use fragment::{
    FragmentationConfig,
    FragmentationError,
    FragmentingDuplexConnection,
    Fragments,
    FrameFragmenter,
    FrameReassembler,
    ReassemblyError,
    MIN_MTU,
};
pub use frame::{
    CodecError,
    FrameFlags,
    FrameHeader,
    FrameType,
    StreamId,
    FRAME_HEADER_SIZE,
};
