//! Bit-exact codec for the wire frame layout.
//!
//! Each sub-module owns a single concept: the header word layout, the flag
//! bits, the per-type payload-region table, and the optional frame-length
//! prefix. Everything operates on borrowed byte slices or [`bytes::Bytes`]
//! views; nothing here allocates except frame assembly.

pub mod codec;
pub mod describe;
pub mod error;
pub mod flags;
pub mod frame_type;
pub mod header;
pub mod length;
pub mod stream_id;

pub use codec::{
    encode_frame,
    initial_request_n,
    payload_layout,
    slice_data,
    slice_metadata,
    PayloadLayout,
    INITIAL_REQUEST_N_SIZE,
    MAX_METADATA_LENGTH,
    METADATA_LENGTH_SIZE,
};
pub use describe::describe;
pub use error::CodecError;
pub use flags::FrameFlags;
pub use frame_type::FrameType;
pub use header::{FrameHeader, FRAME_HEADER_SIZE};
pub use length::{prepend_length, strip_length, FRAME_LENGTH_SIZE, MAX_FRAME_LENGTH};
pub use stream_id::StreamId;

#[cfg(test)]
mod tests;
