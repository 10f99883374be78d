//! Payload-region layout and slicing for each frame type.
//!
//! The payload region starts after the header and any fixed type-specific
//! prefix. When the `M` flag is set on a type with prefixed metadata, the
//! region opens with a 24-bit big-endian metadata length followed by that
//! many metadata bytes; the rest is data. Absence of `M` means no length
//! prefix at all: a zero-length metadata region and an absent one are
//! distinct on the wire.
//!
//! Slicing accessors return [`Bytes`] views into the input and never copy.

use bytes::{BufMut, Bytes, BytesMut};

use super::{
    length::{put_u24, read_u24},
    CodecError,
    FrameFlags,
    FrameHeader,
    FrameType,
    StreamId,
    FRAME_HEADER_SIZE,
};

/// Size of the 24-bit metadata length prefix.
pub const METADATA_LENGTH_SIZE: usize = 3;

/// Size of the `initial_request_n` field on REQUEST_STREAM and
/// REQUEST_CHANNEL first fragments.
pub const INITIAL_REQUEST_N_SIZE: usize = 4;

/// Largest metadata region expressible by the 24-bit length prefix.
pub const MAX_METADATA_LENGTH: usize = 0xFF_FFFF;

/// How a frame type arranges the bytes after its header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadLayout {
    /// `prefix` fixed bytes, then a 24-bit-length-prefixed metadata region
    /// when `M` is set, then data.
    PrefixedMetadata { prefix: usize },
    /// `prefix` fixed bytes, then the remainder of the frame is metadata
    /// (no length prefix) when `M` is set.
    TrailingMetadata { prefix: usize },
    /// `prefix` fixed bytes, then data only; `M` is never meaningful.
    DataOnly { prefix: usize },
    /// Variable or extension-defined prefix; this layer never slices it.
    Opaque,
}

/// The payload-region layout of `frame_type`.
#[must_use]
pub const fn payload_layout(frame_type: FrameType) -> PayloadLayout {
    match frame_type {
        FrameType::RequestResponse
        | FrameType::RequestFnf
        | FrameType::Payload
        | FrameType::Next
        | FrameType::Complete
        | FrameType::NextComplete => PayloadLayout::PrefixedMetadata { prefix: 0 },
        FrameType::RequestStream | FrameType::RequestChannel => PayloadLayout::PrefixedMetadata {
            prefix: INITIAL_REQUEST_N_SIZE,
        },
        FrameType::MetadataPush => PayloadLayout::TrailingMetadata { prefix: 0 },
        FrameType::Lease => PayloadLayout::TrailingMetadata { prefix: 8 },
        FrameType::Keepalive => PayloadLayout::DataOnly { prefix: 8 },
        FrameType::Error | FrameType::RequestN => PayloadLayout::DataOnly { prefix: 4 },
        FrameType::Cancel => PayloadLayout::DataOnly { prefix: 0 },
        FrameType::Setup | FrameType::Resume | FrameType::ResumeOk | FrameType::Ext => {
            PayloadLayout::Opaque
        }
    }
}

/// Offset of the payload region plus its layout, validated against the
/// frame length.
fn payload_region(frame: &[u8], header: &FrameHeader) -> Result<(usize, PayloadLayout), CodecError> {
    let layout = payload_layout(header.frame_type());
    let prefix = match layout {
        PayloadLayout::PrefixedMetadata { prefix }
        | PayloadLayout::TrailingMetadata { prefix }
        | PayloadLayout::DataOnly { prefix } => prefix,
        PayloadLayout::Opaque => {
            return Err(CodecError::OpaquePayload {
                frame_type: header.frame_type(),
            });
        }
    };

    let offset = FRAME_HEADER_SIZE + prefix;
    if frame.len() < offset {
        return Err(CodecError::TruncatedFrame {
            expected: offset,
            actual: frame.len(),
        });
    }
    Ok((offset, layout))
}

/// Extent of the metadata region: offset of the first metadata byte and its
/// length, or `None` when the frame carries no metadata.
fn metadata_extent(
    frame: &[u8],
    header: &FrameHeader,
    offset: usize,
    layout: PayloadLayout,
) -> Result<Option<(usize, usize)>, CodecError> {
    if !header.has_metadata() {
        return Ok(None);
    }
    match layout {
        PayloadLayout::PrefixedMetadata { .. } => {
            if frame.len() < offset + METADATA_LENGTH_SIZE {
                return Err(CodecError::TruncatedFrame {
                    expected: offset + METADATA_LENGTH_SIZE,
                    actual: frame.len(),
                });
            }
            let declared = read_u24(&frame[offset..]);
            let available = frame.len() - offset - METADATA_LENGTH_SIZE;
            if declared > available {
                return Err(CodecError::MetadataOverrun {
                    declared,
                    available,
                });
            }
            Ok(Some((offset + METADATA_LENGTH_SIZE, declared)))
        }
        PayloadLayout::TrailingMetadata { .. } => Ok(Some((offset, frame.len() - offset))),
        PayloadLayout::DataOnly { .. } | PayloadLayout::Opaque => Ok(None),
    }
}

/// Slice the metadata region out of a wire frame without copying.
///
/// Returns `None` when the `M` flag is clear (or meaningless for the
/// type). A present-but-empty region yields `Some` of an empty view.
///
/// # Errors
///
/// Returns [`CodecError`] when the header cannot be parsed, the type is
/// opaque to this layer, or the declared metadata length overruns the
/// frame.
pub fn slice_metadata(frame: &Bytes) -> Result<Option<Bytes>, CodecError> {
    let header = FrameHeader::parse(frame)?;
    let (offset, layout) = payload_region(frame, &header)?;
    let extent = metadata_extent(frame, &header, offset, layout)?;
    Ok(extent.map(|(start, len)| frame.slice(start..start + len)))
}

/// Slice the data region out of a wire frame without copying.
///
/// # Errors
///
/// Returns [`CodecError`] under the same conditions as [`slice_metadata`].
pub fn slice_data(frame: &Bytes) -> Result<Bytes, CodecError> {
    let header = FrameHeader::parse(frame)?;
    let (offset, layout) = payload_region(frame, &header)?;
    let start = match metadata_extent(frame, &header, offset, layout)? {
        Some((metadata_start, metadata_len)) => match layout {
            // Trailing metadata consumes the rest of the frame.
            PayloadLayout::TrailingMetadata { .. } => frame.len(),
            _ => metadata_start + metadata_len,
        },
        None => offset,
    };
    Ok(frame.slice(start..))
}

/// Read the `initial_request_n` of a REQUEST_STREAM or REQUEST_CHANNEL
/// frame.
///
/// # Errors
///
/// Returns [`CodecError::TruncatedFrame`] when the frame ends before the
/// field does.
///
/// # Panics
///
/// Panics if the frame's type does not carry the field; callers gate on
/// [`FrameType::has_initial_request_n`].
pub fn initial_request_n(frame: &[u8]) -> Result<u32, CodecError> {
    let header = FrameHeader::parse(frame)?;
    assert!(
        header.frame_type().has_initial_request_n(),
        "{} frames carry no initial_request_n",
        header.frame_type(),
    );
    let end = FRAME_HEADER_SIZE + INITIAL_REQUEST_N_SIZE;
    if frame.len() < end {
        return Err(CodecError::TruncatedFrame {
            expected: end,
            actual: frame.len(),
        });
    }
    Ok(u32::from_be_bytes([
        frame[FRAME_HEADER_SIZE],
        frame[FRAME_HEADER_SIZE + 1],
        frame[FRAME_HEADER_SIZE + 2],
        frame[FRAME_HEADER_SIZE + 3],
    ]))
}

/// Assemble a wire frame for a type with prefixed metadata.
///
/// The `M` flag is derived from `metadata`: `Some` emits the 24-bit length
/// prefix (zero-length included) and sets the bit, `None` emits neither.
/// Synthetic aliases fold their implied `N`/`C` flags in and encode as
/// PAYLOAD.
///
/// # Panics
///
/// Panics if the type's layout is not [`PayloadLayout::PrefixedMetadata`],
/// if `initial_request_n` presence disagrees with the type, or if the
/// metadata exceeds the 24-bit length field. The fragmentation layer only
/// re-emits frames it has validated, so these are programmer errors.
#[must_use]
pub fn encode_frame(
    stream_id: StreamId,
    frame_type: FrameType,
    flags: FrameFlags,
    initial_request_n: Option<u32>,
    metadata: Option<&[u8]>,
    data: &[u8],
) -> Bytes {
    assert!(
        matches!(payload_layout(frame_type), PayloadLayout::PrefixedMetadata { .. }),
        "{frame_type} frames cannot be assembled by this codec",
    );
    assert_eq!(
        frame_type.has_initial_request_n(),
        initial_request_n.is_some(),
        "initial_request_n presence must match the frame type",
    );
    if let Some(metadata) = metadata {
        assert!(
            metadata.len() <= MAX_METADATA_LENGTH,
            "metadata exceeds the 24-bit length field",
        );
    }

    let mut flags = flags.without(FrameFlags::METADATA).with(frame_type.implied_flags());
    if metadata.is_some() {
        flags |= FrameFlags::METADATA;
    }

    let metadata_len = metadata.map_or(0, <[u8]>::len);
    let capacity = FRAME_HEADER_SIZE
        + initial_request_n.map_or(0, |_| INITIAL_REQUEST_N_SIZE)
        + metadata.map_or(0, |_| METADATA_LENGTH_SIZE + metadata_len)
        + data.len();
    let mut buf = BytesMut::with_capacity(capacity);

    FrameHeader::new(stream_id, frame_type, flags).encode_into(&mut buf);
    if let Some(request_n) = initial_request_n {
        buf.put_u32(request_n);
    }
    if let Some(metadata) = metadata {
        put_u24(&mut buf, metadata.len());
        buf.put_slice(metadata);
    }
    buf.put_slice(data);
    buf.freeze()
}
