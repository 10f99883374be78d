//! Inbound accumulator stitching fragment chains back into whole frames.
//!
//! State is keyed by stream id: a chain opens when a fragmentable frame
//! arrives with FOLLOWS set, grows on PAYLOAD continuations, and closes on
//! the first continuation with FOLLOWS clear. Anything else mid-chain is a
//! protocol violation that drops the stream's partial state. Frames
//! outside a chain pass through untouched.

use std::{
    collections::{hash_map::Entry, HashMap},
    num::NonZeroUsize,
};

use bytes::{Bytes, BytesMut};
use log::debug;

use crate::frame::{
    self,
    FrameFlags,
    FrameHeader,
    FrameType,
    StreamId,
    MAX_METADATA_LENGTH,
};

use super::error::ReassemblyError;

/// Partial logical frame captured from a chain's first fragment.
#[derive(Debug)]
struct PartialFrame {
    frame_type: FrameType,
    flags: FrameFlags,
    initial_request_n: Option<u32>,
    /// `Some` once any fragment has contributed a metadata region, even an
    /// empty one.
    metadata: Option<BytesMut>,
    data: BytesMut,
}

impl PartialFrame {
    fn accumulated_len(&self) -> usize {
        self.data.len() + self.metadata.as_ref().map_or(0, BytesMut::len)
    }

    fn metadata_len(&self) -> usize { self.metadata.as_ref().map_or(0, BytesMut::len) }

    fn append(&mut self, metadata: Option<&Bytes>, data: &Bytes) {
        if let Some(metadata) = metadata {
            self.metadata
                .get_or_insert_with(BytesMut::new)
                .extend_from_slice(metadata);
        }
        self.data.extend_from_slice(data);
    }
}

/// Per-stream fragment accumulator.
#[derive(Debug, Default)]
pub struct FrameReassembler {
    max_reassembly_size: Option<NonZeroUsize>,
    partials: HashMap<StreamId, PartialFrame>,
}

impl FrameReassembler {
    /// Create a reassembler, optionally capping the accumulated
    /// metadata-plus-data size of any one frame.
    #[must_use]
    pub fn new(max_reassembly_size: Option<NonZeroUsize>) -> Self {
        Self {
            max_reassembly_size,
            partials: HashMap::new(),
        }
    }

    /// Feed one inbound wire frame (without length prefix).
    ///
    /// Returns `Ok(Some(_))` with a whole logical frame when the input
    /// completes a chain or stands alone, and `Ok(None)` while a chain is
    /// still collecting.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError`] on protocol violations, cap overruns,
    /// and malformed fragments. Violations and overruns drop the stream's
    /// partial state.
    pub fn reassemble(&mut self, fragment: Bytes) -> Result<Option<Bytes>, ReassemblyError> {
        let header = FrameHeader::parse(&fragment)?;
        let stream_id = header.stream_id();

        match self.partials.entry(stream_id) {
            Entry::Occupied(mut entry) => {
                if header.frame_type() != FrameType::Payload {
                    entry.remove();
                    return Err(ReassemblyError::UnexpectedContinuation {
                        stream_id,
                        found: header.frame_type(),
                    });
                }

                let metadata = frame::slice_metadata(&fragment)?;
                let data = frame::slice_data(&fragment)?;

                let incoming =
                    data.len() + metadata.as_ref().map_or(0, Bytes::len);
                if let Some(limit) = self.max_reassembly_size {
                    let attempted = entry.get().accumulated_len().saturating_add(incoming);
                    if attempted > limit.get() {
                        entry.remove();
                        return Err(ReassemblyError::FrameTooLarge {
                            stream_id,
                            attempted,
                            limit,
                        });
                    }
                }
                let metadata_total = entry
                    .get()
                    .metadata_len()
                    .saturating_add(metadata.as_ref().map_or(0, Bytes::len));
                if metadata_total > MAX_METADATA_LENGTH {
                    entry.remove();
                    return Err(ReassemblyError::MetadataOverflow { stream_id });
                }

                entry.get_mut().append(metadata.as_ref(), &data);

                if header.has_follows() {
                    Ok(None)
                } else {
                    let partial = entry.remove();
                    debug!("stream {stream_id}: chain complete, emitting reassembled frame");
                    Ok(Some(Self::emit(stream_id, &partial, header.flags())))
                }
            }
            Entry::Vacant(vacant) => {
                if !header.has_follows() {
                    return Ok(Some(fragment));
                }

                let metadata = frame::slice_metadata(&fragment)?;
                let data = frame::slice_data(&fragment)?;

                if let Some(limit) = self.max_reassembly_size {
                    let attempted = data.len() + metadata.as_ref().map_or(0, Bytes::len);
                    if attempted > limit.get() {
                        return Err(ReassemblyError::FrameTooLarge {
                            stream_id,
                            attempted,
                            limit,
                        });
                    }
                }

                let initial_request_n = if header.frame_type().has_initial_request_n() {
                    Some(frame::initial_request_n(&fragment)?)
                } else {
                    None
                };

                debug!(
                    "stream {stream_id}: opening {} chain",
                    header.frame_type(),
                );
                let mut partial = PartialFrame {
                    frame_type: header.frame_type(),
                    flags: header.flags().without(FrameFlags::FOLLOWS),
                    initial_request_n,
                    metadata: None,
                    data: BytesMut::new(),
                };
                partial.append(metadata.as_ref(), &data);
                vacant.insert(partial);
                Ok(None)
            }
        }
    }

    /// Re-encode a completed chain as one logical frame.
    ///
    /// Header fields come from the first fragment. `N`/`C` come from the
    /// terminal fragment for PAYLOAD chains, where they describe the
    /// payload as a whole; request chains keep the first fragment's flags.
    fn emit(stream_id: StreamId, partial: &PartialFrame, terminal_flags: FrameFlags) -> Bytes {
        let payload_flags = FrameFlags::NEXT.with(FrameFlags::COMPLETE);
        let mut flags = partial.flags;
        if partial.frame_type.is_payload_family() {
            flags = flags.without(payload_flags).with(terminal_flags & payload_flags);
        }
        frame::encode_frame(
            stream_id,
            partial.frame_type,
            flags,
            partial.initial_request_n,
            partial.metadata.as_deref(),
            &partial.data,
        )
    }

    /// Number of chains currently collecting.
    #[must_use]
    pub fn in_progress(&self) -> usize { self.partials.len() }

    /// Drop every partial chain without emitting anything. Idempotent.
    pub fn dispose(&mut self) {
        if !self.partials.is_empty() {
            debug!("dropping {} partial frame(s) on dispose", self.partials.len());
        }
        self.partials.clear();
    }
}
