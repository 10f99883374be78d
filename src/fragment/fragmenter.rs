//! Outbound splitter turning one logical frame into a lazy fragment
//! sequence.
//!
//! [`FrameFragmenter::fragment`] validates and slices the input once, then
//! hands back [`Fragments`], an iterator assembling exactly one wire
//! fragment per `next()` call. Nothing is built ahead of demand, so a
//! transport that polls one write at a time gets natural backpressure.

use std::iter::FusedIterator;

use bytes::Bytes;

use crate::frame::{
    self,
    FrameFlags,
    FrameHeader,
    FrameType,
    StreamId,
    FRAME_HEADER_SIZE,
    INITIAL_REQUEST_N_SIZE,
    METADATA_LENGTH_SIZE,
};

use super::{
    config::MIN_MTU,
    error::FragmentationError,
};

/// Splits oversized fragmentable frames into MTU-bounded wire fragments.
#[derive(Clone, Copy, Debug)]
pub struct FrameFragmenter {
    mtu: usize,
    encode_length: bool,
}

impl FrameFragmenter {
    /// Create a fragmenter capping every wire fragment at `mtu` bytes
    /// (excluding the optional length prefix).
    ///
    /// # Errors
    ///
    /// Returns [`FragmentationError::MtuTooSmall`] below [`MIN_MTU`] and
    /// [`FragmentationError::MtuTooLarge`] above the 24-bit frame length
    /// maximum.
    pub fn new(mtu: usize, encode_length: bool) -> Result<Self, FragmentationError> {
        if mtu < MIN_MTU {
            return Err(FragmentationError::MtuTooSmall { mtu, min: MIN_MTU });
        }
        if mtu > frame::MAX_FRAME_LENGTH {
            return Err(FragmentationError::MtuTooLarge {
                mtu,
                max: frame::MAX_FRAME_LENGTH,
            });
        }
        Ok(Self { mtu, encode_length })
    }

    /// The configured per-fragment cap.
    #[must_use]
    pub const fn mtu(&self) -> usize { self.mtu }

    /// Split `frame` into an ordered, lazy sequence of wire fragments.
    ///
    /// A frame that already fits yields exactly one element with FOLLOWS
    /// clear, byte-identical in meaning to the input.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentationError::InvalidFrameType`] for types that may
    /// not be split and [`FragmentationError::Malformed`] when the frame's
    /// layout cannot be sliced.
    pub fn fragment(&self, frame: Bytes) -> Result<Fragments, FragmentationError> {
        let header = FrameHeader::parse(&frame)?;
        if !header.frame_type().is_fragmentable() {
            return Err(FragmentationError::InvalidFrameType(header.frame_type()));
        }

        let metadata = frame::slice_metadata(&frame)?;
        let data = frame::slice_data(&frame)?;
        let initial_request_n = if header.frame_type().has_initial_request_n() {
            Some(frame::initial_request_n(&frame)?)
        } else {
            None
        };

        Ok(Fragments {
            stream_id: header.stream_id(),
            frame_type: header.frame_type(),
            flags: header.flags(),
            initial_request_n,
            metadata,
            data,
            mtu: self.mtu,
            encode_length: self.encode_length,
            first: true,
            done: false,
        })
    }
}

/// Lazy, ordered, finite sequence of wire fragments for one logical frame.
///
/// The first element keeps the original type and type-specific prefix;
/// every later element is a PAYLOAD continuation. Exactly the last element
/// has FOLLOWS clear.
#[derive(Debug)]
pub struct Fragments {
    stream_id: StreamId,
    frame_type: FrameType,
    flags: FrameFlags,
    initial_request_n: Option<u32>,
    metadata: Option<Bytes>,
    data: Bytes,
    mtu: usize,
    encode_length: bool,
    first: bool,
    done: bool,
}

impl Fragments {
    /// Flags for the fragment being emitted.
    ///
    /// Request types keep their original flags on the first fragment and
    /// carry none on continuations. PAYLOAD chains hold `N`/`C` back until
    /// the terminal fragment so the flags describe the payload as a whole;
    /// a single-fragment emission keeps them in place.
    fn fragment_flags(&self, follows: bool) -> (FrameType, FrameFlags) {
        let payload_flags = FrameFlags::NEXT.with(FrameFlags::COMPLETE);
        let mut flags = if self.first {
            let mut flags = self.flags.without(FrameFlags::FOLLOWS);
            if self.frame_type.is_payload_family() && follows {
                flags = flags.without(payload_flags);
            }
            flags
        } else if !follows && self.frame_type.is_payload_family() {
            self.flags & payload_flags
        } else {
            FrameFlags::NONE
        };
        if follows {
            flags |= FrameFlags::FOLLOWS;
        }

        let frame_type = if self.first { self.frame_type } else { FrameType::Payload };
        (frame_type, flags)
    }
}

impl Iterator for Fragments {
    type Item = Bytes;

    fn next(&mut self) -> Option<Bytes> {
        if self.done {
            return None;
        }

        let mut budget = self.mtu - FRAME_HEADER_SIZE;
        let request_n = if self.first { self.initial_request_n } else { None };
        if request_n.is_some() {
            budget -= INITIAL_REQUEST_N_SIZE;
        }

        let metadata_chunk = self.metadata.as_mut().map(|remaining| {
            budget -= METADATA_LENGTH_SIZE;
            let take = budget.min(remaining.len());
            budget -= take;
            remaining.split_to(take)
        });
        if self.metadata.as_ref().is_some_and(Bytes::is_empty) {
            self.metadata = None;
        }

        let data_chunk = if budget > 0 && !self.data.is_empty() {
            let take = budget.min(self.data.len());
            self.data.split_to(take)
        } else {
            Bytes::new()
        };

        let follows = self.metadata.is_some() || !self.data.is_empty();
        let (frame_type, flags) = self.fragment_flags(follows);

        let wire = frame::encode_frame(
            self.stream_id,
            frame_type,
            flags,
            request_n,
            metadata_chunk.as_deref(),
            &data_chunk,
        );

        self.first = false;
        self.done = !follows;

        if self.encode_length {
            Some(frame::prepend_length(&wire).expect("fragment length bounded by the mtu"))
        } else {
            Some(wire)
        }
    }
}

impl FusedIterator for Fragments {}
