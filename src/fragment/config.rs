//! Configuration for the fragmentation and reassembly layer.

use std::num::NonZeroUsize;

use crate::frame::{
    FRAME_HEADER_SIZE,
    INITIAL_REQUEST_N_SIZE,
    MAX_FRAME_LENGTH,
    METADATA_LENGTH_SIZE,
};

use super::error::FragmentationError;

/// Smallest usable MTU.
///
/// A first fragment must fit the header, the largest type-specific prefix,
/// a metadata length field, and at least one payload byte, so every
/// `next()` call on the fragment sequence makes progress.
pub const MIN_MTU: usize =
    FRAME_HEADER_SIZE + INITIAL_REQUEST_N_SIZE + METADATA_LENGTH_SIZE + 1;

/// Settings for a [`FragmentingDuplexConnection`](super::FragmentingDuplexConnection).
#[derive(Clone, Copy, Debug)]
pub struct FragmentationConfig {
    /// Per-fragment size cap, excluding the optional length prefix. Zero
    /// disables fragmentation entirely.
    pub mtu: usize,
    /// Whether every wire frame carries a 24-bit length prefix.
    pub encode_length: bool,
    /// Cap on the accumulated metadata-plus-data size of one reassembling
    /// frame. `None` leaves reassembly unbounded.
    pub max_reassembly_size: Option<NonZeroUsize>,
}

impl FragmentationConfig {
    /// Validate and build a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentationError::MtuTooSmall`] when `0 < mtu <`
    /// [`MIN_MTU`] and [`FragmentationError::MtuTooLarge`] when fragments
    /// could not be expressed by the 24-bit length prefix.
    pub fn new(
        mtu: usize,
        encode_length: bool,
        max_reassembly_size: Option<NonZeroUsize>,
    ) -> Result<Self, FragmentationError> {
        if mtu > 0 && mtu < MIN_MTU {
            return Err(FragmentationError::MtuTooSmall { mtu, min: MIN_MTU });
        }
        if mtu > MAX_FRAME_LENGTH {
            return Err(FragmentationError::MtuTooLarge {
                mtu,
                max: MAX_FRAME_LENGTH,
            });
        }
        Ok(Self {
            mtu,
            encode_length,
            max_reassembly_size,
        })
    }

    /// Configuration with fragmentation turned off; frames of any size
    /// pass through whole.
    #[must_use]
    pub const fn disabled(encode_length: bool) -> Self {
        Self {
            mtu: 0,
            encode_length,
            max_reassembly_size: None,
        }
    }

    /// Whether outbound frames are ever fragmented.
    #[must_use]
    pub const fn is_enabled(&self) -> bool { self.mtu > 0 }
}
