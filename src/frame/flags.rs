//! Ten-bit flag set carried in the low bits of the type-and-flags header
//! word.

use std::ops::{BitAnd, BitOr, BitOrAssign};

use derive_more::Display;

/// Frame flags as laid out on the wire.
///
/// The named constants cover the bits shared across fragmentable types.
/// Non-fragmentable types overload the same positions with type-specific
/// meanings (the `0x080` bit is *respond* on KEEPALIVE and *resume enable*
/// on SETUP), so [`FOLLOWS`](Self::FOLLOWS) must only be interpreted on
/// types that may legally fragment.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash)]
#[display("{_0:#05x}")]
pub struct FrameFlags(u16);

impl FrameFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// A metadata region is present in the payload.
    pub const METADATA: Self = Self(0x100);
    /// More fragments of the same logical frame will follow.
    pub const FOLLOWS: Self = Self(0x080);
    /// Stream completion (`C`), or *last* on REQUEST_CHANNEL.
    pub const COMPLETE: Self = Self(0x040);
    /// Payload carries a next element (`N`).
    pub const NEXT: Self = Self(0x020);
    /// All ten wire bits.
    pub const MASK: u16 = 0x3FF;

    /// Build a flag set from raw wire bits, discarding anything outside the
    /// ten-bit range.
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self { Self(bits & Self::MASK) }

    /// Return the raw wire bits.
    #[must_use]
    pub const fn bits(self) -> u16 { self.0 }

    /// Whether every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 }

    /// Union of the two flag sets.
    #[must_use]
    pub const fn with(self, other: Self) -> Self { Self(self.0 | other.0) }

    /// `self` with every bit of `other` cleared.
    #[must_use]
    pub const fn without(self, other: Self) -> Self { Self(self.0 & !other.0) }
}

impl BitOr for FrameFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self { self.with(rhs) }
}

impl BitOrAssign for FrameFlags {
    fn bitor_assign(&mut self, rhs: Self) { *self = self.with(rhs); }
}

impl BitAnd for FrameFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self { Self(self.0 & rhs.0) }
}
