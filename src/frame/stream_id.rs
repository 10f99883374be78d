use derive_more::Display;

/// Identifier multiplexing independent logical channels on one connection.
///
/// Stream ids occupy the low 31 bits of the first header word; bit 31 is
/// reserved and always zero on the wire.
///
/// # Examples
///
/// ```
/// use splitwire::StreamId;
/// let id = StreamId::new(7);
/// assert_eq!(id.get(), 7);
/// ```
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("{_0}")]
pub struct StreamId(u32);

impl StreamId {
    /// Largest representable stream id (31 bits).
    pub const MAX: u32 = 0x7FFF_FFFF;

    /// Create a stream id from its numeric value.
    ///
    /// # Panics
    ///
    /// Panics if `value` does not fit in 31 bits.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        assert!(value <= Self::MAX, "stream id exceeds 31 bits");
        Self(value)
    }

    /// Extract a stream id from the first header word, dropping the
    /// reserved bit.
    #[must_use]
    pub const fn from_wire(word: u32) -> Self { Self(word & Self::MAX) }

    /// Return the numeric value.
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }
}
