//! Frame type codes and the synthetic PAYLOAD aliases.

use std::fmt;

use super::FrameFlags;

/// The six-bit frame type carried in the header.
///
/// The first fifteen variants are wire types with fixed codes. `Next`,
/// `Complete`, and `NextComplete` are synthetic aliases for PAYLOAD frames
/// with the corresponding `N`/`C` flags: they encode as PAYLOAD and are
/// produced only by [`from_payload_flags`](Self::from_payload_flags), never
/// by header parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameType {
    Setup,
    Lease,
    Keepalive,
    RequestResponse,
    RequestFnf,
    RequestStream,
    RequestChannel,
    RequestN,
    Cancel,
    Payload,
    Error,
    MetadataPush,
    Resume,
    ResumeOk,
    Ext,
    Next,
    Complete,
    NextComplete,
}

impl FrameType {
    /// Wire code for this type. Synthetic aliases encode as PAYLOAD.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Setup => 0x01,
            Self::Lease => 0x02,
            Self::Keepalive => 0x03,
            Self::RequestResponse => 0x04,
            Self::RequestFnf => 0x05,
            Self::RequestStream => 0x06,
            Self::RequestChannel => 0x07,
            Self::RequestN => 0x08,
            Self::Cancel => 0x09,
            Self::Payload | Self::Next | Self::Complete | Self::NextComplete => 0x0A,
            Self::Error => 0x0B,
            Self::MetadataPush => 0x0C,
            Self::Resume => 0x0D,
            Self::ResumeOk => 0x0E,
            Self::Ext => 0x3F,
        }
    }

    /// Resolve a wire code. Never yields a synthetic alias.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::Setup),
            0x02 => Some(Self::Lease),
            0x03 => Some(Self::Keepalive),
            0x04 => Some(Self::RequestResponse),
            0x05 => Some(Self::RequestFnf),
            0x06 => Some(Self::RequestStream),
            0x07 => Some(Self::RequestChannel),
            0x08 => Some(Self::RequestN),
            0x09 => Some(Self::Cancel),
            0x0A => Some(Self::Payload),
            0x0B => Some(Self::Error),
            0x0C => Some(Self::MetadataPush),
            0x0D => Some(Self::Resume),
            0x0E => Some(Self::ResumeOk),
            0x3F => Some(Self::Ext),
            _ => None,
        }
    }

    /// Interpret a PAYLOAD frame's `N`/`C` flags as the synthetic alias the
    /// protocol engine works with.
    #[must_use]
    pub const fn from_payload_flags(flags: FrameFlags) -> Self {
        let next = flags.contains(FrameFlags::NEXT);
        let complete = flags.contains(FrameFlags::COMPLETE);
        match (next, complete) {
            (true, true) => Self::NextComplete,
            (true, false) => Self::Next,
            (false, true) => Self::Complete,
            (false, false) => Self::Payload,
        }
    }

    /// Flags implied by a synthetic alias when encoding.
    #[must_use]
    pub const fn implied_flags(self) -> FrameFlags {
        match self {
            Self::Next => FrameFlags::NEXT,
            Self::Complete => FrameFlags::COMPLETE,
            Self::NextComplete => FrameFlags::NEXT.with(FrameFlags::COMPLETE),
            _ => FrameFlags::NONE,
        }
    }

    /// Whether this type's payload may legally be split across fragments.
    #[must_use]
    pub const fn is_fragmentable(self) -> bool {
        matches!(
            self,
            Self::RequestResponse
                | Self::RequestFnf
                | Self::RequestStream
                | Self::RequestChannel
                | Self::Payload
                | Self::Next
                | Self::Complete
                | Self::NextComplete
        )
    }

    /// Whether the payload region belongs to the PAYLOAD family (wire code
    /// 0x0A).
    #[must_use]
    pub const fn is_payload_family(self) -> bool { self.code() == 0x0A }

    /// Whether the first fragment carries a 32-bit `initial_request_n`
    /// between the header and the payload region.
    #[must_use]
    pub const fn has_initial_request_n(self) -> bool {
        matches!(self, Self::RequestStream | Self::RequestChannel)
    }

    /// Protocol-spec name of the type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Setup => "SETUP",
            Self::Lease => "LEASE",
            Self::Keepalive => "KEEPALIVE",
            Self::RequestResponse => "REQUEST_RESPONSE",
            Self::RequestFnf => "REQUEST_FNF",
            Self::RequestStream => "REQUEST_STREAM",
            Self::RequestChannel => "REQUEST_CHANNEL",
            Self::RequestN => "REQUEST_N",
            Self::Cancel => "CANCEL",
            Self::Payload => "PAYLOAD",
            Self::Error => "ERROR",
            Self::MetadataPush => "METADATA_PUSH",
            Self::Resume => "RESUME",
            Self::ResumeOk => "RESUME_OK",
            Self::Ext => "EXT",
            Self::Next => "NEXT",
            Self::Complete => "COMPLETE",
            Self::NextComplete => "NEXT_COMPLETE",
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}
