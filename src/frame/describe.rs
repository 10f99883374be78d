//! Log-friendly frame summaries.

use super::FrameHeader;

/// One-line summary of a wire frame for log output.
///
/// Malformed input is summarised rather than rejected so the helper can be
/// used in error paths.
#[must_use]
pub fn describe(frame: &[u8]) -> String {
    match FrameHeader::parse(frame) {
        Ok(header) => format!(
            "stream {} type {} flags {} length {}",
            header.stream_id(),
            header.frame_type(),
            header.flags(),
            frame.len(),
        ),
        Err(_) => format!("malformed frame ({} bytes)", frame.len()),
    }
}
