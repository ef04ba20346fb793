use alloc::string::String;
use core::fmt::{self, Write};

use crate::sid::{COUNT_OFFSET, SID_HEAD_SIZE};
use crate::{DecodingError, SidSizeInfo};

/// Validates a raw PAC SID blob.
///
/// - at least the 8-byte head
/// - the tail is made of whole 4-byte sub-authorities
/// - their number equals the count byte
///
/// The revision is not checked here: only the canonical string form requires
/// revision 1.
pub(crate) fn validate_sid_bytes(buf: &[u8]) -> Result<SidSizeInfo, DecodingError> {
    let malformed = |declared: usize| {
        log::debug!(
            "rejecting SID of {} bytes declaring {declared} sub-authorities",
            buf.len()
        );
        DecodingError::MalformedSize {
            length: buf.len(),
            declared,
        }
    };
    if buf.len() < SID_HEAD_SIZE {
        return Err(malformed(buf.get(COUNT_OFFSET).map_or(0, |&c| usize::from(c))));
    }
    let declared = buf.get(COUNT_OFFSET).copied().unwrap_or_default();
    match SidSizeInfo::from_full_size(buf.len()) {
        Some(info) if info.get_sub_authority_count() == declared => Ok(info),
        _ => Err(malformed(usize::from(declared))),
    }
}

/// Writes `bytes` as backslash-prefixed, lowercase two-digit hex groups.
pub(crate) fn write_hex_groups<W: Write>(out: &mut W, bytes: &[u8]) -> fmt::Result {
    bytes.iter().try_for_each(|b| write!(out, "\\{b:02x}"))
}

/// Renders any byte buffer as `\xx\yy...`, the diagnostic layout used by
/// [`PacSid::to_debug_string`](crate::PacSid::to_debug_string).
///
/// # Examples
/// ```rust
/// assert_eq!(pac_security_identifier::format_bytes(&[1, 0xAB]), "\\01\\ab");
/// ```
#[inline]
#[must_use]
pub fn format_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    // Writing into a String cannot fail.
    let _ = write_hex_groups(&mut out, bytes);
    out
}
