use parsing::InvalidSidFormat;
use thiserror::Error;

/// Stable symbolic code identifying why a SID was rejected.
///
/// Codes are string-free at the type level; [`ErrorCode::as_str`] gives the
/// dotted name callers can log or map to localized messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Buffer length inconsistent with the declared sub-authority count.
    MalformedSize,
    /// Bare sub-authority buffer not a multiple of 4 bytes.
    MalformedSubAuthoritySize,
    /// Revision other than 1 where the canonical form is required.
    UnsupportedRevision,
    /// Text that is not a canonical SID string.
    InvalidFormat,
    /// An object did not have the expected concrete type.
    ObjectCast,
}

impl ErrorCode {
    /// Dotted symbolic name of the code.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedSize => "pac.sid.malformed.size",
            Self::MalformedSubAuthoritySize => "pac.subauthority.malformed.size",
            Self::UnsupportedRevision => "pac.sid.unsupported.revision",
            Self::InvalidFormat => "pac.sid.invalid.format",
            Self::ObjectCast => "kerberos.object.cast",
        }
    }
}

/// Errors raised while decoding, building or rendering a SID.
///
/// Every variant carries the values that caused the failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DecodingError {
    /// A raw SID of `length` bytes cannot hold `declared` sub-authorities,
    /// or a combined count would exceed 255.
    #[error("SID of {length} bytes does not match {declared} declared sub-authorities")]
    MalformedSize {
        /// Byte length of the offending buffer (or the would-be length).
        length: usize,
        /// Sub-authority count declared by the buffer (or requested).
        declared: usize,
    },

    /// A bare sub-authority buffer is not made of 4-byte blocks.
    #[error("sub-authority buffer of {length} bytes is not a multiple of 4")]
    MalformedSubAuthoritySize {
        /// Byte length of the offending buffer.
        length: usize,
    },

    /// Only revision 1 has a canonical string form.
    #[error("SID revision {revision} is not supported, expected 1")]
    UnsupportedRevision {
        /// Revision found in the SID.
        revision: u8,
    },

    /// The string is not a canonical `S-R-I-S...` SID.
    #[error("invalid SID string")]
    InvalidFormat(#[from] InvalidSidFormat),

    /// [`crate::object::check`] was given an object of another type.
    #[error("object is not a {expected}")]
    ObjectCast {
        /// Name of the type that was expected.
        expected: &'static str,
    },
}

impl DecodingError {
    /// The stable code of this error.
    ///
    /// # Examples
    /// ```rust
    /// # use pac_security_identifier::{PacSid, ErrorCode};
    /// let err = PacSid::from_bytes(&[1, 0]).unwrap_err();
    /// assert_eq!(err.code(), ErrorCode::MalformedSize);
    /// assert_eq!(err.code().as_str(), "pac.sid.malformed.size");
    /// ```
    #[inline]
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedSize { .. } => ErrorCode::MalformedSize,
            Self::MalformedSubAuthoritySize { .. } => ErrorCode::MalformedSubAuthoritySize,
            Self::UnsupportedRevision { .. } => ErrorCode::UnsupportedRevision,
            Self::InvalidFormat(_) => ErrorCode::InvalidFormat,
            Self::ObjectCast { .. } => ErrorCode::ObjectCast,
        }
    }
}
