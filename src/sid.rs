//! Owned representation of a SID as carried in Kerberos PAC buffers.
//!
//! Wire layout: `[revision:1][count:1][authority:6 BE][sub-authority:4 LE]*`.
//! Unlike `IsValidSid`, any count in `0..=255` is accepted and the revision is
//! only checked when the canonical string form is requested.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{self, Debug, Display};
use core::str::FromStr;

use delegate::delegate;
use parsing::SidComponents;

use crate::utils::{validate_sid_bytes, write_hex_groups};
use crate::{DecodingError, SidIdentifierAuthority, SidSizeInfo, format_bytes};

pub use parsing::MAX_SUBAUTHORITY_COUNT;
pub use parsing::MIN_SUBAUTHORITY_COUNT;

pub(crate) const COUNT_OFFSET: usize = 1;
pub(crate) const SID_HEAD_SIZE: usize = 8;
pub(crate) const SUB_AUTHORITY_SIZE: usize = size_of::<u32>();

/// Owned Windows **Security Identifier** decoded from a PAC buffer.
///
/// The value is immutable; combining operations such as [`PacSid::append`]
/// return a new SID and never share storage with their inputs.
///
/// # Invariants
/// - at most [`MAX_SUBAUTHORITY_COUNT`] sub-authorities, so the count always
///   fits its 1-byte field;
/// - the serialized length is always `8 + 4 * count`.
///
/// # Examples
/// ```rust
/// # use pac_security_identifier::PacSid;
/// let domain = PacSid::from_bytes(&[1, 1, 0, 0, 0, 0, 0, 5, 21, 0, 0, 0]).unwrap();
/// let rid = PacSid::from_sub_authorities(&500u32.to_le_bytes()).unwrap();
/// let account = domain.append(&rid).unwrap();
/// assert_eq!(account.to_canonical_string().unwrap(), "S-1-5-21-500");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PacSid {
    revision: u8,
    identifier_authority: SidIdentifierAuthority,
    sub_authority: Box<[u32]>,
}

fn read_sub_authorities(tail: &[u8]) -> Box<[u32]> {
    tail.chunks_exact(SUB_AUTHORITY_SIZE)
        .map(|chunk| {
            let mut block = [0u8; SUB_AUTHORITY_SIZE];
            block.copy_from_slice(chunk);
            u32::from_le_bytes(block)
        })
        .collect()
}

impl PacSid {
    /// The only revision with a canonical string form.
    pub const REVISION: u8 = 1;

    /// Creates a `PacSid` from typed parts.
    ///
    /// # Errors
    /// [`DecodingError::MalformedSize`] if there are more than
    /// [`MAX_SUBAUTHORITY_COUNT`] sub-authorities.
    ///
    /// # Examples
    /// ```rust
    /// # use pac_security_identifier::{PacSid, SidIdentifierAuthority};
    /// let sid = PacSid::try_new(1, SidIdentifierAuthority::NT_AUTHORITY, [32, 544]).unwrap();
    /// assert_eq!(sid.to_string(), "S-1-5-32-544");
    /// ```
    #[inline]
    pub fn try_new<I: Into<SidIdentifierAuthority>, S: AsRef<[u32]>>(
        revision: u8,
        identifier_authority: I,
        sub_authority: S,
    ) -> Result<Self, DecodingError> {
        let sub_authority = sub_authority.as_ref();
        if sub_authority.len() > usize::from(MAX_SUBAUTHORITY_COUNT) {
            log::debug!(
                "rejecting SID with {} sub-authorities",
                sub_authority.len()
            );
            return Err(DecodingError::MalformedSize {
                length: SID_HEAD_SIZE + sub_authority.len() * SUB_AUTHORITY_SIZE,
                declared: sub_authority.len(),
            });
        }
        Ok(Self {
            revision,
            identifier_authority: identifier_authority.into(),
            sub_authority: sub_authority.into(),
        })
    }

    /// Parses a raw SID buffer.
    ///
    /// All fields are copied; the result does not borrow `bytes`.
    ///
    /// # Errors
    /// [`DecodingError::MalformedSize`] if `bytes` is shorter than 8 bytes, if
    /// its tail is not made of 4-byte blocks, or if the number of blocks does
    /// not equal the count byte.
    ///
    /// # Examples
    /// ```rust
    /// # use pac_security_identifier::{PacSid, ErrorCode};
    /// let sid = PacSid::from_bytes(&[1, 1, 0, 0, 0, 0, 0, 5, 21, 0, 0, 0]).unwrap();
    /// assert_eq!(sid.sub_authorities(), [21]);
    ///
    /// let err = PacSid::from_bytes(&[1, 2, 0, 0, 0, 0, 0, 5, 1, 0, 0, 0]).unwrap_err();
    /// assert_eq!(err.code(), ErrorCode::MalformedSize);
    /// ```
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodingError> {
        let info = validate_sid_bytes(bytes)?;
        let Some((&[revision, _, authority @ ..], tail)) =
            bytes.split_first_chunk::<SID_HEAD_SIZE>()
        else {
            return Err(DecodingError::MalformedSize {
                length: bytes.len(),
                declared: 0,
            });
        };
        debug_assert_eq!(tail.len(), info.sub_authorities_size(), "validated tail size");
        let sid = Self {
            revision,
            identifier_authority: SidIdentifierAuthority::new(authority),
            sub_authority: read_sub_authorities(tail),
        };
        log::trace!("decoded SID {sid}");
        Ok(sid)
    }

    /// Builds a SID under the NT authority (`S-1-5-...`) from raw,
    /// little-endian sub-authority blocks.
    ///
    /// # Errors
    /// - [`DecodingError::MalformedSubAuthoritySize`] if `bytes.len()` is not a
    ///   multiple of 4.
    /// - [`DecodingError::MalformedSize`] if `bytes` holds more than
    ///   [`MAX_SUBAUTHORITY_COUNT`] blocks.
    ///
    /// # Examples
    /// ```rust
    /// # use pac_security_identifier::PacSid;
    /// let sid = PacSid::from_sub_authorities(&[21, 0, 0, 0, 1, 0, 0, 0]).unwrap();
    /// assert_eq!(sid.to_canonical_string().unwrap(), "S-1-5-21-1");
    /// ```
    #[inline]
    pub fn from_sub_authorities(bytes: &[u8]) -> Result<Self, DecodingError> {
        if bytes.len() % SUB_AUTHORITY_SIZE != 0 {
            log::debug!(
                "rejecting sub-authority buffer of {} bytes",
                bytes.len()
            );
            return Err(DecodingError::MalformedSubAuthoritySize {
                length: bytes.len(),
            });
        }
        #[expect(
            clippy::integer_division,
            reason = "Remainder was checked to be zero"
        )]
        let count = bytes.len() / SUB_AUTHORITY_SIZE;
        // An oversized count cannot match the block count, so parsing rejects it.
        let count_byte = u8::try_from(count).unwrap_or(u8::MAX);

        let mut raw = Vec::with_capacity(SID_HEAD_SIZE + bytes.len());
        raw.extend_from_slice(&[Self::REVISION, count_byte]);
        raw.extend_from_slice(&SidIdentifierAuthority::NT_AUTHORITY.value);
        raw.extend_from_slice(bytes);
        Self::from_bytes(&raw)
    }

    /// Concatenates the sub-authorities of `self` and `other`, keeping the
    /// revision and authority of `self`.
    ///
    /// Typically joins a domain SID with a relative identifier.
    ///
    /// # Errors
    /// [`DecodingError::MalformedSize`] if the combined count exceeds
    /// [`MAX_SUBAUTHORITY_COUNT`].
    #[inline]
    pub fn append(&self, other: &Self) -> Result<Self, DecodingError> {
        let declared = self.sub_authority.len() + other.sub_authority.len();
        if SidSizeInfo::from_counts(self.sub_authority_count(), other.sub_authority_count())
            .is_none()
        {
            log::debug!("appending SIDs would yield {declared} sub-authorities");
            return Err(DecodingError::MalformedSize {
                length: SID_HEAD_SIZE + declared * SUB_AUTHORITY_SIZE,
                declared,
            });
        }
        let sub_authority: Box<[u32]> = self
            .sub_authority
            .iter()
            .chain(other.sub_authority.iter())
            .copied()
            .collect();
        Ok(Self {
            revision: self.revision,
            identifier_authority: self.identifier_authority,
            sub_authority,
        })
    }

    /// The SID revision, generally 1.
    #[inline]
    #[must_use]
    pub const fn revision(&self) -> u8 {
        self.revision
    }

    /// Number of sub-authorities.
    #[inline]
    #[must_use]
    pub fn sub_authority_count(&self) -> u8 {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Constructors bound the length by MAX_SUBAUTHORITY_COUNT"
        )]
        let count = self.sub_authority.len() as u8;
        count
    }

    /// The 6-byte identifier authority.
    #[inline]
    #[must_use]
    pub const fn identifier_authority(&self) -> SidIdentifierAuthority {
        self.identifier_authority
    }

    /// Sub-authorities in storage order.
    #[inline]
    #[must_use]
    pub fn sub_authorities(&self) -> &[u32] {
        &self.sub_authority
    }

    /// Last sub-authority, the RID of an account SID.
    #[inline]
    #[must_use]
    pub fn relative_identifier(&self) -> Option<u32> {
        self.sub_authority.last().copied()
    }

    /// `true` when the SID has no sub-authority.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sub_authority.is_empty()
    }

    /// `true` when every sub-authority is zero (including when there is none).
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.sub_authority.iter().all(|&sub| sub == 0)
    }

    /// Size of [`Self::to_bytes`] output: `8 + 4 * count`.
    #[inline]
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        SidSizeInfo::from_count(self.sub_authority_count()).full_size()
    }

    /// Serializes back to the raw layout accepted by [`Self::from_bytes`].
    ///
    /// # Examples
    /// ```rust
    /// # use pac_security_identifier::PacSid;
    /// let raw = [1, 1, 0, 0, 0, 0, 0, 5, 21, 0, 0, 0];
    /// assert_eq!(PacSid::from_bytes(&raw).unwrap().to_bytes(), raw);
    /// ```
    #[inline]
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.extend_from_slice(&[self.revision, self.sub_authority_count()]);
        bytes.extend_from_slice(&self.identifier_authority.value);
        for sub in &self.sub_authority {
            bytes.extend_from_slice(&sub.to_le_bytes());
        }
        bytes
    }

    /// Renders the canonical `S-1-<authority>-<sub>...` form.
    ///
    /// # Errors
    /// [`DecodingError::UnsupportedRevision`] unless the revision is 1.
    ///
    /// # Examples
    /// ```rust
    /// # use pac_security_identifier::{PacSid, ErrorCode};
    /// let sid = PacSid::from_bytes(&[1, 1, 0, 0, 0, 0, 0, 5, 21, 0, 0, 0]).unwrap();
    /// assert_eq!(sid.to_canonical_string().unwrap(), "S-1-5-21");
    ///
    /// let v2 = PacSid::from_bytes(&[2, 0, 0, 0, 0, 0, 0, 5]).unwrap();
    /// assert_eq!(v2.to_canonical_string().unwrap_err().code(), ErrorCode::UnsupportedRevision);
    /// ```
    #[inline]
    pub fn to_canonical_string(&self) -> Result<String, DecodingError> {
        if self.revision != Self::REVISION {
            log::debug!("no canonical form for SID revision {}", self.revision);
            return Err(DecodingError::UnsupportedRevision {
                revision: self.revision,
            });
        }
        Ok(self.to_string())
    }

    /// Diagnostic dump of the raw bytes as `\01\01\00...`.
    ///
    /// Not a substitute for [`Self::to_canonical_string`].
    #[inline]
    #[must_use]
    pub fn to_debug_string(&self) -> String {
        format_bytes(&self.to_bytes())
    }
}

impl AsRef<[u32]> for PacSid {
    delegate! {
        to self.sub_authority {
            #[inline]
            fn as_ref(&self) -> &[u32];
        }
    }
}

impl TryFrom<&[u8]> for PacSid {
    type Error = DecodingError;

    #[inline]
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(value)
    }
}

impl From<&PacSid> for Vec<u8> {
    #[inline]
    fn from(value: &PacSid) -> Self {
        value.to_bytes()
    }
}

impl FromStr for PacSid {
    type Err = DecodingError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = SidComponents::from_str(s)?;
        Self::try_new(
            components.revision,
            components.identifier_authority,
            components.sub_authority.as_slice(),
        )
    }
}

/// Canonical grammar for whatever revision is stored; use
/// [`PacSid::to_canonical_string`] to enforce revision 1.
impl Display for PacSid {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}-{}", self.revision, self.identifier_authority)?;
        for sub_auth in &self.sub_authority {
            write!(f, "-{sub_auth}")?;
        }
        Ok(())
    }
}

impl Debug for PacSid {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PacSid(")?;
        write_hex_groups(f, &self.to_bytes())?;
        f.write_str(")")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
pub(crate) mod test {
    use super::*;
    use crate::ErrorCode;
    use crate::arb_identifier_authority;
    use alloc::format;
    use alloc::vec;
    use proptest::prelude::*;

    pub fn arb_pac_sid() -> impl Strategy<Value = PacSid> {
        (
            arb_identifier_authority(),
            proptest::collection::vec(any::<u32>(), 0..=32),
        )
            .prop_map(|(identifier_authority, sub_authorities)| {
                PacSid::try_new(PacSid::REVISION, identifier_authority, sub_authorities).unwrap()
            })
    }

    fn arb_raw_sid() -> impl Strategy<Value = Vec<u8>> {
        (any::<u8>(), any::<[u8; 6]>(), proptest::collection::vec(any::<[u8; 4]>(), 0..=40))
            .prop_map(|(revision, authority, blocks)| {
                let mut raw = vec![revision, u8::try_from(blocks.len()).unwrap()];
                raw.extend_from_slice(&authority);
                raw.extend(blocks.iter().flatten());
                raw
            })
    }

    proptest! {
        #[test]
        fn raw_round_trip(raw in arb_raw_sid()) {
            let sid = PacSid::from_bytes(&raw).unwrap();
            prop_assert_eq!(sid.to_bytes(), raw.clone());
            prop_assert_eq!(sid.encoded_len(), raw.len());
        }

        #[test]
        fn wrong_count_byte_rejected(raw in arb_raw_sid(), count in any::<u8>()) {
            let mut raw = raw;
            prop_assume!(usize::from(count) != (raw.len() - SID_HEAD_SIZE) / SUB_AUTHORITY_SIZE);
            raw[COUNT_OFFSET] = count;
            prop_assert_eq!(
                PacSid::from_bytes(&raw).map_err(|e| e.code()),
                Err(ErrorCode::MalformedSize)
            );
        }

        #[test]
        fn ragged_tail_rejected(raw in arb_raw_sid(), extra in 1usize..4) {
            let mut raw = raw;
            raw.extend(core::iter::repeat_n(0u8, extra));
            prop_assert!(PacSid::from_bytes(&raw).is_err(), "tail of {} extra bytes accepted", extra);
        }

        #[test]
        fn sub_authorities_round_trip(blocks in proptest::collection::vec(any::<[u8; 4]>(), 0..=40)) {
            let bytes: Vec<u8> = blocks.iter().flatten().copied().collect();
            let sid = PacSid::from_sub_authorities(&bytes).unwrap();
            let reparsed = PacSid::from_bytes(&sid.to_bytes()).unwrap();
            prop_assert_eq!(&reparsed, &sid);
            prop_assert_eq!(reparsed.identifier_authority(), SidIdentifierAuthority::NT_AUTHORITY);
            let raw = reparsed.to_bytes();
            prop_assert_eq!(raw.get(SID_HEAD_SIZE..), Some(bytes.as_slice()));
        }

        #[test]
        fn append_concatenates(a in arb_pac_sid(), b in arb_pac_sid()) {
            let (a_before, b_before) = (a.clone(), b.clone());
            let joined = a.append(&b).unwrap();
            let expected: Vec<u32> = a.sub_authorities().iter().chain(b.sub_authorities()).copied().collect();
            prop_assert_eq!(joined.sub_authorities(), expected.as_slice());
            prop_assert_eq!(
                usize::from(joined.sub_authority_count()),
                usize::from(a.sub_authority_count()) + usize::from(b.sub_authority_count())
            );
            prop_assert_eq!(joined.identifier_authority(), a.identifier_authority());
            prop_assert_eq!(a, a_before);
            prop_assert_eq!(b, b_before);
        }

        #[test]
        fn canonical_string_round_trip(sid in arb_pac_sid()) {
            let display = sid.to_canonical_string().unwrap();
            prop_assert!(display.starts_with("S-1-"), "Display does not start with S-1-: {}", display);
            let dash_count = display.matches('-').count();
            prop_assert_eq!(dash_count, usize::from(sid.sub_authority_count()) + 2);
            prop_assert_eq!(display.parse::<PacSid>().unwrap(), sid);
        }

        #[test]
        fn blank_means_all_zero(sid in arb_pac_sid()) {
            prop_assert_eq!(sid.is_blank(), sid.to_bytes()[SID_HEAD_SIZE..].iter().all(|&b| b == 0));
            prop_assert_eq!(sid.is_empty(), sid.sub_authority_count() == 0);
        }

        #[test]
        fn clone_is_independent(sid in arb_pac_sid()) {
            let copy = sid.clone();
            prop_assert_eq!(&copy, &sid);
            prop_assert!(
                copy.sub_authorities().is_empty()
                    || !core::ptr::eq(copy.sub_authorities(), sid.sub_authorities()),
                "clone must not share sub-authority storage"
            );
        }
    }

    #[test]
    fn high_bytes_are_unsigned() {
        let sid = PacSid::from_bytes(&[1, 1, 0, 0, 0, 0, 0x80, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]).unwrap();
        assert_eq!(sid.identifier_authority().value(), 0x80FF);
        assert_eq!(sid.sub_authorities(), [u32::MAX]);
        assert_eq!(sid.to_canonical_string().unwrap(), "S-1-33023-4294967295");
    }

    #[test]
    fn empty_and_blank() {
        let head_only = PacSid::from_bytes(&[1, 0, 0, 0, 0, 0, 0, 5]).unwrap();
        assert!(head_only.is_empty());
        assert!(head_only.is_blank());
        assert_eq!(head_only.relative_identifier(), None);
        assert_eq!(head_only.to_canonical_string().unwrap(), "S-1-5");

        let zeros = PacSid::from_sub_authorities(&[0; 8]).unwrap();
        assert!(!zeros.is_empty());
        assert!(zeros.is_blank());

        let rid = PacSid::from_sub_authorities(&[0, 0, 0, 0, 1, 0, 0, 0]).unwrap();
        assert!(!rid.is_blank());
        assert_eq!(rid.relative_identifier(), Some(1));
    }

    #[test]
    fn misaligned_sub_authorities_rejected() {
        for len in [1usize, 2, 3, 5, 11] {
            assert_eq!(
                PacSid::from_sub_authorities(&vec![0; len]),
                Err(DecodingError::MalformedSubAuthoritySize { length: len })
            );
        }
    }

    #[test]
    fn too_many_sub_authorities_rejected() {
        let max = vec![0u8; usize::from(MAX_SUBAUTHORITY_COUNT) * SUB_AUTHORITY_SIZE];
        let sid = PacSid::from_sub_authorities(&max).unwrap();
        assert_eq!(sid.sub_authority_count(), MAX_SUBAUTHORITY_COUNT);

        let over = vec![0u8; max.len() + SUB_AUTHORITY_SIZE];
        assert_eq!(
            PacSid::from_sub_authorities(&over).map_err(|e| e.code()),
            Err(ErrorCode::MalformedSize)
        );
        assert!(
            PacSid::try_new(1, SidIdentifierAuthority::NT_AUTHORITY, vec![0u32; 256]).is_err(),
            "256 sub-authorities cannot be counted in one byte"
        );
    }

    #[test]
    fn append_overflow_rejected() {
        let big = PacSid::try_new(1, SidIdentifierAuthority::NT_AUTHORITY, vec![7u32; 200]).unwrap();
        let rest = PacSid::try_new(1, SidIdentifierAuthority::NT_AUTHORITY, vec![9u32; 55]).unwrap();
        assert_eq!(big.append(&rest).unwrap().sub_authority_count(), 255);

        let one_more = rest.append(&PacSid::from_sub_authorities(&[1, 0, 0, 0]).unwrap()).unwrap();
        assert_eq!(
            big.append(&one_more),
            Err(DecodingError::MalformedSize {
                length: SID_HEAD_SIZE + 256 * SUB_AUTHORITY_SIZE,
                declared: 256
            })
        );
    }

    #[test]
    fn display_keeps_stored_revision() {
        let sid = PacSid::from_bytes(&[3, 1, 0, 0, 0, 0, 0, 5, 21, 0, 0, 0]).unwrap();
        assert_eq!(sid.to_string(), "S-3-5-21");
        assert_eq!(
            sid.to_canonical_string(),
            Err(DecodingError::UnsupportedRevision { revision: 3 })
        );
    }

    #[test]
    fn debug_string_layout() {
        let sid = PacSid::from_bytes(&[1, 1, 0, 0, 0, 0, 0, 5, 0xF4, 1, 0, 0]).unwrap();
        assert_eq!(
            sid.to_debug_string(),
            "\\01\\01\\00\\00\\00\\00\\00\\05\\f4\\01\\00\\00"
        );
        assert_eq!(format!("{sid:?}"), format!("PacSid({})", sid.to_debug_string()));
    }

    #[test]
    fn rejects_bad_strings() {
        assert_eq!(
            "S-1-5-x".parse::<PacSid>().map_err(|e| e.code()),
            Err(ErrorCode::InvalidFormat)
        );
    }
}
