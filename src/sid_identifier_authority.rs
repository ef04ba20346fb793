use core::fmt::{self, Display};

use parsing::{MAX_IDENTIFIER_AUTHORITY, authority_to_bytes};

/// The 6-byte identifier authority of a SID, stored big-endian.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SidIdentifierAuthority {
    /// Raw big-endian bytes.
    pub value: [u8; 6],
}

impl SidIdentifierAuthority {
    /// `SECURITY_NULL_SID_AUTHORITY` (0).
    pub const NULL_AUTHORITY: Self = Self::new([0, 0, 0, 0, 0, 0]);
    /// `SECURITY_WORLD_SID_AUTHORITY` (1).
    pub const WORLD_AUTHORITY: Self = Self::new([0, 0, 0, 0, 0, 1]);
    /// `SECURITY_LOCAL_SID_AUTHORITY` (2).
    pub const LOCAL_AUTHORITY: Self = Self::new([0, 0, 0, 0, 0, 2]);
    /// `SECURITY_CREATOR_SID_AUTHORITY` (3).
    pub const CREATOR_AUTHORITY: Self = Self::new([0, 0, 0, 0, 0, 3]);
    /// `SECURITY_NT_AUTHORITY` (5), the authority implied for PAC sub-authority lists.
    pub const NT_AUTHORITY: Self = Self::new([0, 0, 0, 0, 0, 5]);

    /// Wraps raw big-endian bytes.
    #[inline]
    #[must_use]
    pub const fn new(value: [u8; 6]) -> Self {
        Self { value }
    }

    /// Builds an authority from its numeric value.
    ///
    /// Returns `None` when `value` does not fit in 48 bits.
    ///
    /// # Examples
    /// ```rust
    /// # use pac_security_identifier::SidIdentifierAuthority;
    /// assert_eq!(
    ///     SidIdentifierAuthority::from_value(5),
    ///     Some(SidIdentifierAuthority::NT_AUTHORITY)
    /// );
    /// assert_eq!(SidIdentifierAuthority::from_value(1 << 48), None);
    /// ```
    #[inline]
    #[must_use]
    pub const fn from_value(value: u64) -> Option<Self> {
        match authority_to_bytes(value) {
            Some(bytes) => Some(Self::new(bytes)),
            None => None,
        }
    }

    /// The authority as a big-endian unsigned integer.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> u64 {
        let [b0, b1, b2, b3, b4, b5] = self.value;
        u64::from_be_bytes([0, 0, b0, b1, b2, b3, b4, b5])
    }
}

/// Decimal below 2^32, `0x`-prefixed uppercase hex from 2^32 upward.
impl Display for SidIdentifierAuthority {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value();
        if value <= u64::from(u32::MAX) {
            write!(f, "{value}")
        } else {
            debug_assert!(value <= MAX_IDENTIFIER_AUTHORITY, "authority exceeds 48 bits");
            write!(f, "0x{value:X}")
        }
    }
}

impl From<[u8; 6]> for SidIdentifierAuthority {
    #[inline]
    fn from(value: [u8; 6]) -> Self {
        Self { value }
    }
}

impl From<SidIdentifierAuthority> for [u8; 6] {
    #[inline]
    fn from(value: SidIdentifierAuthority) -> Self {
        value.value
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
pub(crate) mod test {
    use super::*;
    use alloc::string::ToString;
    use proptest::prelude::*;

    prop_compose! {
        pub fn arb_identifier_authority()
            (value in any::<[u8; 6]>())
            -> SidIdentifierAuthority {
            SidIdentifierAuthority::from(value)
        }
    }

    #[test]
    fn display_switches_to_hex_at_u32_boundary() {
        let below = SidIdentifierAuthority::from_value(0xFFFF_FFFF).unwrap();
        let at = SidIdentifierAuthority::from_value(0x1_0000_0000).unwrap();
        assert_eq!(below.to_string(), "4294967295");
        assert_eq!(at.to_string(), "0x100000000");
    }

    #[test]
    fn display_all_ones_is_upper_hex() {
        let all = SidIdentifierAuthority::new([0xFF; 6]);
        assert_eq!(all.value(), (1 << 48) - 1);
        assert_eq!(all.to_string(), "0xFFFFFFFFFFFF");
    }

    #[test]
    fn well_known_values() {
        assert_eq!(SidIdentifierAuthority::NULL_AUTHORITY.value(), 0);
        assert_eq!(SidIdentifierAuthority::NT_AUTHORITY.value(), 5);
        assert_eq!(SidIdentifierAuthority::default(), SidIdentifierAuthority::NULL_AUTHORITY);
    }

    proptest! {
        #[test]
        fn value_round_trip(authority in arb_identifier_authority()) {
            prop_assert_eq!(SidIdentifierAuthority::from_value(authority.value()), Some(authority));
        }
    }
}
