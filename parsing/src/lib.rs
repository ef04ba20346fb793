//! Text-level parsing of the canonical `S-R-I-S...` SID form.
//!
//! This crate only splits and validates the textual components; building the
//! binary SID is the job of `pac-security-identifier`.
#![cfg_attr(not(feature = "std"), no_std)]

use core::fmt::{self, Display};
use core::str::FromStr;

use arrayvec::ArrayVec;
use thiserror::Error;

/// Smallest number of sub-authorities a PAC SID may carry.
pub const MIN_SUBAUTHORITY_COUNT: u8 = 0;
/// Largest number of sub-authorities representable by the 1-byte count field.
pub const MAX_SUBAUTHORITY_COUNT: u8 = u8::MAX;

/// Largest value an identifier authority can hold (48 bits).
pub const MAX_IDENTIFIER_AUTHORITY: u64 = 0xFFFF_FFFF_FFFF;

/// Components of a SID string, validated but not yet assembled.
pub struct SidComponents {
    /// The SID revision value, generally 1.
    pub revision: u8,
    /// The SID identifier authority value (big-endian).
    pub identifier_authority: [u8; 6],
    /// The SID sub-authority values.
    pub sub_authority: ArrayVec<u32, { MAX_SUBAUTHORITY_COUNT as usize }>,
}

/// Error type returned when parsing a SID string fails due to an invalid format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub struct InvalidSidFormat;

impl Display for InvalidSidFormat {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid format for Sid")
    }
}

/// Splits a 48-bit value into its 6 big-endian bytes.
///
/// Returns `None` if `value` does not fit in 48 bits.
#[inline]
#[must_use]
pub const fn authority_to_bytes(value: u64) -> Option<[u8; 6]> {
    if value > MAX_IDENTIFIER_AUTHORITY {
        return None;
    }
    let [_, _, b0, b1, b2, b3, b4, b5] = value.to_be_bytes();
    Some([b0, b1, b2, b3, b4, b5])
}

// `u64::from_str` tolerates a leading `+`, the canonical grammar does not.
fn parse_decimal<T: FromStr>(s: &str) -> Result<T, InvalidSidFormat> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidSidFormat);
    }
    s.parse::<T>().map_err(|_| InvalidSidFormat)
}

fn parse_authority(s: &str) -> Result<[u8; 6], InvalidSidFormat> {
    let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => {
            if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(InvalidSidFormat);
            }
            u64::from_str_radix(hex, 16).map_err(|_| InvalidSidFormat)?
        }
        None => parse_decimal::<u64>(s)?,
    };
    authority_to_bytes(value).ok_or(InvalidSidFormat)
}

impl FromStr for SidComponents {
    type Err = InvalidSidFormat;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut s_cmp = s.split('-');
        if !s_cmp
            .next()
            .is_some_and(|head| head.eq_ignore_ascii_case("s"))
        {
            return Err(InvalidSidFormat);
        }
        let revision = parse_decimal::<u8>(s_cmp.next().ok_or(InvalidSidFormat)?)?;
        let identifier_authority = parse_authority(s_cmp.next().ok_or(InvalidSidFormat)?)?;

        let mut sub_authority = ArrayVec::new();
        for item in s_cmp {
            let item = parse_decimal::<u32>(item)?;
            sub_authority.try_push(item).map_err(|_| InvalidSidFormat)?;
        }

        Ok(Self {
            revision,
            identifier_authority,
            sub_authority,
        })
    }
}
