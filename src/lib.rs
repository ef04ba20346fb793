//! # Windows Security Identifier (SID) codec for Kerberos PAC data
//!
//! Kerberos Privilege Attribute Certificates carry user, group and domain
//! SIDs in their raw binary form. This crate decodes and encodes that form:
//! - [`PacSid`]: an owned, immutable SID parsed from a raw buffer, built from
//!   a bare sub-authority list, or assembled by appending a relative
//!   identifier to a domain SID.
//! - [`SidIdentifierAuthority`]: the 6-byte big-endian authority component.
//! - [`DecodingError`] and [`ErrorCode`]: every rejection with a stable code.
//! - [`object`]: checked narrowing of decoded values of unknown type.
//!
//! ## Layout
//! `[revision:1][count:1][authority:6 BE][sub-authority:4 LE]*`, with the
//! total length always `8 + 4 * count`.
//!
//! ## Examples
//! ### Decode and render a SID
//! ```rust
//! use pac_security_identifier::PacSid;
//!
//! let sid = PacSid::from_bytes(&[1, 1, 0, 0, 0, 0, 0, 5, 21, 0, 0, 0]).unwrap();
//! assert_eq!(sid.to_canonical_string().unwrap(), "S-1-5-21");
//! assert_eq!(sid.to_bytes(), [1, 1, 0, 0, 0, 0, 0, 5, 21, 0, 0, 0]);
//! ```
//!
//! ### Build an account SID from a domain SID and a RID
//! ```rust
//! use pac_security_identifier::PacSid;
//!
//! let domain = PacSid::from_sub_authorities(&[21, 0, 0, 0]).unwrap();
//! let rid = PacSid::from_sub_authorities(&500u32.to_le_bytes()).unwrap();
//! let account = domain.append(&rid).unwrap();
//! assert_eq!(account.to_string(), "S-1-5-21-500");
//! assert_eq!(account.relative_identifier(), Some(500));
//! ```
//!
//! ## Features
//! - `std` (default): `std::error::Error` integration.
//! - `serde`: string form for human-readable formats, raw bytes otherwise.
//!
//! Without `std` the crate is `no_std` and needs `alloc`.

#![warn(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;
pub mod object;
#[cfg(feature = "serde")]
mod serde_impl;
mod sid;
mod sid_identifier_authority;
mod sid_size_info;

pub use error::{DecodingError, ErrorCode};
pub use parsing::InvalidSidFormat;
pub use sid::{MAX_SUBAUTHORITY_COUNT, MIN_SUBAUTHORITY_COUNT, PacSid};
pub(crate) use sid_size_info::SidSizeInfo;

/// Identifier authority component of a SID (6-byte value).
///
/// See also: [`PacSid::identifier_authority`].
pub use sid_identifier_authority::SidIdentifierAuthority;

#[cfg(test)]
pub(crate) use sid_identifier_authority::test::arb_identifier_authority;

/// Internal utilities for validation and hex rendering.
pub(crate) mod utils;
pub use utils::format_bytes;
