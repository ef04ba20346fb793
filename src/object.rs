//! Narrowing of decoded objects of unknown shape to an expected type.
//!
//! Decoders upstream of the SID codec (ASN.1 readers, PAC buffer tables)
//! produce values whose concrete type is only known at runtime. These helpers
//! turn "this must be a `T`" into a checked downcast reporting
//! [`DecodingError::ObjectCast`] instead of panicking.

use alloc::boxed::Box;
use core::any::{Any, type_name};

use crate::DecodingError;

fn cast_error<T>() -> DecodingError {
    let expected = type_name::<T>();
    log::debug!("object is not a {expected}");
    DecodingError::ObjectCast { expected }
}

/// Borrows `object` as a `T`.
///
/// # Errors
/// [`DecodingError::ObjectCast`] when `object` is not a `T`.
///
/// # Examples
/// ```rust
/// # use pac_security_identifier::{PacSid, ErrorCode, object};
/// # use core::any::Any;
/// let sid = PacSid::from_sub_authorities(&[21, 0, 0, 0]).unwrap();
/// let decoded: &dyn Any = &sid;
/// assert_eq!(object::check::<PacSid>(decoded).unwrap(), &sid);
/// assert_eq!(
///     object::check::<u32>(decoded).unwrap_err().code(),
///     ErrorCode::ObjectCast
/// );
/// ```
#[inline]
pub fn check<T: Any>(object: &dyn Any) -> Result<&T, DecodingError> {
    object.downcast_ref::<T>().ok_or_else(cast_error::<T>)
}

/// Takes ownership of `object` as a `T`.
///
/// # Errors
/// [`DecodingError::ObjectCast`] when `object` is not a `T`; the object is
/// dropped.
#[inline]
pub fn check_boxed<T: Any>(object: Box<dyn Any>) -> Result<Box<T>, DecodingError> {
    object.downcast::<T>().map_err(|_| cast_error::<T>())
}
