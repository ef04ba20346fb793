use crate::sid::{MAX_SUBAUTHORITY_COUNT, SID_HEAD_SIZE, SUB_AUTHORITY_SIZE};

/// Byte-size arithmetic of a serialized SID: `8 + 4 * count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct SidSizeInfo {
    sub_authority_count: u8,
}

impl SidSizeInfo {
    pub const fn from_count(sub_authority_count: u8) -> Self {
        Self {
            sub_authority_count,
        }
    }

    /// Sub-authority count for a sum of counts, or `None` past the 1-byte field.
    pub const fn from_counts(lhs: u8, rhs: u8) -> Option<Self> {
        match lhs.checked_add(rhs) {
            Some(count) => Some(Self::from_count(count)),
            None => None,
        }
    }

    /// Try to reconstruct a [`SidSizeInfo`] from the full size in bytes
    /// of a SID structure (head + sub-authorities).
    ///
    /// Returns `None` if the size is invalid.
    pub const fn from_full_size(size: usize) -> Option<Self> {
        let Some(remaining) = size.checked_sub(SID_HEAD_SIZE) else {
            return None;
        };
        Self::from_sub_authorities_size(remaining)
    }

    /// Same as [`Self::from_full_size`] for a bare sub-authority buffer.
    pub const fn from_sub_authorities_size(size: usize) -> Option<Self> {
        if size % SUB_AUTHORITY_SIZE != 0 {
            return None;
        }
        #[expect(
            clippy::integer_division,
            reason = "Remainder was checked to be zero"
        )]
        let count = size / SUB_AUTHORITY_SIZE;
        if count > MAX_SUBAUTHORITY_COUNT as usize {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Bounded by MAX_SUBAUTHORITY_COUNT"
        )]
        let count = count as u8;
        Some(Self::from_count(count))
    }

    #[inline(always)]
    pub const fn get_sub_authority_count(self) -> u8 {
        self.sub_authority_count
    }

    pub const fn sub_authorities_size(self) -> usize {
        self.sub_authority_count as usize * SUB_AUTHORITY_SIZE
    }

    pub const fn full_size(self) -> usize {
        SID_HEAD_SIZE + self.sub_authorities_size()
    }
}
