//! Packed layout primitives.
//!
//! A packed document is a flat byte buffer. Every value is located by an [`Entry`]: a 32-bit word
//! holding the value's major type in the top 3 bits and the cumulative end offset of its value
//! region in the low 29 bits. Offsets are relative to the start of the enclosing container's value
//! area, so entry `i` starts where entry `i - 1` ends (or at `0` for the first entry).
//!
//! ```text
//! document   = Entry(root) value
//! uint/nint  = u64
//! bytes/text = u32 len, bytes, zero padding to 4
//! array      = u32 count, Entry * count, values
//! map        = u32 pairs, Entry * (2 * pairs), values      (key, value interleaved)
//! tag        = u64 tag, Entry, value
//! float/simp = u8 kind, u8 simple, [0; 6], u64 bits        (kind 0 = float, 1 = simple)
//! ```
//!
//! All integers are little-endian. Reads never rely on alignment.

use core::fmt;

use crate::{CborError, ErrorCode};

/// Largest end offset an [`Entry`] can carry.
pub const MAX_VALUE_BYTES: usize = 0x1FFF_FFFF;

pub(crate) const ENTRY_SIZE: usize = 4;
pub(crate) const COUNT_SIZE: usize = 4;
pub(crate) const UINT_SIZE: usize = 8;
pub(crate) const STR_HEADER_SIZE: usize = 4;
pub(crate) const STR_ALIGN: usize = 4;
pub(crate) const TAG_HEADER_SIZE: usize = 8 + ENTRY_SIZE;
pub(crate) const SCALAR_SIZE: usize = 16;

pub(crate) const SCALAR_KIND_FLOAT: u8 = 0;
pub(crate) const SCALAR_KIND_SIMPLE: u8 = 1;

const POS_MASK: u32 = 0x1FFF_FFFF;
const TYPE_SHIFT: u32 = 29;

/// One of CBOR's eight major types, in comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum MajorType {
    /// Major type 0.
    Unsigned = 0,
    /// Major type 1 (value `v` represents `-(v + 1)`).
    Negative = 1,
    /// Major type 2.
    Bytes = 2,
    /// Major type 3.
    Text = 3,
    /// Major type 4.
    Array = 4,
    /// Major type 5.
    Map = 5,
    /// Major type 6.
    Tag = 6,
    /// Major type 7: floats and simple values.
    FloatOrSimple = 7,
}

impl MajorType {
    /// Major type from the high 3 bits of an initial byte (or any value `0..=7`).
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::Unsigned,
            1 => Self::Negative,
            2 => Self::Bytes,
            3 => Self::Text,
            4 => Self::Array,
            5 => Self::Map,
            6 => Self::Tag,
            _ => Self::FloatOrSimple,
        }
    }

    /// The major type ordinal `0..=7`.
    #[inline]
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Human-readable name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unsigned => "unsigned integer",
            Self::Negative => "negative integer",
            Self::Bytes => "byte string",
            Self::Text => "text string",
            Self::Array => "array",
            Self::Map => "map",
            Self::Tag => "tag",
            Self::FloatOrSimple => "float or simple value",
        }
    }

    /// Returns `true` for arrays and maps.
    #[inline]
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Array | Self::Map)
    }
}

impl fmt::Display for MajorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A packed `(major type, end offset)` word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry(u32);

impl Entry {
    /// Build an entry; fails with `DocumentTooLarge` if `end` does not fit in 29 bits.
    #[inline]
    pub fn new(major: MajorType, end: usize, offset: usize) -> Result<Self, CborError> {
        if end > MAX_VALUE_BYTES {
            return Err(CborError::new(ErrorCode::DocumentTooLarge, offset));
        }
        #[allow(clippy::cast_possible_truncation)]
        let end = end as u32;
        Ok(Self((u32::from(major.ordinal()) << TYPE_SHIFT) | end))
    }

    /// Reconstruct from the stored word.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The stored word.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// The major type.
    #[inline]
    #[must_use]
    pub const fn major(self) -> MajorType {
        #[allow(clippy::cast_possible_truncation)]
        let bits = (self.0 >> TYPE_SHIFT) as u8;
        MajorType::from_bits(bits)
    }

    /// Cumulative end offset relative to the container's value area.
    #[inline]
    #[must_use]
    pub const fn end(self) -> usize {
        (self.0 & POS_MASK) as usize
    }
}

#[inline]
pub(crate) const fn align_up(n: usize, align: usize) -> usize {
    (n + align - 1) & !(align - 1)
}

/// Size of the packed region for a string of `len` bytes.
#[inline]
pub(crate) const fn string_region_len(len: usize) -> usize {
    align_up(STR_HEADER_SIZE + len, STR_ALIGN)
}

#[inline]
pub(crate) fn read_u32(buf: &[u8], at: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[at..at + 4]);
    u32::from_le_bytes(b)
}

#[inline]
pub(crate) fn read_u64(buf: &[u8], at: usize) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&buf[at..at + 8]);
    u64::from_le_bytes(b)
}

#[inline]
pub(crate) fn read_entry(buf: &[u8], at: usize) -> Entry {
    Entry::from_bits(read_u32(buf, at))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn end_offsets_fit_in_29_bits() {
        let err = Entry::new(MajorType::Text, MAX_VALUE_BYTES + 1, 42).unwrap_err();
        assert_eq!(err.code, ErrorCode::DocumentTooLarge);
        assert_eq!(err.offset, 42);

        for major in (0..8).map(MajorType::from_bits) {
            let entry = Entry::new(major, MAX_VALUE_BYTES, 0).unwrap();
            assert_eq!(entry.major(), major);
            assert_eq!(entry.end(), MAX_VALUE_BYTES);
            assert_eq!(Entry::from_bits(entry.bits()), entry);
        }
    }
}
