//! Packed document to minimal wire bytes.
//!
//! Integers and lengths always use the narrowest argument width, floats the narrowest exact
//! IEEE width, and containers are always definite-length.

use alloc::vec::Vec;

use crate::buffer::BufferBuilder;
use crate::entry::MajorType;
use crate::float::{encode_double_minimal, MinimalFloat};
use crate::scalar::Scalar;
use crate::value::ValueRef;
use crate::{CborError, ErrorCode};

/// Wire output; reuses the packed buffer's fallible growth.
struct WireWriter {
    out: BufferBuilder,
}

impl WireWriter {
    /// Initial byte plus argument in the narrowest form.
    fn head(&mut self, major: MajorType, arg: u64) -> Result<(), CborError> {
        let ib = major.ordinal() << 5;
        if let Ok(v) = u8::try_from(arg) {
            if v < 24 {
                return self.out.append(&[ib | v]);
            }
            return self.out.append(&[ib | 24, v]);
        }
        if let Ok(v) = u16::try_from(arg) {
            self.out.append(&[ib | 25])?;
            return self.out.append(&v.to_be_bytes());
        }
        if let Ok(v) = u32::try_from(arg) {
            self.out.append(&[ib | 26])?;
            return self.out.append(&v.to_be_bytes());
        }
        self.out.append(&[ib | 27])?;
        self.out.append(&arg.to_be_bytes())
    }

    fn head_len(&mut self, major: MajorType, len: usize) -> Result<(), CborError> {
        let len = u64::try_from(len)
            .map_err(|_| CborError::new(ErrorCode::LengthOverflow, self.out.len()))?;
        self.head(major, len)
    }

    fn float(&mut self, value: f64) -> Result<(), CborError> {
        match encode_double_minimal(value) {
            MinimalFloat::Half(bits) => {
                self.out.append(&[0xf9])?;
                self.out.append(&bits.to_be_bytes())
            }
            MinimalFloat::Single(bits) => {
                self.out.append(&[0xfa])?;
                self.out.append(&bits.to_be_bytes())
            }
            MinimalFloat::Double(bits) => {
                self.out.append(&[0xfb])?;
                self.out.append(&bits.to_be_bytes())
            }
        }
    }

    fn value(&mut self, v: ValueRef<'_>) -> Result<(), CborError> {
        let major = v.major();
        match major {
            MajorType::Unsigned | MajorType::Negative => self.head(major, v.raw_int()),
            MajorType::Bytes | MajorType::Text => {
                let bytes = v.string_bytes();
                self.head_len(major, bytes.len())?;
                self.out.append(bytes)
            }
            MajorType::Array | MajorType::Map => {
                let items = v.items();
                let count = if major == MajorType::Map {
                    items.len() / 2
                } else {
                    items.len()
                };
                self.head_len(major, count)?;
                items.iter().try_for_each(|item| self.value(item))
            }
            MajorType::Tag => {
                let tag = v.tag_ref();
                self.head(major, tag.tag())?;
                self.value(tag.value())
            }
            MajorType::FloatOrSimple => match v.scalar() {
                Scalar::Float(f) => self.float(f),
                // Codes 24..=31 come out as `0xf8 nn`, the only form they can take.
                Scalar::Simple(code) => self.head(major, u64::from(code)),
            },
        }
    }
}

/// Encode the value at `v` as minimal definite-length CBOR.
pub(crate) fn encode(v: ValueRef<'_>, size_hint: usize) -> Result<Vec<u8>, CborError> {
    let mut w = WireWriter {
        out: BufferBuilder::with_capacity(size_hint),
    };
    w.value(v)?;
    Ok(w.out.into_vec())
}
