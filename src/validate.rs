//! Structural validation of packed buffers loaded from storage.

use crate::entry::{
    read_entry, read_u32, read_u64, string_region_len, MajorType, COUNT_SIZE, ENTRY_SIZE,
    SCALAR_KIND_FLOAT, SCALAR_KIND_SIMPLE, SCALAR_SIZE, STR_HEADER_SIZE, TAG_HEADER_SIZE,
    UINT_SIZE,
};
use crate::float::CANONICAL_NAN_BITS;
use crate::utf8;
use crate::{CborError, ErrorCode};

fn malformed(offset: usize) -> CborError {
    CborError::new(ErrorCode::MalformedDocument, offset)
}

/// Check that `buf` is exactly one well-formed packed document.
pub(crate) fn validate_packed(buf: &[u8], max_depth: usize) -> Result<(), CborError> {
    if buf.len() < ENTRY_SIZE {
        return Err(malformed(0));
    }
    let root = read_entry(buf, 0);
    if ENTRY_SIZE + root.end() != buf.len() {
        return Err(malformed(0));
    }
    Checker { buf, max_depth }.value(root.major(), ENTRY_SIZE, buf.len(), 0)
}

struct Checker<'a> {
    buf: &'a [u8],
    max_depth: usize,
}

impl Checker<'_> {
    fn enter(&self, depth: usize, start: usize) -> Result<usize, CborError> {
        let depth = depth + 1;
        if depth > self.max_depth {
            return Err(CborError::new(ErrorCode::DepthLimitExceeded, start));
        }
        Ok(depth)
    }

    /// Validate the value region `start..end` of a value of type `major`.
    fn value(&self, major: MajorType, start: usize, end: usize, depth: usize) -> Result<(), CborError> {
        let len = end - start;
        match major {
            MajorType::Unsigned | MajorType::Negative => {
                if len != UINT_SIZE {
                    return Err(malformed(start));
                }
                Ok(())
            }
            MajorType::Bytes | MajorType::Text => self.string(major, start, end),
            MajorType::Array | MajorType::Map => {
                let depth = self.enter(depth, start)?;
                self.container(major, start, end, depth)
            }
            MajorType::Tag => {
                let depth = self.enter(depth, start)?;
                if len < TAG_HEADER_SIZE {
                    return Err(malformed(start));
                }
                let child = read_entry(self.buf, start + UINT_SIZE);
                let values = start + TAG_HEADER_SIZE;
                if values + child.end() != end {
                    return Err(malformed(start));
                }
                self.value(child.major(), values, end, depth)
            }
            MajorType::FloatOrSimple => self.scalar(start, len),
        }
    }

    fn string(&self, major: MajorType, start: usize, end: usize) -> Result<(), CborError> {
        if end - start < STR_HEADER_SIZE {
            return Err(malformed(start));
        }
        let slen = read_u32(self.buf, start) as usize;
        if slen > end - start - STR_HEADER_SIZE || string_region_len(slen) != end - start {
            return Err(malformed(start));
        }
        let content_end = start + STR_HEADER_SIZE + slen;
        if self.buf[content_end..end].iter().any(|&b| b != 0) {
            return Err(malformed(content_end));
        }
        if major == MajorType::Text {
            let content = &self.buf[start + STR_HEADER_SIZE..content_end];
            if utf8::validate(content).is_none() {
                return Err(CborError::new(ErrorCode::Utf8Invalid, start + STR_HEADER_SIZE));
            }
        }
        Ok(())
    }

    fn container(&self, major: MajorType, start: usize, end: usize, depth: usize) -> Result<(), CborError> {
        if end - start < COUNT_SIZE {
            return Err(malformed(start));
        }
        let count = read_u32(self.buf, start) as usize;
        let items = if major == MajorType::Map {
            count.checked_mul(2).ok_or_else(|| malformed(start))?
        } else {
            count
        };
        let table = start + COUNT_SIZE;
        let values = items
            .checked_mul(ENTRY_SIZE)
            .and_then(|n| table.checked_add(n))
            .filter(|&v| v <= end)
            .ok_or_else(|| malformed(start))?;

        let mut prev = 0;
        for index in 0..items {
            let at = table + index * ENTRY_SIZE;
            let entry = read_entry(self.buf, at);
            if entry.end() < prev || values + entry.end() > end {
                return Err(malformed(at));
            }
            self.value(entry.major(), values + prev, values + entry.end(), depth)?;
            prev = entry.end();
        }
        if values + prev != end {
            return Err(malformed(start));
        }
        Ok(())
    }

    fn scalar(&self, start: usize, len: usize) -> Result<(), CborError> {
        if len != SCALAR_SIZE {
            return Err(malformed(start));
        }
        let slot = &self.buf[start..start + SCALAR_SIZE];
        let ok = match slot[0] {
            SCALAR_KIND_FLOAT => {
                let bits = read_u64(slot, 8);
                slot[1..8].iter().all(|&b| b == 0)
                    && (!f64::from_bits(bits).is_nan() || bits == CANONICAL_NAN_BITS)
            }
            SCALAR_KIND_SIMPLE => slot[2..].iter().all(|&b| b == 0),
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(malformed(start))
        }
    }
}
