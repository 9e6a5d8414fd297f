//! Order-compatible 32-bit hashing.
//!
//! Values that [`compare_values`](crate::compare_values) reports equal hash equal: the hash reads
//! exactly the fields the comparator reads, with `-0.0` folded into `0.0`. Leaf payloads go
//! through xxHash32 seeded with the running node hash.

use core::hash::{Hash, Hasher};

use xxhash_rust::xxh32::xxh32;

use crate::document::Document;
use crate::entry::MajorType;
use crate::value::ValueRef;

fn hash_value(seed: u32, v: ValueRef<'_>) -> u32 {
    let h = seed.rotate_left(1) ^ u32::from(v.major().ordinal());
    match v.major() {
        MajorType::Unsigned | MajorType::Negative => xxh32(&v.raw_int().to_le_bytes(), h),
        MajorType::Bytes | MajorType::Text => xxh32(v.string_slot(), h),
        MajorType::Array | MajorType::Map => v.items().iter().fold(h, hash_value),
        MajorType::Tag => {
            let tag = v.tag_ref();
            hash_value(xxh32(&tag.tag().to_le_bytes(), h), tag.value())
        }
        MajorType::FloatOrSimple => xxh32(&v.scalar().hash_image().to_le_bytes(), h),
    }
}

/// 32-bit hash of a value, starting from seed `0`.
#[must_use]
pub fn hash_value_ref(v: ValueRef<'_>) -> u32 {
    hash_value(0, v)
}

/// 32-bit hash of a document; equal documents hash equal.
#[must_use]
pub fn hash(doc: &Document) -> u32 {
    hash_value_ref(doc.root())
}

impl Hash for ValueRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(hash_value_ref(*self));
    }
}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(hash(self));
    }
}
