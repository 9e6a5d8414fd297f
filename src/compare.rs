use core::cmp::Ordering;

use crate::document::Document;
use crate::entry::MajorType;
use crate::value::ValueRef;

/// Total order over packed values.
///
/// Major type decides first (unsigned < negative < bytes < text < array < map < tag <
/// float/simple). Within a type:
/// - integers compare numerically;
/// - strings compare by byte length, and by content only when lengths are equal, so `"z"` sorts
///   before `"aa"`;
/// - arrays and maps compare by item count, then item by item; maps compare their stored
///   key/value sequence, so the same pairs in a different order are not equal;
/// - tags compare by tag number, then by the wrapped value;
/// - simple values sort before floats (see [`Scalar::total_cmp`](crate::Scalar::total_cmp)).
///
/// Both values are walked in lock-step without allocating.
#[must_use]
pub fn compare_values(a: ValueRef<'_>, b: ValueRef<'_>) -> Ordering {
    a.major().cmp(&b.major()).then_with(|| match a.major() {
        MajorType::Unsigned => a.raw_int().cmp(&b.raw_int()),
        // -(v + 1): a larger raw argument is a smaller number.
        MajorType::Negative => b.raw_int().cmp(&a.raw_int()),
        MajorType::Bytes | MajorType::Text => {
            let (x, y) = (a.string_bytes(), b.string_bytes());
            x.len().cmp(&y.len()).then_with(|| x.cmp(y))
        }
        MajorType::Array | MajorType::Map => {
            let (x, y) = (a.items(), b.items());
            x.len().cmp(&y.len()).then_with(|| {
                x.iter()
                    .zip(y.iter())
                    .map(|(l, r)| compare_values(l, r))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
        }
        MajorType::Tag => {
            let (x, y) = (a.tag_ref(), b.tag_ref());
            x.tag()
                .cmp(&y.tag())
                .then_with(|| compare_values(x.value(), y.value()))
        }
        MajorType::FloatOrSimple => a.scalar().total_cmp(b.scalar()),
    })
}

/// Compare two documents; see [`compare_values`].
#[must_use]
pub fn compare(a: &Document, b: &Document) -> Ordering {
    compare_values(a.root(), b.root())
}

impl PartialOrd for ValueRef<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ValueRef<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_values(*self, *other)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        compare(self, other) == Ordering::Equal
    }
}

impl Eq for Document {}

impl PartialOrd for Document {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(compare(self, other))
    }
}

impl Ord for Document {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}
