//! Borrowed, zero-copy views into a packed document.
//!
//! A [`ValueRef`] is an `(buffer, major type, start, end)` quadruple locating one value region.
//! Container children are reached through the entry table without touching their siblings'
//! value bytes.

use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;

use crate::entry::{
    read_entry, read_u32, read_u64, MajorType, COUNT_SIZE, ENTRY_SIZE, SCALAR_KIND_SIMPLE,
    STR_HEADER_SIZE, TAG_HEADER_SIZE,
};
use crate::scalar::Scalar;
use crate::utf8;

/// A borrowed view of one value inside a packed document.
#[derive(Clone, Copy)]
pub struct ValueRef<'a> {
    buf: &'a [u8],
    major: MajorType,
    start: usize,
    end: usize,
}

impl<'a> ValueRef<'a> {
    #[inline]
    pub(crate) const fn new(buf: &'a [u8], major: MajorType, start: usize, end: usize) -> Self {
        Self {
            buf,
            major,
            start,
            end,
        }
    }

    /// The value described by the root entry of a packed buffer.
    #[inline]
    pub(crate) fn root(buf: &'a [u8]) -> Self {
        let entry = read_entry(buf, 0);
        Self::new(buf, entry.major(), ENTRY_SIZE, ENTRY_SIZE + entry.end())
    }

    /// The major type of this value.
    #[inline]
    #[must_use]
    pub const fn major(self) -> MajorType {
        self.major
    }

    /// The packed value region (without the entry that locates it).
    #[inline]
    pub(crate) fn region(self) -> &'a [u8] {
        &self.buf[self.start..self.end]
    }

    /// Raw integer argument for unsigned and negative integers.
    #[inline]
    pub(crate) fn raw_int(self) -> u64 {
        read_u64(self.buf, self.start)
    }

    /// Length prefix plus content of a byte or text string.
    #[inline]
    pub(crate) fn string_slot(self) -> &'a [u8] {
        let len = read_u32(self.buf, self.start) as usize;
        &self.buf[self.start..self.start + STR_HEADER_SIZE + len]
    }

    /// Content of a byte or text string.
    #[inline]
    pub(crate) fn string_bytes(self) -> &'a [u8] {
        &self.string_slot()[STR_HEADER_SIZE..]
    }

    #[inline]
    pub(crate) fn items(self) -> Items<'a> {
        let count = read_u32(self.buf, self.start) as usize;
        let count = if self.major == MajorType::Map {
            count * 2
        } else {
            count
        };
        let table = self.start + COUNT_SIZE;
        Items {
            buf: self.buf,
            count,
            table,
            values: table + count * ENTRY_SIZE,
        }
    }

    #[inline]
    pub(crate) const fn tag_ref(self) -> TagRef<'a> {
        TagRef {
            buf: self.buf,
            start: self.start,
        }
    }

    #[inline]
    pub(crate) fn scalar(self) -> Scalar {
        if self.buf[self.start] == SCALAR_KIND_SIMPLE {
            Scalar::Simple(self.buf[self.start + 1])
        } else {
            Scalar::Float(f64::from_bits(read_u64(self.buf, self.start + 8)))
        }
    }

    /// The value of an unsigned integer.
    #[must_use]
    pub fn as_u64(self) -> Option<u64> {
        (self.major == MajorType::Unsigned).then(|| self.raw_int())
    }

    /// The numeric value of an unsigned or negative integer.
    #[must_use]
    pub fn as_i128(self) -> Option<i128> {
        match self.major {
            MajorType::Unsigned => Some(i128::from(self.raw_int())),
            MajorType::Negative => Some(-1 - i128::from(self.raw_int())),
            _ => None,
        }
    }

    /// The content of a byte string.
    #[must_use]
    pub fn as_bytes(self) -> Option<&'a [u8]> {
        (self.major == MajorType::Bytes).then(|| self.string_bytes())
    }

    /// The content of a text string.
    #[must_use]
    pub fn as_text(self) -> Option<&'a str> {
        if self.major != MajorType::Text {
            return None;
        }
        utf8::trusted(self.string_bytes())
    }

    /// This value as an array view.
    #[must_use]
    pub fn as_array(self) -> Option<ArrayRef<'a>> {
        (self.major == MajorType::Array).then(|| ArrayRef {
            items: self.items(),
        })
    }

    /// This value as a map view.
    #[must_use]
    pub fn as_map(self) -> Option<MapRef<'a>> {
        (self.major == MajorType::Map).then(|| MapRef {
            items: self.items(),
        })
    }

    /// This value as a tag view.
    #[must_use]
    pub fn as_tag(self) -> Option<TagRef<'a>> {
        (self.major == MajorType::Tag).then(|| self.tag_ref())
    }

    /// The float or simple payload of a major type 7 value.
    #[must_use]
    pub fn as_scalar(self) -> Option<Scalar> {
        (self.major == MajorType::FloatOrSimple).then(|| self.scalar())
    }

    /// `Some(b)` for the simple values `true` and `false`.
    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        self.as_scalar().and_then(Scalar::as_bool)
    }

    /// The value of a float.
    #[must_use]
    pub fn as_f64(self) -> Option<f64> {
        self.as_scalar().and_then(Scalar::as_f64)
    }

    /// Returns `true` for the simple value `null`.
    #[must_use]
    pub fn is_null(self) -> bool {
        self.as_scalar().is_some_and(Scalar::is_null)
    }
}

impl PartialEq for ValueRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        crate::compare::compare_values(*self, *other) == Ordering::Equal
    }
}

impl Eq for ValueRef<'_> {}

impl fmt::Debug for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::render::write_value(f, *self)
    }
}

impl fmt::Display for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::render::write_value(f, *self)
    }
}

/// The flat item sequence of an array or map (`2 * pairs` items for maps).
#[derive(Clone, Copy)]
pub(crate) struct Items<'a> {
    buf: &'a [u8],
    count: usize,
    table: usize,
    values: usize,
}

impl<'a> Items<'a> {
    #[inline]
    pub(crate) const fn len(self) -> usize {
        self.count
    }

    #[inline]
    fn end_of(self, index: usize) -> usize {
        if index == 0 {
            0
        } else {
            read_entry(self.buf, self.table + (index - 1) * ENTRY_SIZE).end()
        }
    }

    /// Item `index`; callers check `index < len()`.
    #[inline]
    pub(crate) fn get(self, index: usize) -> ValueRef<'a> {
        let start = self.end_of(index);
        let entry = read_entry(self.buf, self.table + index * ENTRY_SIZE);
        ValueRef::new(
            self.buf,
            entry.major(),
            self.values + start,
            self.values + entry.end(),
        )
    }

    #[inline]
    pub(crate) const fn iter(self) -> ItemIter<'a> {
        ItemIter {
            items: self,
            next: 0,
            prev_end: 0,
        }
    }
}

/// Iterator over the items of an array, or the flat key/value items of a map.
#[derive(Clone)]
pub struct ItemIter<'a> {
    items: Items<'a>,
    next: usize,
    prev_end: usize,
}

impl<'a> Iterator for ItemIter<'a> {
    type Item = ValueRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.items.count {
            return None;
        }
        let entry = read_entry(self.items.buf, self.items.table + self.next * ENTRY_SIZE);
        let v = ValueRef::new(
            self.items.buf,
            entry.major(),
            self.items.values + self.prev_end,
            self.items.values + entry.end(),
        );
        self.prev_end = entry.end();
        self.next += 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.items.count - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for ItemIter<'_> {}
impl FusedIterator for ItemIter<'_> {}

/// A borrowed array view.
#[derive(Clone, Copy)]
pub struct ArrayRef<'a> {
    items: Items<'a>,
}

impl<'a> ArrayRef<'a> {
    /// Number of elements.
    #[must_use]
    pub const fn len(self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the array is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.items.len() == 0
    }

    /// Element `index`, or `None` if out of bounds.
    #[must_use]
    pub fn get(self, index: usize) -> Option<ValueRef<'a>> {
        (index < self.items.len()).then(|| self.items.get(index))
    }

    /// Iterate over elements in order.
    #[must_use]
    pub const fn iter(self) -> ItemIter<'a> {
        self.items.iter()
    }
}

/// A borrowed map view. Pairs keep their stored order; duplicate keys are kept.
#[derive(Clone, Copy)]
pub struct MapRef<'a> {
    items: Items<'a>,
}

impl<'a> MapRef<'a> {
    /// Number of key/value pairs.
    #[must_use]
    pub const fn len(self) -> usize {
        self.items.len() / 2
    }

    /// Returns `true` if the map has no pairs.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.items.len() == 0
    }

    /// Pair `index` in stored order.
    #[must_use]
    pub fn entry(self, index: usize) -> Option<(ValueRef<'a>, ValueRef<'a>)> {
        (index < self.len()).then(|| (self.items.get(2 * index), self.items.get(2 * index + 1)))
    }

    /// Iterate over pairs in stored order.
    #[must_use]
    pub const fn iter(self) -> MapIter<'a> {
        MapIter {
            inner: self.items.iter(),
        }
    }

    /// Value of the first pair whose key is the text string `key`.
    ///
    /// Keys of any other major type never match.
    #[must_use]
    pub fn get(self, key: &str) -> Option<ValueRef<'a>> {
        self.iter()
            .find(|(k, _)| k.major() == MajorType::Text && k.string_bytes() == key.as_bytes())
            .map(|(_, v)| v)
    }

    /// Returns `true` if some text key equals `key`.
    #[must_use]
    pub fn contains_key(self, key: &str) -> bool {
        self.iter()
            .any(|(k, _)| k.major() == MajorType::Text && k.string_bytes() == key.as_bytes())
    }
}

/// Iterator over map pairs.
#[derive(Clone)]
pub struct MapIter<'a> {
    inner: ItemIter<'a>,
}

impl<'a> Iterator for MapIter<'a> {
    type Item = (ValueRef<'a>, ValueRef<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let k = self.inner.next()?;
        let v = self.inner.next()?;
        Some((k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.inner.len() / 2;
        (n, Some(n))
    }
}

impl ExactSizeIterator for MapIter<'_> {}
impl FusedIterator for MapIter<'_> {}

/// A borrowed tag view.
#[derive(Clone, Copy)]
pub struct TagRef<'a> {
    buf: &'a [u8],
    start: usize,
}

impl<'a> TagRef<'a> {
    /// The tag number.
    #[must_use]
    pub fn tag(self) -> u64 {
        read_u64(self.buf, self.start)
    }

    /// The wrapped value.
    #[must_use]
    pub fn value(self) -> ValueRef<'a> {
        let entry = read_entry(self.buf, self.start + 8);
        let values = self.start + TAG_HEADER_SIZE;
        ValueRef::new(self.buf, entry.major(), values, values + entry.end())
    }
}
