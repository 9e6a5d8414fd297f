//! Append primitives shared by the binary decoder and external producers.
//!
//! Every value is appended in one forward pass: its payload bytes first, then the [`Entry`] that
//! locates it. Containers whose size is known up front reserve their entry table and patch it as
//! children land. A [`DocBuilder`] only learns a container's size when its closure returns, so it
//! collects children in a [`PendingItems`] scratch area and commits them in one copy, keeping the
//! count ahead of the value area.

use alloc::vec::Vec;

use crate::alloc_util::try_reserve;
use crate::buffer::BufferBuilder;
use crate::document::Document;
use crate::entry::{Entry, MajorType, SCALAR_KIND_FLOAT, SCALAR_KIND_SIMPLE, STR_ALIGN};
use crate::limits::DEFAULT_MAX_DEPTH;
use crate::scalar::{Scalar, SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED};
use crate::value::ValueRef;
use crate::{CborError, ErrorCode};

pub(crate) fn write_uint(out: &mut BufferBuilder, v: u64) -> Result<(), CborError> {
    out.append_u64(v)
}

/// Reserve a string length prefix; returns its position for [`finish_string`].
pub(crate) fn begin_string(out: &mut BufferBuilder) -> Result<usize, CborError> {
    out.reserve_zeroed(4)
}

pub(crate) fn finish_string(
    out: &mut BufferBuilder,
    header_at: usize,
    offset: usize,
) -> Result<(), CborError> {
    let len = out.len() - header_at - 4;
    let len = u32::try_from(len).map_err(|_| CborError::new(ErrorCode::DocumentTooLarge, offset))?;
    out.patch_u32(header_at, len);
    out.align_to(STR_ALIGN)
}

pub(crate) fn write_string(
    out: &mut BufferBuilder,
    bytes: &[u8],
    offset: usize,
) -> Result<(), CborError> {
    let header_at = begin_string(out)?;
    out.append(bytes)?;
    finish_string(out, header_at, offset)
}

pub(crate) fn write_scalar(out: &mut BufferBuilder, scalar: Scalar) -> Result<(), CborError> {
    let mut slot = [0u8; 16];
    match scalar {
        Scalar::Float(f) => {
            slot[0] = SCALAR_KIND_FLOAT;
            slot[8..].copy_from_slice(&f.to_bits().to_le_bytes());
        }
        Scalar::Simple(code) => {
            slot[0] = SCALAR_KIND_SIMPLE;
            slot[1] = code;
        }
    }
    out.append(&slot)
}

/// Write a container header (count) followed by a zeroed entry table for `items` entries.
///
/// Returns the table position; values start right after it.
pub(crate) fn begin_container(
    out: &mut BufferBuilder,
    count: usize,
    items: usize,
    offset: usize,
) -> Result<usize, CborError> {
    let count =
        u32::try_from(count).map_err(|_| CborError::new(ErrorCode::DocumentTooLarge, offset))?;
    let table_len = items
        .checked_mul(4)
        .ok_or_else(|| CborError::new(ErrorCode::LengthOverflow, offset))?;
    out.append_u32(count)?;
    out.reserve_zeroed(table_len)
}

/// Children of a container whose item count is not known until it is closed.
///
/// Child entries are relative to the start of `values`, which is exactly where they will sit
/// once committed behind the entry table.
#[derive(Debug, Default)]
pub(crate) struct PendingItems {
    pub(crate) values: BufferBuilder,
    entries: Vec<Entry>,
}

impl PendingItems {
    pub(crate) const fn new() -> Self {
        Self {
            values: BufferBuilder::new(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn push_entry(&mut self, entry: Entry, offset: usize) -> Result<(), CborError> {
        try_reserve(&mut self.entries, 1, offset)?;
        self.entries.push(entry);
        Ok(())
    }

    /// Append `major` (array or map) with the collected children to `out`.
    pub(crate) fn commit(
        self,
        out: &mut BufferBuilder,
        major: MajorType,
        offset: usize,
    ) -> Result<(), CborError> {
        let items = self.entries.len();
        let count = if major == MajorType::Map {
            if items % 2 != 0 {
                return Err(CborError::new(ErrorCode::OddMapItems, offset));
            }
            items / 2
        } else {
            items
        };
        let table = begin_container(out, count, items, offset)?;
        for (i, entry) in self.entries.iter().enumerate() {
            out.patch_entry(table, i, *entry);
        }
        out.append(self.values.as_bytes())
    }

    /// Append a tag wrapping the single collected child.
    fn commit_tag(self, out: &mut BufferBuilder, tag: u64, offset: usize) -> Result<(), CborError> {
        let &[entry] = self.entries.as_slice() else {
            return Err(CborError::new(ErrorCode::ItemCountMismatch, offset));
        };
        out.append_u64(tag)?;
        out.append_u32(entry.bits())?;
        out.append(self.values.as_bytes())
    }

    /// Turn a single collected item into a document.
    fn into_document(self, offset: usize) -> Result<Document, CborError> {
        let &[entry] = self.entries.as_slice() else {
            return Err(CborError::new(ErrorCode::ItemCountMismatch, offset));
        };
        let mut out = BufferBuilder::with_capacity(4 + self.values.len());
        out.append_u32(entry.bits())?;
        out.append(self.values.as_bytes())?;
        Ok(Document::from_builder(out))
    }
}

/// Builds a packed document item by item, without a wire encoding in between.
///
/// This is the entry point for external producers (a diagnostic-notation parser, a serde
/// deserializer, application code). Each call appends one fully formed value; nested
/// containers are filled inside a closure and their counts are derived when it returns.
///
/// ```
/// # fn main() -> Result<(), packed_cbor::CborError> {
/// use packed_cbor::Document;
///
/// let doc = Document::build(|b| {
///     b.map(|m| {
///         m.text("a")?;
///         m.array(|a| {
///             a.uint(10)?;
///             a.uint(20)
///         })
///     })
/// })?;
/// assert_eq!(doc.to_string(), r#"{"a": [10, 20]}"#);
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct DocBuilder {
    pending: PendingItems,
    depth: usize,
    max_depth: usize,
}

impl DocBuilder {
    const fn with_depth(depth: usize, max_depth: usize) -> Self {
        Self {
            pending: PendingItems::new(),
            depth,
            max_depth,
        }
    }

    /// Number of items appended at this level so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing has been appended at this level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.len() == 0
    }

    fn push_with<F>(&mut self, major: MajorType, write: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut BufferBuilder) -> Result<(), CborError>,
    {
        write(&mut self.pending.values)?;
        let end = self.pending.values.len();
        let entry = Entry::new(major, end, end)?;
        self.pending.push_entry(entry, end)
    }

    fn nested<F>(&self, fill: F) -> Result<Self, CborError>
    where
        F: FnOnce(&mut Self) -> Result<(), CborError>,
    {
        let depth = self.depth + 1;
        if depth > self.max_depth {
            return Err(CborError::new(
                ErrorCode::DepthLimitExceeded,
                self.pending.values.len(),
            ));
        }
        let mut child = Self::with_depth(depth, self.max_depth);
        fill(&mut child)?;
        Ok(child)
    }

    /// Append an unsigned integer.
    ///
    /// # Errors
    ///
    /// Returns an error if the document grows past the packed size limit.
    pub fn uint(&mut self, v: u64) -> Result<(), CborError> {
        self.push_with(MajorType::Unsigned, |out| write_uint(out, v))
    }

    /// Append the negative integer `-(raw + 1)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document grows past the packed size limit.
    pub fn negative(&mut self, raw: u64) -> Result<(), CborError> {
        self.push_with(MajorType::Negative, |out| write_uint(out, raw))
    }

    /// Append a signed integer as unsigned or negative.
    ///
    /// # Errors
    ///
    /// Returns an error if the document grows past the packed size limit.
    pub fn int(&mut self, v: i64) -> Result<(), CborError> {
        match u64::try_from(v) {
            Ok(u) => self.uint(u),
            Err(_) => self.negative(v.unsigned_abs() - 1),
        }
    }

    /// Append a byte string.
    ///
    /// # Errors
    ///
    /// Returns an error if the document grows past the packed size limit.
    pub fn bytes(&mut self, bytes: &[u8]) -> Result<(), CborError> {
        self.push_with(MajorType::Bytes, |out| {
            let off = out.len();
            write_string(out, bytes, off)
        })
    }

    /// Append a text string.
    ///
    /// # Errors
    ///
    /// Returns an error if the document grows past the packed size limit.
    pub fn text(&mut self, text: &str) -> Result<(), CborError> {
        self.push_with(MajorType::Text, |out| {
            let off = out.len();
            write_string(out, text.as_bytes(), off)
        })
    }

    /// Append a float (NaN is stored canonically).
    ///
    /// # Errors
    ///
    /// Returns an error if the document grows past the packed size limit.
    pub fn float(&mut self, value: f64) -> Result<(), CborError> {
        self.push_with(MajorType::FloatOrSimple, |out| {
            write_scalar(out, Scalar::float(value))
        })
    }

    /// Append a simple value by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the document grows past the packed size limit.
    pub fn simple(&mut self, code: u8) -> Result<(), CborError> {
        self.push_with(MajorType::FloatOrSimple, |out| {
            write_scalar(out, Scalar::Simple(code))
        })
    }

    /// Append `true` or `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document grows past the packed size limit.
    pub fn bool(&mut self, value: bool) -> Result<(), CborError> {
        self.simple(if value { SIMPLE_TRUE } else { SIMPLE_FALSE })
    }

    /// Append `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document grows past the packed size limit.
    pub fn null(&mut self) -> Result<(), CborError> {
        self.simple(SIMPLE_NULL)
    }

    /// Append `undefined`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document grows past the packed size limit.
    pub fn undefined(&mut self) -> Result<(), CborError> {
        self.simple(SIMPLE_UNDEFINED)
    }

    /// Append an array filled by `fill`.
    ///
    /// # Errors
    ///
    /// Returns `DepthLimitExceeded` past the depth limit, or any error raised by `fill`.
    pub fn array<F>(&mut self, fill: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut Self) -> Result<(), CborError>,
    {
        let child = self.nested(fill)?;
        self.push_with(MajorType::Array, |out| {
            let off = out.len();
            child.pending.commit(out, MajorType::Array, off)
        })
    }

    /// Append a map filled by `fill` with alternating keys and values.
    ///
    /// Pairs keep the order they were appended in; duplicate keys are kept.
    ///
    /// # Errors
    ///
    /// Returns `OddMapItems` if `fill` leaves a key without a value, `DepthLimitExceeded` past the
    /// depth limit, or any error raised by `fill`.
    pub fn map<F>(&mut self, fill: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut Self) -> Result<(), CborError>,
    {
        let child = self.nested(fill)?;
        self.push_with(MajorType::Map, |out| {
            let off = out.len();
            child.pending.commit(out, MajorType::Map, off)
        })
    }

    /// Append tag `tag` wrapping the single value appended by `fill`.
    ///
    /// # Errors
    ///
    /// Returns `ItemCountMismatch` unless `fill` appends exactly one value.
    pub fn tag<F>(&mut self, tag: u64, fill: F) -> Result<(), CborError>
    where
        F: FnOnce(&mut Self) -> Result<(), CborError>,
    {
        let child = self.nested(fill)?;
        self.push_with(MajorType::Tag, |out| {
            let off = out.len();
            child.pending.commit_tag(out, tag, off)
        })
    }

    /// Append a deep copy of a value from another document.
    ///
    /// The copied value's own nesting counts towards the depth limit.
    ///
    /// # Errors
    ///
    /// Returns `DepthLimitExceeded` if the copy would nest past the depth limit, or an error if
    /// the document grows past the packed size limit.
    pub fn value(&mut self, value: ValueRef<'_>) -> Result<(), CborError> {
        if !fits_depth(value, self.max_depth - self.depth) {
            return Err(CborError::new(
                ErrorCode::DepthLimitExceeded,
                self.pending.values.len(),
            ));
        }
        self.push_with(value.major(), |out| out.append(value.region()))
    }
}

/// Whether `v` nests at most `budget` container or tag levels deep.
///
/// Recursion stops once the budget runs out, so it is bounded by the builder's depth limit.
fn fits_depth(v: ValueRef<'_>, budget: usize) -> bool {
    match v.major() {
        MajorType::Array | MajorType::Map => {
            budget > 0 && v.items().iter().all(|item| fits_depth(item, budget - 1))
        }
        MajorType::Tag => budget > 0 && fits_depth(v.tag_ref().value(), budget - 1),
        _ => true,
    }
}

impl Document {
    /// Build a document from the single value appended by `fill`.
    ///
    /// # Errors
    ///
    /// Returns `ItemCountMismatch` unless exactly one top-level value is appended, or any error
    /// raised by `fill`.
    pub fn build<F>(fill: F) -> Result<Self, CborError>
    where
        F: FnOnce(&mut DocBuilder) -> Result<(), CborError>,
    {
        Self::build_with_depth(DEFAULT_MAX_DEPTH, fill)
    }

    /// Like [`Document::build`] with an explicit nesting depth limit.
    ///
    /// # Errors
    ///
    /// See [`Document::build`]; nesting past `max_depth` fails with `DepthLimitExceeded`.
    pub fn build_with_depth<F>(max_depth: usize, fill: F) -> Result<Self, CborError>
    where
        F: FnOnce(&mut DocBuilder) -> Result<(), CborError>,
    {
        let mut root = DocBuilder::with_depth(0, max_depth);
        fill(&mut root)?;
        let end = root.pending.values.len();
        root.pending.into_document(end)
    }
}
