use alloc::vec::Vec;

use crate::alloc_util::try_reserve;
use crate::entry::{Entry, ENTRY_SIZE};
use crate::CborError;

/// Append-only growable byte store backing a packed document under construction.
///
/// Writes only ever extend the buffer; the one exception is [`BufferBuilder::patch_entry`],
/// which fills in an entry slot reserved earlier with [`BufferBuilder::reserve_zeroed`] once
/// the child it describes has been written.
#[derive(Debug, Default, Clone)]
pub(crate) struct BufferBuilder {
    buf: Vec<u8>,
}

impl BufferBuilder {
    /// Create an empty buffer.
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Create an empty buffer with pre-allocated capacity.
    #[must_use]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::new();
        // Only a hint; a refused reservation surfaces on the first append that needs it.
        buf.try_reserve(capacity).ok();
        Self { buf }
    }

    /// Number of bytes written so far.
    #[inline]
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    /// Borrow the bytes written so far.
    #[inline]
    #[must_use]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume and return the bytes.
    #[must_use]
    pub(crate) fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    #[inline]
    fn reserve(&mut self, additional: usize) -> Result<(), CborError> {
        let offset = self.buf.len();
        try_reserve(&mut self.buf, additional, offset)
    }

    /// Append raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailed` / `LengthOverflow` if the buffer cannot grow.
    pub(crate) fn append(&mut self, bytes: &[u8]) -> Result<(), CborError> {
        self.reserve(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Append a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot grow.
    pub(crate) fn append_u32(&mut self, v: u32) -> Result<(), CborError> {
        self.append(&v.to_le_bytes())
    }

    /// Append a little-endian `u64`.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot grow.
    pub(crate) fn append_u64(&mut self, v: u64) -> Result<(), CborError> {
        self.append(&v.to_le_bytes())
    }

    /// Append `n` zero bytes and return the offset of the first one.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot grow.
    pub(crate) fn reserve_zeroed(&mut self, n: usize) -> Result<usize, CborError> {
        self.reserve(n)?;
        let at = self.buf.len();
        self.buf.resize(at + n, 0);
        Ok(at)
    }

    /// Zero-pad up to the next multiple of `align` (a power of two).
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot grow.
    pub(crate) fn align_to(&mut self, align: usize) -> Result<(), CborError> {
        debug_assert!(align.is_power_of_two());
        let pad = self.buf.len().wrapping_neg() & (align - 1);
        if pad > 0 {
            self.reserve_zeroed(pad)?;
        }
        Ok(())
    }

    /// Overwrite a previously reserved little-endian `u32` at `at`.
    pub(crate) fn patch_u32(&mut self, at: usize, v: u32) {
        self.buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
    }

    /// Fill entry slot `index` of the entry table starting at `table`.
    pub(crate) fn patch_entry(&mut self, table: usize, index: usize, entry: Entry) {
        self.patch_u32(table + index * ENTRY_SIZE, entry.bits());
    }
}
