use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use tracing::debug;

use crate::buffer::BufferBuilder;
use crate::entry::{Entry, ENTRY_SIZE};
use crate::limits::DEFAULT_MAX_DEPTH;
use crate::value::ValueRef;
use crate::{CborError, DecodeLimits};

/// An owned, self-contained packed CBOR document.
///
/// The buffer holds one root entry followed by the root value region. Any value inside can be
/// reached without parsing its siblings, and every sub-document handed out by navigation is an
/// independent copy.
///
/// Documents are immutable; equality, ordering and hashing follow [`compare`](crate::compare)
/// and [`hash`](crate::hash), and `Display` renders diagnostic notation.
#[derive(Clone)]
pub struct Document {
    buf: Vec<u8>,
}

impl Document {
    pub(crate) fn from_builder(out: BufferBuilder) -> Self {
        Self { buf: out.into_vec() }
    }

    /// Decode exactly one CBOR data item from wire bytes.
    ///
    /// Limits are derived from the input size with [`DecodeLimits::for_bytes`].
    ///
    /// # Errors
    ///
    /// Returns a `MalformedInput` error for ill-formed input and a `ResourceLimit` error when a
    /// limit is exceeded. No partial document is ever returned.
    pub fn decode(bytes: &[u8]) -> Result<Self, CborError> {
        Self::decode_with_limits(bytes, DecodeLimits::for_bytes(bytes.len()))
    }

    /// Decode exactly one CBOR data item under explicit limits.
    ///
    /// # Errors
    ///
    /// See [`Document::decode`].
    pub fn decode_with_limits(bytes: &[u8], limits: DecodeLimits) -> Result<Self, CborError> {
        crate::decode::decode(bytes, limits)
    }

    /// Adopt a packed buffer produced by [`Document::into_packed`], re-validating its layout.
    ///
    /// Nesting is capped at [`DEFAULT_MAX_DEPTH`]; documents decoded or built with a larger depth
    /// limit reload through [`Document::from_packed_with_depth`].
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` (or `Utf8Invalid`, `DepthLimitExceeded`) if the buffer is not a
    /// well-formed packed document.
    pub fn from_packed(buf: Vec<u8>) -> Result<Self, CborError> {
        Self::from_packed_with_depth(buf, DEFAULT_MAX_DEPTH)
    }

    /// Like [`Document::from_packed`] with an explicit nesting depth limit.
    ///
    /// # Errors
    ///
    /// See [`Document::from_packed`]; nesting past `max_depth` fails with `DepthLimitExceeded`.
    pub fn from_packed_with_depth(buf: Vec<u8>, max_depth: usize) -> Result<Self, CborError> {
        if let Err(err) = crate::validate::validate_packed(&buf, max_depth) {
            debug!(offset = err.offset, code = ?err.code, "packed document rejected");
            return Err(err);
        }
        Ok(Self { buf })
    }

    /// Independent copy of a value, typically one borrowed from another document.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailed` if the copy cannot be allocated.
    pub fn from_value(value: ValueRef<'_>) -> Result<Self, CborError> {
        let region = value.region();
        let root = Entry::new(value.major(), region.len(), 0)?;
        let mut out = BufferBuilder::with_capacity(ENTRY_SIZE + region.len());
        out.append_u32(root.bits())?;
        out.append(region)?;
        Ok(Self::from_builder(out))
    }

    /// The packed bytes.
    #[must_use]
    pub fn as_packed(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the document and return the packed bytes.
    #[must_use]
    pub fn into_packed(self) -> Vec<u8> {
        self.buf
    }

    /// Borrowed view of the root value.
    #[must_use]
    pub fn root(&self) -> ValueRef<'_> {
        ValueRef::root(&self.buf)
    }

    /// Encode as minimal definite-length CBOR.
    ///
    /// The output is not necessarily byte-identical to the input this document was decoded
    /// from, but decoding it yields an equal document.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailed` if the output cannot be allocated.
    pub fn encode(&self) -> Result<Vec<u8>, CborError> {
        crate::encode::encode(self.root(), self.buf.len())
    }

    /// Diagnostic notation, as produced by `Display`.
    #[must_use]
    pub fn to_diagnostic(&self) -> String {
        let mut out = String::new();
        // Writing to a `String` only fails if the packed text is not UTF-8, which validation rules out.
        let _ = crate::render::write_value(&mut out, self.root());
        out
    }

    /// Order-compatible 32-bit hash; see [`hash`](crate::hash).
    #[must_use]
    pub fn hash32(&self) -> u32 {
        crate::hash::hash(self)
    }

    /// SHA-256 digest of the minimal wire encoding.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailed` if the encoding cannot be allocated.
    #[cfg(feature = "sha2")]
    #[cfg_attr(docsrs, doc(cfg(feature = "sha2")))]
    pub fn sha256(&self) -> Result<[u8; 32], CborError> {
        use sha2::{Digest, Sha256};
        let mut h = Sha256::new();
        h.update(self.encode()?);
        let out = h.finalize();
        let mut digest = [0u8; 32];
        digest.copy_from_slice(out.as_slice());
        Ok(digest)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::render::write_value(f, self.root())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Document({self})")
    }
}
