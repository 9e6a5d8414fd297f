//! UTF-8 checks for text strings.

/// `Some(text)` if `bytes` is well-formed UTF-8.
#[inline]
pub(crate) fn validate(bytes: &[u8]) -> Option<&str> {
    #[cfg(feature = "simdutf8")]
    {
        simdutf8::basic::from_utf8(bytes).ok()
    }

    #[cfg(not(feature = "simdutf8"))]
    {
        core::str::from_utf8(bytes).ok()
    }
}

/// Text bytes read back out of a document; they were validated when the document was decoded,
/// built or loaded.
#[cfg(feature = "unsafe-utf8")]
#[inline]
#[allow(clippy::unnecessary_wraps)]
pub(crate) fn trusted(bytes: &[u8]) -> Option<&str> {
    // SAFETY: every text region passes `validate` before it becomes part of a `Document`.
    Some(unsafe { core::str::from_utf8_unchecked(bytes) })
}

#[cfg(not(feature = "unsafe-utf8"))]
#[inline]
pub(crate) fn trusted(bytes: &[u8]) -> Option<&str> {
    validate(bytes)
}
