use core::fmt;

use crate::entry::MajorType;

/// The high-level class of an error.
///
/// Callers branch on these:
/// - **`MalformedInput`**: the wire bytes (or a stored packed buffer) are not a well-formed item.
/// - **`InvalidOperation`**: a navigator operation was applied to a value of the wrong shape.
/// - **`ResourceLimit`**: a configured bound (depth, sizes, item counts) was exceeded.
///
/// A failed lookup is never an error; navigator operations report it as `None` / `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed wire bytes or packed buffer.
    MalformedInput,
    /// Operation not supported for the observed major type.
    InvalidOperation,
    /// A configured resource bound was exceeded.
    ResourceLimit,
}

/// A navigator operation, named in [`ErrorCode::InvalidOperation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// [`Document::object_field`](crate::Document::object_field).
    ObjectField,
    /// [`Document::array_element`](crate::Document::array_element).
    ArrayElement,
    /// [`Document::extract_path`](crate::Document::extract_path).
    ExtractPath,
    /// [`Document::exists`](crate::Document::exists).
    Exists,
    /// [`Document::exists_any`](crate::Document::exists_any).
    ExistsAny,
    /// [`Document::exists_all`](crate::Document::exists_all).
    ExistsAll,
    /// [`Document::at`](crate::Document::at).
    At,
}

impl Operation {
    /// Stable operation name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ObjectField => "object_field",
            Self::ArrayElement => "array_element",
            Self::ExtractPath => "extract_path",
            Self::Exists => "exists",
            Self::ExistsAny => "exists_any",
            Self::ExistsAll => "exists_all",
            Self::At => "at",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A structured error code identifying the reason an operation failed.
///
/// This enum is string-free to support `no_std`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Unexpected end-of-input while decoding.
    UnexpectedEof,
    /// A declared string length or item count exceeds the remaining input.
    MalformedLength,
    /// Arithmetic overflow while computing a length/offset.
    LengthOverflow,
    /// Input contains trailing bytes after the single CBOR data item.
    TrailingBytes,
    /// Memory allocation failed while building a document.
    AllocationFailed,
    /// Reserved additional-info value (28..30) was used.
    ReservedAdditionalInfo,
    /// Indefinite length on an integer, tag, or float/simple item.
    IndefiniteLengthForbidden,
    /// A chunk of an indefinite string had a different major type.
    IndefiniteChunkMismatch,
    /// A chunk of an indefinite string was itself indefinite.
    NestedIndefiniteChunk,
    /// A break marker appeared where a data item was expected.
    UnexpectedBreak,
    /// A map (indefinite-length, or built) held an odd number of items.
    OddMapItems,
    /// A built document or tag did not receive exactly one item.
    ItemCountMismatch,
    /// Invalid UTF-8 in a text string.
    Utf8Invalid,
    /// A packed buffer violates the document layout invariants.
    MalformedDocument,

    /// Input is longer than the configured limit.
    InputLenLimitExceeded,
    /// Nesting depth limit exceeded.
    DepthLimitExceeded,
    /// Total items limit exceeded.
    TotalItemsLimitExceeded,
    /// Array length exceeds limits.
    ArrayLenLimitExceeded,
    /// Map length exceeds limits.
    MapLenLimitExceeded,
    /// Byte string length exceeds limits.
    BytesLenLimitExceeded,
    /// Text string length exceeds limits.
    TextLenLimitExceeded,
    /// A value region does not fit in the 29-bit entry offset.
    DocumentTooLarge,

    /// A navigator operation met a value of the wrong major type.
    InvalidOperation {
        /// The operation that was attempted.
        op: Operation,
        /// The major type that was found instead.
        found: MajorType,
    },
}

impl ErrorCode {
    /// Classify this code.
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::UnexpectedEof
            | Self::MalformedLength
            | Self::LengthOverflow
            | Self::TrailingBytes
            | Self::ReservedAdditionalInfo
            | Self::IndefiniteLengthForbidden
            | Self::IndefiniteChunkMismatch
            | Self::NestedIndefiniteChunk
            | Self::UnexpectedBreak
            | Self::OddMapItems
            | Self::ItemCountMismatch
            | Self::Utf8Invalid
            | Self::MalformedDocument => ErrorKind::MalformedInput,

            Self::AllocationFailed
            | Self::InputLenLimitExceeded
            | Self::DepthLimitExceeded
            | Self::TotalItemsLimitExceeded
            | Self::ArrayLenLimitExceeded
            | Self::MapLenLimitExceeded
            | Self::BytesLenLimitExceeded
            | Self::TextLenLimitExceeded
            | Self::DocumentTooLarge => ErrorKind::ResourceLimit,

            Self::InvalidOperation { .. } => ErrorKind::InvalidOperation,
        }
    }
}

/// An error with a stable code and a byte offset.
///
/// For decode errors `offset` points into the wire input; for packed-buffer validation it points
/// into the packed buffer. Navigator errors use offset `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CborError {
    /// The error code.
    pub code: ErrorCode,
    /// Byte offset where the error was detected.
    pub offset: usize,
}

impl CborError {
    /// Construct an error at `offset`.
    #[inline]
    #[must_use]
    pub const fn new(code: ErrorCode, offset: usize) -> Self {
        Self { code, offset }
    }

    /// Construct an `InvalidOperation` error.
    #[inline]
    #[must_use]
    pub const fn invalid_operation(op: Operation, found: MajorType) -> Self {
        Self::new(ErrorCode::InvalidOperation { op, found }, 0)
    }

    /// The error class.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        self.code.kind()
    }

    /// Returns true iff this error is an `InvalidOperation`.
    #[inline]
    #[must_use]
    pub const fn is_invalid_operation(self) -> bool {
        matches!(self.code, ErrorCode::InvalidOperation { .. })
    }
}

impl fmt::Display for CborError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.code {
            ErrorCode::UnexpectedEof => "unexpected end of input",
            ErrorCode::MalformedLength => "declared length exceeds remaining input",
            ErrorCode::LengthOverflow => "length overflow",
            ErrorCode::TrailingBytes => "trailing bytes after single CBOR item",
            ErrorCode::AllocationFailed => "allocation failed",
            ErrorCode::ReservedAdditionalInfo => "reserved additional info value",
            ErrorCode::IndefiniteLengthForbidden => "indefinite length not allowed for this type",
            ErrorCode::IndefiniteChunkMismatch => "invalid chunk type in indefinite string",
            ErrorCode::NestedIndefiniteChunk => "indefinite chunk in indefinite string",
            ErrorCode::UnexpectedBreak => "unexpected break marker",
            ErrorCode::OddMapItems => "odd number of items in map",
            ErrorCode::ItemCountMismatch => "expected exactly one item",
            ErrorCode::Utf8Invalid => "text must be valid UTF-8",
            ErrorCode::MalformedDocument => "malformed packed document",

            ErrorCode::InputLenLimitExceeded => "input length exceeds decode limits",
            ErrorCode::DepthLimitExceeded => "nesting depth limit exceeded",
            ErrorCode::TotalItemsLimitExceeded => "total items limit exceeded",
            ErrorCode::ArrayLenLimitExceeded => "array length exceeds decode limits",
            ErrorCode::MapLenLimitExceeded => "map length exceeds decode limits",
            ErrorCode::BytesLenLimitExceeded => "byte string length exceeds decode limits",
            ErrorCode::TextLenLimitExceeded => "text string length exceeds decode limits",
            ErrorCode::DocumentTooLarge => "value exceeds packed document size",

            ErrorCode::InvalidOperation { op, found } => {
                return write!(f, "cbor {op} cannot be applied to {}", found.name());
            }
        };

        match self.kind() {
            ErrorKind::MalformedInput => write!(f, "cbor decode failed at {}: {msg}", self.offset),
            _ => write!(f, "cbor resource limit at {}: {msg}", self.offset),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CborError {}
