use crate::entry::MAX_VALUE_BYTES;

/// Nesting depth allowed by default. Arrays, maps and tags each add one level.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Suggested cap on array length (and map pairs) for [`DecodeLimits::with_max_container_len`].
pub const DEFAULT_MAX_CONTAINER_LEN: usize = 1 << 16;

/// Bounds applied while decoding wire bytes.
///
/// Each bound is checked before the work it guards: a declared length that is too large fails
/// before its storage is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Longest accepted input, in bytes.
    pub max_input_bytes: usize,
    /// Deepest accepted nesting.
    pub max_depth: usize,
    /// Items across all containers of the input; a map pair counts as two.
    pub max_total_items: usize,
    /// Longest array.
    pub max_array_len: usize,
    /// Largest map, in pairs.
    pub max_map_len: usize,
    /// Longest byte string, with indefinite chunks joined.
    pub max_bytes_len: usize,
    /// Longest text string in UTF-8 bytes, with indefinite chunks joined.
    pub max_text_len: usize,
}

impl DecodeLimits {
    /// Limits scaled to a message of `max_message_bytes`.
    ///
    /// Every item costs at least one wire byte, so capping input, total items, container and
    /// string lengths at the message size rejects nothing a message of that size can hold.
    /// Depth is capped at [`DEFAULT_MAX_DEPTH`].
    #[must_use]
    pub const fn for_bytes(max_message_bytes: usize) -> Self {
        Self {
            max_input_bytes: max_message_bytes,
            max_depth: DEFAULT_MAX_DEPTH,
            max_total_items: max_message_bytes,
            max_array_len: max_message_bytes,
            max_map_len: max_message_bytes,
            max_bytes_len: max_message_bytes,
            max_text_len: max_message_bytes,
        }
    }

    /// Cap arrays at `len` items and maps at `len` pairs, for example
    /// [`DEFAULT_MAX_CONTAINER_LEN`].
    ///
    /// ```
    /// use packed_cbor::{DecodeLimits, DEFAULT_MAX_CONTAINER_LEN};
    ///
    /// let limits =
    ///     DecodeLimits::for_bytes(1 << 20).with_max_container_len(DEFAULT_MAX_CONTAINER_LEN);
    /// assert_eq!(limits.max_map_len, 1 << 16);
    /// ```
    #[must_use]
    pub const fn with_max_container_len(mut self, len: usize) -> Self {
        self.max_array_len = len;
        self.max_map_len = len;
        self
    }
}

impl Default for DecodeLimits {
    /// Everything a packed document can address, with the default depth.
    fn default() -> Self {
        Self {
            max_input_bytes: MAX_VALUE_BYTES,
            max_depth: DEFAULT_MAX_DEPTH,
            max_total_items: MAX_VALUE_BYTES,
            max_array_len: MAX_VALUE_BYTES,
            max_map_len: MAX_VALUE_BYTES,
            max_bytes_len: MAX_VALUE_BYTES,
            max_text_len: MAX_VALUE_BYTES,
        }
    }
}
