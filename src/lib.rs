//! # packed-cbor
//!
//! CBOR (RFC 8949) values stored in a packed, random-access binary layout, plus the algorithms
//! that work on that layout directly: wire decode and encode, float canonicalization, a total
//! order, an order-compatible hash, diagnostic notation and key/index/path navigation.
//!
//! ## Design principles
//!
//! - **One packed buffer is the value.**
//!   A [`Document`] is a flat byte buffer in which every value is located by a 32-bit entry
//!   (major type + cumulative end offset). Children are reached through entry tables without
//!   parsing their siblings.
//! - **Decode is a single forward pass.**
//!   Definite and indefinite-length input produce the same document; declared lengths are
//!   checked against the remaining input and against [`DecodeLimits`] before anything is
//!   allocated.
//! - **Encode is minimal.**
//!   Integers and lengths use the narrowest argument width, floats the narrowest exact IEEE
//!   width, and nothing is ever emitted as indefinite-length. `decode(encode(d)) == d` holds for
//!   every document, byte-identical round trips of arbitrary input do not.
//! - **Wrong shape is an error, missing is not.**
//!   Navigation returns `Ok(None)` / `Ok(false)` for an absent key or index and an
//!   `InvalidOperation` error when applied to a value of the wrong major type.
//!
//! ## Example
//!
//! ```
//! # fn main() -> Result<(), packed_cbor::CborError> {
//! use packed_cbor::{path, Document};
//!
//! // Indefinite-length array [1, 2].
//! let doc = Document::decode(&[0x9f, 0x01, 0x02, 0xff])?;
//! assert_eq!(doc.encode()?, [0x82, 0x01, 0x02]);
//! assert_eq!(doc.to_string(), "[1, 2]");
//!
//! let second = doc.at(path![1usize])?.expect("in range");
//! assert_eq!(second.root().as_u64(), Some(2));
//! # Ok(()) }
//! ```
//!
//! ## Feature flags
//!
//! - `std` *(default)*: implements `std::error::Error` for [`CborError`].
//! - `sha2` *(default)*: enables [`Document::sha256`] over the minimal wire encoding.
//! - `serde`: `Serialize` for documents and values, `Deserialize` for documents.
//! - `simdutf8`: enables SIMD-accelerated UTF-8 validation where supported.
//! - `unsafe-utf8`: skips UTF-8 re-validation when reading text out of a validated document.
//!
//! ## Safety
//!
//! This crate forbids `unsafe` code by default. Enabling the `unsafe-utf8` feature allows
//! unchecked UTF-8 conversion of text that was validated when the document was built.
//!
//! ## `no_std`
//!
//! The crate is `no_std` compatible and requires an allocator.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(feature = "unsafe-utf8"), forbid(unsafe_code))]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

extern crate alloc;

mod alloc_util;
mod buffer;
mod builder;
mod compare;
mod decode;
mod document;
mod encode;
mod entry;
mod error;
mod float;
mod hash;
mod limits;
mod path;
mod render;
mod scalar;
#[cfg(feature = "serde")]
mod serde_impl;
mod utf8;
mod validate;
mod value;
mod wire;

pub use crate::builder::DocBuilder;
pub use crate::compare::{compare, compare_values};
pub use crate::document::Document;
pub use crate::entry::{MajorType, MAX_VALUE_BYTES};
pub use crate::error::{CborError, ErrorCode, ErrorKind, Operation};
pub use crate::float::{
    canonicalize_nan, decode_half, decode_single, encode_double_minimal, MinimalFloat,
    CANONICAL_NAN_BITS,
};
pub use crate::hash::{hash, hash_value_ref};
pub use crate::limits::{DecodeLimits, DEFAULT_MAX_CONTAINER_LEN, DEFAULT_MAX_DEPTH};
pub use crate::path::PathElem;
pub use crate::scalar::{Scalar, SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED};
pub use crate::value::{ArrayRef, ItemIter, MapIter, MapRef, TagRef, ValueRef};

/// Construct a path slice for [`Document::at`] and [`ValueRef::at`].
///
/// String segments become [`PathElem::Key`], `usize` segments [`PathElem::Index`].
#[macro_export]
macro_rules! path {
    ($($seg:expr),* $(,)?) => {
        &[$($crate::__path_elem!($seg)),*]
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __path_elem {
    ($seg:expr) => {
        $crate::PathElem::from($seg)
    };
}
