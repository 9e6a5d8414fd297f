//! Key, index and path navigation.
//!
//! A missing key or an out-of-range index is a soft miss (`Ok(None)` / `Ok(false)`); applying an
//! operation to a value of the wrong shape is an `InvalidOperation` error. Callers rely on the
//! two outcomes staying distinct.

use tracing::debug;

use crate::document::Document;
use crate::entry::MajorType;
use crate::value::{MapRef, ValueRef};
use crate::{CborError, Operation};

/// A path element for navigating inside a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathElem<'p> {
    /// Select a text key from a map.
    Key(&'p str),
    /// Select an index from an array.
    Index(usize),
}

impl<'p> From<&'p str> for PathElem<'p> {
    fn from(key: &'p str) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathElem<'_> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

fn mismatch(op: Operation, found: MajorType) -> CborError {
    debug!(op = op.name(), found = found.name(), "cbor navigation type mismatch");
    CborError::invalid_operation(op, found)
}

fn expect_map(v: ValueRef<'_>, op: Operation) -> Result<MapRef<'_>, CborError> {
    v.as_map().ok_or_else(|| mismatch(op, v.major()))
}

/// Parse an extract-path token as an array index: ASCII digits only.
fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

impl<'a> ValueRef<'a> {
    /// Value of the first pair whose key is the text string `key`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if this value is not a map.
    pub fn get_key(self, key: &str) -> Result<Option<Self>, CborError> {
        Ok(expect_map(self, Operation::ObjectField)?.get(key))
    }

    /// Element `index` of this array.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if this value is not an array.
    pub fn get_index(self, index: usize) -> Result<Option<Self>, CborError> {
        let array = self
            .as_array()
            .ok_or_else(|| mismatch(Operation::ArrayElement, self.major()))?;
        Ok(array.get(index))
    }

    /// Traverses a typed path starting from this value.
    ///
    /// Returns `Ok(None)` if any key is missing or any index is out of bounds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if a key is applied to a non-map or an index to a non-array.
    pub fn at(self, path: &[PathElem<'_>]) -> Result<Option<Self>, CborError> {
        let mut cur = self;
        for pe in path {
            let next = match *pe {
                PathElem::Key(k) => cur
                    .as_map()
                    .ok_or_else(|| mismatch(Operation::At, cur.major()))?
                    .get(k),
                PathElem::Index(i) => cur
                    .as_array()
                    .ok_or_else(|| mismatch(Operation::At, cur.major()))?
                    .get(i),
            };
            match next {
                Some(v) => cur = v,
                None => return Ok(None),
            }
        }
        Ok(Some(cur))
    }

    /// Traverses a path of text tokens starting from this value.
    ///
    /// At a map a token is a key; at an array it must be a base-10 index made of ASCII digits,
    /// and anything else is a miss.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if a token remains when a non-container value is reached.
    pub fn extract_path<I, S>(self, path: I) -> Result<Option<Self>, CborError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cur = self;
        for token in path {
            let token = token.as_ref();
            let next = match cur.major() {
                MajorType::Map => cur.as_map().and_then(|m| m.get(token)),
                MajorType::Array => parse_index(token)
                    .and_then(|i| cur.as_array().and_then(|a| a.get(i))),
                found => return Err(mismatch(Operation::ExtractPath, found)),
            };
            match next {
                Some(v) => cur = v,
                None => return Ok(None),
            }
        }
        Ok(Some(cur))
    }
}

impl Document {
    /// Independent copy of the value stored under text key `key`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the document is not a map.
    pub fn object_field(&self, key: &str) -> Result<Option<Self>, CborError> {
        self.root().get_key(key)?.map(Self::from_value).transpose()
    }

    /// Independent copy of array element `index` (0-based).
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the document is not an array.
    pub fn array_element(&self, index: usize) -> Result<Option<Self>, CborError> {
        self.root().get_index(index)?.map(Self::from_value).transpose()
    }

    /// Independent copy of the value reached by walking text tokens.
    ///
    /// ```
    /// # fn main() -> Result<(), packed_cbor::CborError> {
    /// use packed_cbor::Document;
    ///
    /// // {"a": [10, 20]}
    /// let doc = Document::decode(&[0xa1, 0x61, 0x61, 0x82, 0x0a, 0x14])?;
    /// let v = doc.extract_path(["a", "1"])?.expect("present");
    /// assert_eq!(v.root().as_u64(), Some(20));
    /// assert!(doc.extract_path(["a", "x"])?.is_none());
    /// # Ok(()) }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if a token remains when a non-container value is reached.
    pub fn extract_path<I, S>(&self, path: I) -> Result<Option<Self>, CborError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.root()
            .extract_path(path)?
            .map(Self::from_value)
            .transpose()
    }

    /// Independent copy of the value at a typed path; see [`ValueRef::at`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` on a shape mismatch along the path.
    pub fn at(&self, path: &[PathElem<'_>]) -> Result<Option<Self>, CborError> {
        self.root().at(path)?.map(Self::from_value).transpose()
    }

    /// Returns `true` if the map has a text key equal to `key`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the document is not a map.
    pub fn exists(&self, key: &str) -> Result<bool, CborError> {
        Ok(expect_map(self.root(), Operation::Exists)?.contains_key(key))
    }

    /// Returns `true` if any of `keys` is a text key of the map.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the document is not a map.
    pub fn exists_any<I, S>(&self, keys: I) -> Result<bool, CborError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let map = expect_map(self.root(), Operation::ExistsAny)?;
        Ok(keys.into_iter().any(|k| map.contains_key(k.as_ref())))
    }

    /// Returns `true` if every one of `keys` is a text key of the map.
    ///
    /// An empty key list is trivially satisfied.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the document is not a map.
    pub fn exists_all<I, S>(&self, keys: I) -> Result<bool, CborError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let map = expect_map(self.root(), Operation::ExistsAll)?;
        Ok(keys.into_iter().all(|k| map.contains_key(k.as_ref())))
    }
}
