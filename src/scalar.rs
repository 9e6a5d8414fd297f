use core::cmp::Ordering;

use crate::float::canonicalize_nan;

/// Simple value `false`.
pub const SIMPLE_FALSE: u8 = 20;
/// Simple value `true`.
pub const SIMPLE_TRUE: u8 = 21;
/// Simple value `null`.
pub const SIMPLE_NULL: u8 = 22;
/// Simple value `undefined`.
pub const SIMPLE_UNDEFINED: u8 = 23;

/// The 8-byte image a simple value hashes as: a quiet-NaN payload no decoded float can carry.
pub(crate) const SIMPLE_SENTINEL: u64 = 0x7FFF_FFFF_FFFF_FF00;

/// The payload of a major type 7 item.
///
/// Floats and simple values share a wire major type but never share a representation here.
#[derive(Debug, Clone, Copy)]
pub enum Scalar {
    /// An IEEE-754 double (any NaN is stored as the canonical NaN).
    Float(f64),
    /// A simple value code.
    Simple(u8),
}

impl Scalar {
    /// A float scalar with NaN canonicalized.
    #[must_use]
    pub fn float(value: f64) -> Self {
        Self::Float(canonicalize_nan(value))
    }

    /// `Some(b)` for `true`/`false`.
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::Simple(SIMPLE_FALSE) => Some(false),
            Self::Simple(SIMPLE_TRUE) => Some(true),
            _ => None,
        }
    }

    /// Returns `true` for `null`.
    #[must_use]
    pub const fn is_null(self) -> bool {
        matches!(self, Self::Simple(SIMPLE_NULL))
    }

    /// The float value, if this is a float.
    #[must_use]
    pub const fn as_f64(self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(f),
            Self::Simple(_) => None,
        }
    }

    /// Bits used for hashing: `-0.0` folds into `0.0`, simple codes map into the sentinel space.
    pub(crate) fn hash_image(self) -> u64 {
        match self {
            Self::Float(f) if f == 0.0 => 0,
            Self::Float(f) => f.to_bits(),
            Self::Simple(code) => SIMPLE_SENTINEL | u64::from(code),
        }
    }

    /// Simples sort before floats. Floats follow IEEE order with `-0.0 == 0.0`; NaN equals NaN
    /// and sorts after every other float.
    #[must_use]
    pub fn total_cmp(self, other: Self) -> Ordering {
        match (self, other) {
            (Self::Simple(a), Self::Simple(b)) => a.cmp(&b),
            (Self::Simple(_), Self::Float(_)) => Ordering::Less,
            (Self::Float(_), Self::Simple(_)) => Ordering::Greater,
            (Self::Float(a), Self::Float(b)) => match (a.is_nan(), b.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            },
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.total_cmp(*other) == Ordering::Equal
    }
}

impl Eq for Scalar {}
