//! Half/single/double bit-level conversion.

/// The one NaN bit pattern stored in documents; every decoded NaN collapses to it.
pub const CANONICAL_NAN_BITS: u64 = 0x7ff8_0000_0000_0000;

const HALF_CANONICAL_NAN: u16 = 0x7e00;

const F64_SIGN: u64 = 0x8000_0000_0000_0000;
const F64_EXP_MASK: u64 = 0x7ff0_0000_0000_0000;
const F64_FRAC_MASK: u64 = 0x000f_ffff_ffff_ffff;

/// `2^-24`, the weight of one unit in a half-precision subnormal.
const HALF_SUBNORMAL_UNIT: f64 = 1.0 / 16_777_216.0;

/// The narrowest IEEE-754 width that carries a double exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinimalFloat {
    /// binary16 bits (wire `0xf9`).
    Half(u16),
    /// binary32 bits (wire `0xfa`).
    Single(u32),
    /// binary64 bits (wire `0xfb`).
    Double(u64),
}

impl MinimalFloat {
    /// Widen back to a double.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        match self {
            Self::Half(h) => decode_half(h),
            Self::Single(s) => decode_single(s),
            Self::Double(d) => f64::from_bits(d),
        }
    }
}

/// Widen binary16 bits to a double.
///
/// Subnormal halves are scaled from their fraction rather than rebiased; an all-ones exponent
/// maps to infinity or NaN.
#[must_use]
pub fn decode_half(bits: u16) -> f64 {
    let sign = u64::from(bits & 0x8000);
    let exponent = u64::from(bits & 0x7c00);
    let fraction = u64::from(bits & 0x03ff);

    let exponent = if exponent == 0x7c00 {
        0x7ff << 10
    } else if exponent != 0 {
        exponent + ((1023 - 15) << 10)
    } else if fraction != 0 {
        #[allow(clippy::cast_precision_loss)]
        let magnitude = fraction as f64 * HALF_SUBNORMAL_UNIT;
        return if sign != 0 { -magnitude } else { magnitude };
    } else {
        0
    };

    f64::from_bits((sign << 48) | (exponent << 42) | (fraction << 42))
}

/// Widen binary32 bits to a double.
#[inline]
#[must_use]
pub fn decode_single(bits: u32) -> f64 {
    f64::from(f32::from_bits(bits))
}

/// Collapse any NaN to [`CANONICAL_NAN_BITS`].
#[inline]
#[must_use]
pub fn canonicalize_nan(value: f64) -> f64 {
    if value.is_nan() {
        f64::from_bits(CANONICAL_NAN_BITS)
    } else {
        value
    }
}

/// Pick the narrowest of half, single and double that decodes back bit-identical to `value`.
///
/// Zero always encodes as half with its sign preserved. Any NaN encodes as the canonical half NaN
/// `0x7e00`, so NaN payloads do not survive.
#[must_use]
pub fn encode_double_minimal(value: f64) -> MinimalFloat {
    let bits = value.to_bits();
    let sign = bits & F64_SIGN;
    let exponent = bits & F64_EXP_MASK;
    let fraction = bits & F64_FRAC_MASK;

    if exponent == 0 && fraction == 0 {
        #[allow(clippy::cast_possible_truncation)]
        return MinimalFloat::Half((sign >> 48) as u16);
    }
    if value.is_nan() {
        return MinimalFloat::Half(HALF_CANONICAL_NAN);
    }

    #[allow(clippy::cast_possible_truncation)]
    let single = value as f32;
    if f64::from(single).to_bits() != bits {
        return MinimalFloat::Double(bits);
    }
    match single_to_half(single.to_bits()) {
        Some(half) => MinimalFloat::Half(half),
        None => MinimalFloat::Single(single.to_bits()),
    }
}

/// Narrow binary32 bits to binary16 if that is exact, including half subnormals.
fn single_to_half(bits: u32) -> Option<u16> {
    #[allow(clippy::cast_possible_truncation)]
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exponent = (bits >> 23) & 0xff;
    let fraction = bits & 0x007f_ffff;

    if exponent == 0xff {
        // Infinity; NaN never reaches here.
        return Some(sign | 0x7c00);
    }
    if exponent == 0 {
        // Zero is handled by the caller and binary32 subnormals are far below half range.
        return None;
    }

    #[allow(clippy::cast_possible_wrap)]
    let unbiased = exponent as i32 - 127;
    if unbiased > 15 {
        return None;
    }
    if unbiased >= -14 {
        if fraction & 0x1fff != 0 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let half_exp = ((unbiased + 15) as u16) << 10;
        #[allow(clippy::cast_possible_truncation)]
        let half_frac = (fraction >> 13) as u16;
        return Some(sign | half_exp | half_frac);
    }
    if unbiased < -24 {
        return None;
    }

    // Subnormal half: value = significand * 2^(unbiased - 23) = m * 2^-24.
    let significand = fraction | 0x0080_0000;
    #[allow(clippy::cast_sign_loss)]
    let shift = (-(unbiased + 1)) as u32;
    if significand & ((1 << shift) - 1) != 0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let m = (significand >> shift) as u16;
    Some(sign | m)
}
