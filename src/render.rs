//! Diagnostic notation (RFC 8949 section 8) for packed values.

use core::fmt::{self, Write};

use crate::entry::MajorType;
use crate::scalar::{Scalar, SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED};
use crate::value::ValueRef;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Passes float text through while noting whether it already looks like a float.
struct FloatText<'w, W: Write> {
    inner: &'w mut W,
    has_point_or_exp: bool,
}

impl<W: Write> Write for FloatText<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.has_point_or_exp |= s.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'));
        self.inner.write_str(s)
    }
}

fn write_float<W: Write>(w: &mut W, f: f64) -> fmt::Result {
    if f.is_nan() {
        return w.write_str("NaN");
    }
    if f.is_infinite() {
        return w.write_str(if f > 0.0 { "Infinity" } else { "-Infinity" });
    }
    let mut text = FloatText {
        inner: &mut *w,
        has_point_or_exp: false,
    };
    write!(text, "{f:?}")?;
    if !text.has_point_or_exp {
        w.write_str(".0")?;
    }
    Ok(())
}

fn write_text<W: Write>(w: &mut W, s: &str) -> fmt::Result {
    w.write_char('"')?;
    for c in s.chars() {
        match c {
            '\u{8}' => w.write_str("\\b")?,
            '\u{c}' => w.write_str("\\f")?,
            '\n' => w.write_str("\\n")?,
            '\r' => w.write_str("\\r")?,
            '\t' => w.write_str("\\t")?,
            '\\' => w.write_str("\\\\")?,
            '"' => w.write_str("\\\"")?,
            c => w.write_char(c)?,
        }
    }
    w.write_char('"')
}

fn write_hex<W: Write>(w: &mut W, bytes: &[u8]) -> fmt::Result {
    w.write_str("h'")?;
    for &b in bytes {
        w.write_char(char::from(HEX[usize::from(b >> 4)]))?;
        w.write_char(char::from(HEX[usize::from(b & 0x0f)]))?;
    }
    w.write_char('\'')
}

/// Write `v` in diagnostic notation.
pub(crate) fn write_value<W: Write>(w: &mut W, v: ValueRef<'_>) -> fmt::Result {
    match v.major() {
        MajorType::Unsigned => write!(w, "{}", v.raw_int()),
        MajorType::Negative => write!(w, "{}", -1 - i128::from(v.raw_int())),
        MajorType::Bytes => write_hex(w, v.string_bytes()),
        MajorType::Text => match v.as_text() {
            Some(s) => write_text(w, s),
            None => Err(fmt::Error),
        },
        MajorType::Array => {
            w.write_char('[')?;
            for (i, item) in v.items().iter().enumerate() {
                if i > 0 {
                    w.write_str(", ")?;
                }
                write_value(w, item)?;
            }
            w.write_char(']')
        }
        MajorType::Map => {
            w.write_char('{')?;
            for (i, item) in v.items().iter().enumerate() {
                match i {
                    0 => {}
                    _ if i % 2 == 1 => w.write_str(": ")?,
                    _ => w.write_str(", ")?,
                }
                write_value(w, item)?;
            }
            w.write_char('}')
        }
        MajorType::Tag => {
            let tag = v.tag_ref();
            write!(w, "{}(", tag.tag())?;
            write_value(w, tag.value())?;
            w.write_char(')')
        }
        MajorType::FloatOrSimple => match v.scalar() {
            Scalar::Float(f) => write_float(w, f),
            Scalar::Simple(SIMPLE_FALSE) => w.write_str("false"),
            Scalar::Simple(SIMPLE_TRUE) => w.write_str("true"),
            Scalar::Simple(SIMPLE_NULL) => w.write_str("null"),
            Scalar::Simple(SIMPLE_UNDEFINED) => w.write_str("undefined"),
            Scalar::Simple(code) => write!(w, "simple({code})"),
        },
    }
}
