//! Wire bytes to packed document.
//!
//! The decoder walks the input strictly forward and writes each item once. Definite-length
//! containers reserve their entry table up front. The children of an indefinite-length container
//! are written in place as well; its count and entry table only exist once the break marker is
//! read, so they go to a side buffer and are spliced in ahead of the children by a single copy at
//! the end. Entry offsets are computed against the spliced layout from the start, so nesting
//! depth never multiplies the copy work.

use alloc::vec::Vec;
use core::ops::Range;

use tracing::{debug, trace};

use crate::alloc_util::try_reserve;
use crate::buffer::BufferBuilder;
use crate::builder::{begin_container, begin_string, finish_string, write_scalar, write_uint};
use crate::document::Document;
use crate::entry::{Entry, MajorType, ENTRY_SIZE};
use crate::float::{decode_half, decode_single};
use crate::scalar::Scalar;
use crate::utf8;
use crate::wire::{Cursor, AI_INDEFINITE, BREAK};
use crate::{CborError, DecodeLimits, ErrorCode};

/// Decode exactly one CBOR data item into a packed document.
pub(crate) fn decode(bytes: &[u8], limits: DecodeLimits) -> Result<Document, CborError> {
    match decode_packed(bytes, limits) {
        Ok(out) => {
            trace!(input = bytes.len(), packed = out.len(), "cbor decoded");
            Ok(Document::from_builder(out))
        }
        Err(err) => {
            debug!(offset = err.offset, code = ?err.code, "cbor decode rejected");
            Err(err)
        }
    }
}

fn decode_packed(bytes: &[u8], limits: DecodeLimits) -> Result<BufferBuilder, CborError> {
    if bytes.len() > limits.max_input_bytes {
        return Err(CborError::new(ErrorCode::InputLenLimitExceeded, 0));
    }

    let mut decoder = Decoder {
        cur: Cursor::new(bytes),
        limits,
        items_seen: 0,
        open_entries: Vec::new(),
        headers: BufferBuilder::new(),
        splices: Vec::new(),
    };
    let mut out = BufferBuilder::with_capacity(bytes.len().saturating_mul(2));
    out.reserve_zeroed(ENTRY_SIZE)?;
    let root = decoder.decode_item(&mut out, ENTRY_SIZE, 0)?;
    if !decoder.cur.is_empty() {
        return Err(CborError::new(
            ErrorCode::TrailingBytes,
            decoder.cur.position(),
        ));
    }
    out.patch_u32(0, root.bits());
    if decoder.splices.is_empty() {
        return Ok(out);
    }
    decoder.splice(&out)
}

/// Where the header of an indefinite-length container lands in the decode buffer.
struct Splice {
    at: usize,
    header: Range<usize>,
}

struct Decoder<'a> {
    cur: Cursor<'a>,
    limits: DecodeLimits,
    items_seen: usize,
    /// Child entries of every open indefinite-length container, innermost last.
    open_entries: Vec<Entry>,
    /// Count and entry table of each closed indefinite-length container.
    headers: BufferBuilder,
    /// One per indefinite-length container, in the order they were opened.
    splices: Vec<Splice>,
}

impl Decoder<'_> {
    /// Position in the final packed layout of the next byte written to `out`.
    fn pos(&self, out: &BufferBuilder) -> usize {
        out.len() + self.headers.len()
    }

    /// Interleave `out` with the pending container headers.
    ///
    /// Splices are ordered by the position of their container, which is also the order the
    /// headers appear in the packed layout; containers opened back to back share a position.
    fn splice(&self, out: &BufferBuilder) -> Result<BufferBuilder, CborError> {
        let body = out.as_bytes();
        let headers = self.headers.as_bytes();
        let mut packed = BufferBuilder::with_capacity(body.len() + headers.len());
        let mut copied = 0;
        for s in &self.splices {
            packed.append(&body[copied..s.at])?;
            packed.append(&headers[s.header.clone()])?;
            copied = s.at;
        }
        packed.append(&body[copied..])?;
        Ok(packed)
    }

    /// Step into a container or tag at nesting level `depth`.
    fn enter(&self, depth: usize, off: usize) -> Result<usize, CborError> {
        let depth = depth + 1;
        if depth > self.limits.max_depth {
            return Err(CborError::new(ErrorCode::DepthLimitExceeded, off));
        }
        Ok(depth)
    }

    fn bump_items(&mut self, add: usize, off: usize) -> Result<(), CborError> {
        self.items_seen = self
            .items_seen
            .checked_add(add)
            .ok_or_else(|| CborError::new(ErrorCode::LengthOverflow, off))?;
        if self.items_seen > self.limits.max_total_items {
            return Err(CborError::new(ErrorCode::TotalItemsLimitExceeded, off));
        }
        Ok(())
    }

    fn check_container_len(&self, major: MajorType, len: usize, off: usize) -> Result<(), CborError> {
        let (max, code) = if major == MajorType::Map {
            (self.limits.max_map_len, ErrorCode::MapLenLimitExceeded)
        } else {
            (self.limits.max_array_len, ErrorCode::ArrayLenLimitExceeded)
        };
        if len > max {
            return Err(CborError::new(code, off));
        }
        Ok(())
    }

    /// Decode one item, append its value region to `out` and return its entry.
    ///
    /// `base` is the start of the enclosing value area, as a [`Decoder::pos`].
    fn decode_item(
        &mut self,
        out: &mut BufferBuilder,
        base: usize,
        depth: usize,
    ) -> Result<Entry, CborError> {
        let off = self.cur.position();
        let ib = self.cur.read_u8()?;
        if ib == BREAK {
            return Err(CborError::new(ErrorCode::UnexpectedBreak, off));
        }
        let major = MajorType::from_bits(ib >> 5);
        let ai = ib & 0x1f;

        match major {
            MajorType::Unsigned | MajorType::Negative => {
                let v = self.cur.read_uint(ai, off)?;
                write_uint(out, v)?;
            }
            MajorType::Bytes | MajorType::Text => self.decode_string(out, major, ai, off)?,
            MajorType::Array | MajorType::Map => {
                let depth = self.enter(depth, off)?;
                if ai == AI_INDEFINITE {
                    self.decode_indefinite_container(out, major, off, depth)?;
                } else {
                    self.decode_definite_container(out, major, ai, off, depth)?;
                }
            }
            MajorType::Tag => {
                let tag = self.cur.read_uint(ai, off)?;
                let depth = self.enter(depth, off)?;
                out.append_u64(tag)?;
                let slot = out.reserve_zeroed(ENTRY_SIZE)?;
                let child_base = self.pos(out);
                let child = self.decode_item(out, child_base, depth)?;
                out.patch_u32(slot, child.bits());
            }
            MajorType::FloatOrSimple => self.decode_scalar(out, ai, off)?,
        }

        Entry::new(major, self.pos(out) - base, off)
    }

    fn decode_scalar(&mut self, out: &mut BufferBuilder, ai: u8, off: usize) -> Result<(), CborError> {
        let scalar = match ai {
            0..=23 => Scalar::Simple(ai),
            24 => Scalar::Simple(self.cur.read_u8()?),
            25 => Scalar::float(decode_half(self.cur.read_be_u16()?)),
            26 => Scalar::float(decode_single(self.cur.read_be_u32()?)),
            27 => Scalar::float(f64::from_bits(self.cur.read_be_u64()?)),
            _ => return Err(CborError::new(ErrorCode::ReservedAdditionalInfo, off)),
        };
        write_scalar(out, scalar)
    }

    fn decode_string(
        &mut self,
        out: &mut BufferBuilder,
        major: MajorType,
        ai: u8,
        off: usize,
    ) -> Result<(), CborError> {
        let header_at = begin_string(out)?;
        if ai == AI_INDEFINITE {
            loop {
                let chunk_off = self.cur.position();
                let ib = self.cur.read_u8()?;
                if ib == BREAK {
                    break;
                }
                if MajorType::from_bits(ib >> 5) != major {
                    return Err(CborError::new(ErrorCode::IndefiniteChunkMismatch, chunk_off));
                }
                let chunk_ai = ib & 0x1f;
                if chunk_ai == AI_INDEFINITE {
                    return Err(CborError::new(ErrorCode::NestedIndefiniteChunk, chunk_off));
                }
                self.string_chunk(out, header_at, major, chunk_ai, chunk_off)?;
            }
        } else {
            self.string_chunk(out, header_at, major, ai, off)?;
        }
        finish_string(out, header_at, off)
    }

    /// Append one definite-length chunk to the string whose header sits at `header_at`.
    fn string_chunk(
        &mut self,
        out: &mut BufferBuilder,
        header_at: usize,
        major: MajorType,
        ai: u8,
        off: usize,
    ) -> Result<(), CborError> {
        let len = self.cur.read_len(ai, off, 1)?;
        let total = (out.len() - header_at - 4)
            .checked_add(len)
            .ok_or_else(|| CborError::new(ErrorCode::LengthOverflow, off))?;
        let (max, code) = if major == MajorType::Text {
            (self.limits.max_text_len, ErrorCode::TextLenLimitExceeded)
        } else {
            (self.limits.max_bytes_len, ErrorCode::BytesLenLimitExceeded)
        };
        if total > max {
            return Err(CborError::new(code, off));
        }

        let content_off = self.cur.position();
        let bytes = self.cur.read_exact(len)?;
        if major == MajorType::Text {
            if utf8::validate(bytes).is_none() {
                return Err(CborError::new(ErrorCode::Utf8Invalid, content_off));
            }
        }
        out.append(bytes)
    }

    fn decode_definite_container(
        &mut self,
        out: &mut BufferBuilder,
        major: MajorType,
        ai: u8,
        off: usize,
        depth: usize,
    ) -> Result<(), CborError> {
        let per_item = if major == MajorType::Map { 2 } else { 1 };
        let len = self.cur.read_len(ai, off, per_item)?;
        self.check_container_len(major, len, off)?;
        let items = len * per_item;
        self.bump_items(items, off)?;

        let table = begin_container(out, len, items, off)?;
        let values = self.pos(out);
        for index in 0..items {
            let entry = self.decode_item(out, values, depth)?;
            out.patch_entry(table, index, entry);
        }
        Ok(())
    }

    fn decode_indefinite_container(
        &mut self,
        out: &mut BufferBuilder,
        major: MajorType,
        off: usize,
        depth: usize,
    ) -> Result<(), CborError> {
        let slot = self.splices.len();
        try_reserve(&mut self.splices, 1, off)?;
        self.splices.push(Splice {
            at: out.len(),
            header: 0..0,
        });
        let values = self.pos(out);
        let mark = self.open_entries.len();
        loop {
            if self.cur.peek_u8()? == BREAK {
                self.cur.read_u8()?;
                break;
            }
            let items = self.open_entries.len() - mark + 1;
            let len = if major == MajorType::Map {
                items.div_ceil(2)
            } else {
                items
            };
            self.check_container_len(major, len, off)?;
            self.bump_items(1, off)?;

            let entry = self.decode_item(out, values, depth)?;
            let at = self.cur.position();
            try_reserve(&mut self.open_entries, 1, at)?;
            self.open_entries.push(entry);
        }

        let items = self.open_entries.len() - mark;
        let count = if major == MajorType::Map {
            if items % 2 != 0 {
                return Err(CborError::new(ErrorCode::OddMapItems, off));
            }
            items / 2
        } else {
            items
        };
        let start = self.headers.len();
        let table = begin_container(&mut self.headers, count, items, off)?;
        for (i, entry) in self.open_entries[mark..].iter().enumerate() {
            self.headers.patch_entry(table, i, *entry);
        }
        self.open_entries.truncate(mark);
        self.splices[slot].header = start..self.headers.len();
        Ok(())
    }
}
