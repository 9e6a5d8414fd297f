use crate::{CborError, ErrorCode};

pub(crate) const BREAK: u8 = 0xff;
pub(crate) const AI_INDEFINITE: u8 = 31;

/// Forward-only reader over CBOR wire bytes.
pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    pub(crate) const fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        self.pos == self.data.len()
    }

    #[inline]
    pub(crate) fn peek_u8(&self) -> Result<u8, CborError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or_else(|| CborError::new(ErrorCode::UnexpectedEof, self.pos))
    }

    #[inline]
    pub(crate) fn read_u8(&mut self) -> Result<u8, CborError> {
        let b = self.peek_u8()?;
        self.pos += 1;
        Ok(b)
    }

    pub(crate) fn read_exact(&mut self, n: usize) -> Result<&'a [u8], CborError> {
        let off = self.pos;
        let end = off
            .checked_add(n)
            .ok_or_else(|| CborError::new(ErrorCode::LengthOverflow, off))?;
        if end > self.data.len() {
            return Err(CborError::new(ErrorCode::UnexpectedEof, off));
        }
        self.pos = end;
        Ok(&self.data[off..end])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CborError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_exact(N)?);
        Ok(out)
    }

    pub(crate) fn read_be_u16(&mut self) -> Result<u16, CborError> {
        self.read_array().map(u16::from_be_bytes)
    }

    pub(crate) fn read_be_u32(&mut self) -> Result<u32, CborError> {
        self.read_array().map(u32::from_be_bytes)
    }

    pub(crate) fn read_be_u64(&mut self) -> Result<u64, CborError> {
        self.read_array().map(u64::from_be_bytes)
    }

    /// Read the argument for additional info `ai` (`0..=27`).
    ///
    /// Non-minimal widths are accepted; `off` is the offset of the initial byte.
    pub(crate) fn read_uint(&mut self, ai: u8, off: usize) -> Result<u64, CborError> {
        match ai {
            0..=23 => Ok(u64::from(ai)),
            24 => Ok(u64::from(self.read_u8()?)),
            25 => Ok(u64::from(self.read_be_u16()?)),
            26 => Ok(u64::from(self.read_be_u32()?)),
            27 => self.read_be_u64(),
            AI_INDEFINITE => Err(CborError::new(ErrorCode::IndefiniteLengthForbidden, off)),
            _ => Err(CborError::new(ErrorCode::ReservedAdditionalInfo, off)),
        }
    }

    /// Read a declared string length or item count and check it against the remaining input.
    ///
    /// Every item takes at least `min_unit` bytes of input, so a declaration that cannot possibly
    /// be satisfied fails with `MalformedLength` before anything is allocated for it.
    pub(crate) fn read_len(&mut self, ai: u8, off: usize, min_unit: usize) -> Result<usize, CborError> {
        let len = self.read_uint(ai, off)?;
        let len = len_to_usize(len, off)?;
        let needed = len
            .checked_mul(min_unit)
            .ok_or_else(|| CborError::new(ErrorCode::MalformedLength, off))?;
        if needed > self.remaining() {
            return Err(CborError::new(ErrorCode::MalformedLength, off));
        }
        Ok(len)
    }
}

pub(crate) fn len_to_usize(len: u64, off: usize) -> Result<usize, CborError> {
    usize::try_from(len).map_err(|_| CborError::new(ErrorCode::MalformedLength, off))
}
