//! Primitive reads over a session-log byte buffer: fixed-width little-endian
//! integers and Chrome's 4-byte-aligned pickled strings.

use std::io::Read;

use crate::error::SnssError;

/// A cursor over an in-memory record payload.
///
/// All widths are little-endian. Every read that can't be satisfied by the
/// remaining bytes fails with [`SnssError::TruncatedField`] rather than
/// panicking; callers decide whether that's fatal (most opcode handlers) or
/// benign (the frame splitter's own EOF detection, which looks at the raw
/// bytes directly instead of going through this type).
pub struct ByteReader<'a> {
    data: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], SnssError> {
        if self.data.len() < len {
            return Err(SnssError::TruncatedField);
        }
        let (head, tail) = self.data.split_at(len);
        self.data = tail;
        Ok(head)
    }

    pub fn u8(&mut self) -> Result<u8, SnssError> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16, SnssError> {
        let bytes: [u8; 2] = self.take(2)?.try_into().unwrap();
        Ok(u16::from_le_bytes(bytes))
    }

    pub fn u32(&mut self) -> Result<u32, SnssError> {
        let bytes: [u8; 4] = self.take(4)?.try_into().unwrap();
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn u64(&mut self) -> Result<u64, SnssError> {
        let bytes: [u8; 8] = self.take(8)?.try_into().unwrap();
        Ok(u64::from_le_bytes(bytes))
    }

    /// 4-byte-aligned pickled string: a `u32` byte length, then that many
    /// bytes of UTF-8 padded up to a multiple of 4.
    pub fn string(&mut self) -> Result<String, SnssError> {
        let len = self.u32()? as usize;
        let padded = align4(len);
        let raw = self.take(padded)?;
        let text = &raw[..len];
        String::from_utf8(text.to_vec()).map_err(|_| SnssError::TruncatedField)
    }

    /// 4-byte-aligned pickled UTF-16LE string: a `u32` unit count, then
    /// `2*N` bytes padded up to a multiple of 4.
    ///
    /// A lone surrogate can't be represented by a Rust `char` at all (the
    /// surrogate range is excluded from Unicode scalar values by
    /// definition), so `String` -- which guarantees valid UTF-8 internally
    /// -- has no lossless slot for one. We fold each into the replacement
    /// character rather than fail the whole field: a malformed titlebar
    /// string shouldn't take down an otherwise decodable record.
    pub fn string16(&mut self) -> Result<String, SnssError> {
        let units = self.u32()? as usize;
        let byte_len = units
            .checked_mul(2)
            .ok_or(SnssError::TruncatedField)?;
        let padded = align4(byte_len);
        let raw = self.take(padded)?;
        let code_units: Vec<u16> = raw[..byte_len]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        let text = char::decode_utf16(code_units)
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
        Ok(text)
    }
}

fn align4(len: usize) -> usize {
    len.div_ceil(4) * 4
}

/// Reads an exact number of bytes from an arbitrary [`Read`], translating
/// short reads into [`SnssError::Io`]. Used by the frame splitter, which
/// operates over the outer stream rather than a single record's payload.
pub(crate) fn read_exact_io<R: Read>(
    input: &mut R,
    buf: &mut [u8],
) -> Result<(), SnssError> {
    input.read_exact(buf).map_err(SnssError::Io)
}
