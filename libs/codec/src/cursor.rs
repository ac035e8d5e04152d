//! Bounds-checked byte access
//!
//! ## Purpose
//!
//! Every raw read in the decoder goes through [`ByteCursor`], which checks
//! against the *captured* length (bytes actually present) while all
//! remaining-length arithmetic uses the *reported* length (bytes the
//! transport claims the frame has). The two lengths differ exactly when a
//! capture or delivery was cut short, and keeping them separate is what
//! lets the decoder distinguish "ask for more bytes" from "the length
//! fields are lying".

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use types::Endianness;

use crate::error::{DecodeError, DecodeResult};

/// An untrusted input buffer with its two lengths.
///
/// `reported_len` is clamped up to the captured length on construction, so
/// `captured_len() <= reported_len()` holds by type, not by caller
/// discipline.
#[derive(Debug, Clone, Copy)]
pub struct Buffer<'a> {
    data: &'a [u8],
    reported_len: usize,
}

impl<'a> Buffer<'a> {
    /// Wrap a partially captured frame: `data` holds what arrived,
    /// `reported_len` what the transport claims the frame totals.
    pub fn new(data: &'a [u8], reported_len: usize) -> Self {
        Self {
            data,
            reported_len: reported_len.max(data.len()),
        }
    }

    /// Wrap a fully captured frame.
    pub fn complete(data: &'a [u8]) -> Self {
        Self::new(data, data.len())
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn captured_len(&self) -> usize {
        self.data.len()
    }

    pub fn reported_len(&self) -> usize {
        self.reported_len
    }
}

/// Read-only access to a [`Buffer`] at caller-supplied offsets.
///
/// The cursor holds no offset of its own; decoders thread offsets through
/// explicitly and the outcome types report them back. All fixed-width reads
/// return `OutOfRange` rather than ever touching `captured_len` or beyond.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    reported_len: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buffer: &Buffer<'a>) -> Self {
        Self {
            data: buffer.data,
            reported_len: buffer.reported_len,
        }
    }

    pub fn captured_len(&self) -> usize {
        self.data.len()
    }

    pub fn reported_len(&self) -> usize {
        self.reported_len
    }

    /// Bytes between `offset` and the reported frame end.
    pub fn remaining(&self, offset: usize) -> usize {
        self.reported_len.saturating_sub(offset)
    }

    /// Bytes between `offset` and the end of what was captured.
    pub fn captured_remaining(&self, offset: usize) -> usize {
        self.data.len().saturating_sub(offset)
    }

    fn check(&self, offset: usize, width: usize) -> DecodeResult<()> {
        let need = offset.saturating_add(width);
        if need > self.data.len() {
            return Err(DecodeError::out_of_range(offset, need, self.data.len()));
        }
        Ok(())
    }

    pub fn u8_at(&self, offset: usize) -> DecodeResult<u8> {
        self.check(offset, 1)?;
        Ok(self.data[offset])
    }

    pub fn u16_at(&self, offset: usize, endianness: Endianness) -> DecodeResult<u16> {
        self.check(offset, 2)?;
        let bytes = &self.data[offset..offset + 2];
        Ok(match endianness {
            Endianness::Little => LittleEndian::read_u16(bytes),
            Endianness::Big => BigEndian::read_u16(bytes),
        })
    }

    pub fn u32_at(&self, offset: usize, endianness: Endianness) -> DecodeResult<u32> {
        self.check(offset, 4)?;
        let bytes = &self.data[offset..offset + 4];
        Ok(match endianness {
            Endianness::Little => LittleEndian::read_u32(bytes),
            Endianness::Big => BigEndian::read_u32(bytes),
        })
    }

    pub fn u64_at(&self, offset: usize, endianness: Endianness) -> DecodeResult<u64> {
        self.check(offset, 8)?;
        let bytes = &self.data[offset..offset + 8];
        Ok(match endianness {
            Endianness::Little => LittleEndian::read_u64(bytes),
            Endianness::Big => BigEndian::read_u64(bytes),
        })
    }

    pub fn f64_at(&self, offset: usize, endianness: Endianness) -> DecodeResult<f64> {
        Ok(f64::from_bits(self.u64_at(offset, endianness)?))
    }

    /// Borrow `len` raw bytes at `offset`.
    pub fn bytes_at(&self, offset: usize, len: usize) -> DecodeResult<&'a [u8]> {
        self.check(offset, len)?;
        Ok(&self.data[offset..offset + len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_respect_captured_boundary() {
        let data = [0x01u8, 0x02, 0x03];
        let buf = Buffer::new(&data, 16);
        let cur = ByteCursor::new(&buf);
        assert_eq!(cur.u8_at(2).unwrap(), 0x03);
        assert!(matches!(
            cur.u8_at(3),
            Err(DecodeError::OutOfRange { need: 4, .. })
        ));
        assert!(cur.u16_at(2, Endianness::Little).is_err());
    }

    #[test]
    fn remaining_uses_reported_captured_remaining_uses_captured() {
        let data = [0u8; 4];
        let buf = Buffer::new(&data, 10);
        let cur = ByteCursor::new(&buf);
        assert_eq!(cur.remaining(1), 9);
        assert_eq!(cur.captured_remaining(1), 3);
        assert_eq!(cur.remaining(12), 0);
    }

    #[test]
    fn endianness_selects_byte_order() {
        let data = [0x01u8, 0x02, 0x03, 0x04];
        let buf = Buffer::complete(&data);
        let cur = ByteCursor::new(&buf);
        assert_eq!(cur.u32_at(0, Endianness::Little).unwrap(), 0x0403_0201);
        assert_eq!(cur.u32_at(0, Endianness::Big).unwrap(), 0x0102_0304);
    }

    #[test]
    fn reported_len_never_below_captured() {
        let data = [0u8; 8];
        let buf = Buffer::new(&data, 3);
        assert_eq!(buf.reported_len(), 8);
    }
}
