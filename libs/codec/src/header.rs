//! Message header decoding
//!
//! The fixed 16-byte header, then the header-fields region: a sequence of
//! `{field code, 0x01, type code, 0x00, value}` entries, each padded to an
//! 8-byte boundary relative to its own start. The signature field's decoded
//! string is threaded out for the body decoder.

use tracing::trace;
use types::{
    Endianness, FieldCode, HeaderField, MessageFlags, MessageHeader, MessageKind, TypeCode,
    BIG_ENDIAN_BYTE, LITTLE_ENDIAN_BYTE,
};

use crate::align::round_up;
use crate::argument::decode_argument;
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeResult};
use crate::signature::SignatureCursor;

/// Decode the fixed header at `offset`.
///
/// The endianness byte is validated here because nothing after it can be
/// read without it; every other field is taken as declared.
pub fn decode_fixed_header(cursor: &ByteCursor<'_>, offset: usize) -> DecodeResult<MessageHeader> {
    let endian_byte = cursor.u8_at(offset)?;
    let endianness = match endian_byte {
        LITTLE_ENDIAN_BYTE => Endianness::Little,
        BIG_ENDIAN_BYTE => Endianness::Big,
        other => return Err(DecodeError::bad_endianness(other, offset)),
    };
    let kind = MessageKind::from(cursor.u8_at(offset + 1)?);
    let flags = MessageFlags::from_bits(cursor.u8_at(offset + 2)?);
    let major_version = cursor.u8_at(offset + 3)?;
    let body_len = cursor.u32_at(offset + 4, endianness)?;
    let serial = cursor.u32_at(offset + 8, endianness)?;
    let fields_len = cursor.u32_at(offset + 12, endianness)?;
    trace!(?kind, serial, body_len, fields_len, "fixed header");
    Ok(MessageHeader {
        endianness,
        kind,
        flags,
        major_version,
        body_len,
        serial,
        fields_len,
    })
}

/// Decode the header-fields region starting at `offset`, `fields_len` bytes
/// long as declared. Returns the fields, the harvested body signature (from
/// the signature field, if present), and the offset where decoding stopped.
pub fn decode_header_fields(
    cursor: &ByteCursor<'_>,
    endianness: Endianness,
    offset: usize,
    fields_len: usize,
) -> DecodeResult<(Vec<HeaderField>, Option<String>, usize)> {
    let end = offset + fields_len;
    let mut fields = Vec::new();
    let mut body_signature = None;
    let mut off = offset;
    while off < end {
        let entry_start = off;
        let code = FieldCode::from(cursor.u8_at(off)?);
        // Entry prelude: the value's type is carried as an embedded
        // one-character signature {0x01, code, 0x00}.
        let type_byte = cursor.u8_at(off + 2)?;
        let type_code = TypeCode::try_from(type_byte)
            .map_err(|_| DecodeError::unknown_type(type_byte, off + 2))?;
        // Borrow the signature character from the buffer itself so container
        // values see a real (if single-byte) signature cursor.
        let mut sig = SignatureCursor::new(cursor.bytes_at(off + 2, 1)?);
        sig.next_code();
        let (value, value_end) = decode_argument(
            cursor,
            endianness,
            off + 4,
            entry_start,
            &mut sig,
            type_code,
            0,
        )?;
        if code == FieldCode::Signature {
            if let types::Argument::Signature(text) = &value {
                body_signature = Some(text.clone());
            }
        }
        trace!(?code, "header field");
        fields.push(HeaderField::new(code, value));
        off = round_up(value_end, entry_start, 8, cursor.reported_len());
    }
    Ok((fields, body_signature, off))
}
