//! Recursive argument decoding
//!
//! ## Purpose
//!
//! Decodes one typed value — scalar or container — at an offset, driven by
//! a signature cursor. This is the heart of the codec and the part with the
//! sharpest edges: variable-length nested containers, alignment padding
//! relative to the enclosing field, length fields that may lie, and
//! signatures crafted to recurse forever. Three guards keep it total on
//! adversarial input:
//!
//! - every raw read is bounds-checked by [`ByteCursor`](crate::cursor::ByteCursor);
//! - container recursion carries an explicit depth counter with a hard
//!   ceiling ([`MAX_NESTING_DEPTH`]);
//! - a value that decodes to zero bytes is an error (`EmptyArgument`), and
//!   the contract obliges callers to stop parsing the buffer entirely.
//!
//! Signature-cursor discipline: arrays harvest their element type once via
//! `split_one_type` and hand each element a fresh *copy*; struct and dict
//! members share one `&mut` cursor so each member consumes exactly its own
//! prefix; a variant's inner type comes from the wire, not from the caller's
//! signature, and is decoded with its own local cursor.

use tracing::trace;
use types::{Argument, Endianness, TypeCode, MAX_ARRAY_LEN, MAX_NESTING_DEPTH};

use crate::align::round_up;
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeResult};
use crate::signature::SignatureCursor;

/// Decode one value of type `code` at `offset`.
///
/// `code` has already been consumed from `sig`; for containers, `sig` holds
/// the rest of the container description. Returns the value and the offset
/// one past it. Callers that loop over this function must enforce the
/// zero-progress rule: `new_offset == offset` is `EmptyArgument` and the
/// remaining buffer must not be parsed further.
pub fn decode_argument(
    cursor: &ByteCursor<'_>,
    endianness: Endianness,
    offset: usize,
    field_start: usize,
    sig: &mut SignatureCursor<'_>,
    code: TypeCode,
    depth: usize,
) -> DecodeResult<(Argument, usize)> {
    let (argument, new_offset) =
        dispatch_argument(cursor, endianness, offset, field_start, sig, code, depth)?;
    if new_offset == offset {
        return Err(DecodeError::EmptyArgument { offset });
    }
    Ok((argument, new_offset))
}

fn dispatch_argument(
    cursor: &ByteCursor<'_>,
    endianness: Endianness,
    offset: usize,
    field_start: usize,
    sig: &mut SignatureCursor<'_>,
    code: TypeCode,
    depth: usize,
) -> DecodeResult<(Argument, usize)> {
    let max = cursor.reported_len();
    match code {
        TypeCode::Byte => {
            let v = cursor.u8_at(offset)?;
            Ok((Argument::Byte(v), offset + 1))
        }
        TypeCode::Boolean => {
            let off = round_up(offset, field_start, 4, max);
            let v = cursor.u32_at(off, endianness)?;
            Ok((Argument::Bool(v != 0), off + 4))
        }
        TypeCode::Int16 => {
            let off = round_up(offset, field_start, 2, max);
            let v = cursor.u16_at(off, endianness)? as i16;
            Ok((Argument::Int16(v), off + 2))
        }
        TypeCode::UInt16 => {
            let off = round_up(offset, field_start, 2, max);
            let v = cursor.u16_at(off, endianness)?;
            Ok((Argument::UInt16(v), off + 2))
        }
        TypeCode::Int32 => {
            let off = round_up(offset, field_start, 4, max);
            let v = cursor.u32_at(off, endianness)? as i32;
            Ok((Argument::Int32(v), off + 4))
        }
        TypeCode::UInt32 => {
            let off = round_up(offset, field_start, 4, max);
            let v = cursor.u32_at(off, endianness)?;
            Ok((Argument::UInt32(v), off + 4))
        }
        // Handles carry no pre-padding of their own.
        TypeCode::Handle => {
            let v = cursor.u32_at(offset, endianness)?;
            Ok((Argument::Handle(v), offset + 4))
        }
        TypeCode::Int64 => {
            let off = round_up(offset, field_start, 8, max);
            let v = cursor.u64_at(off, endianness)? as i64;
            Ok((Argument::Int64(v), off + 8))
        }
        TypeCode::UInt64 => {
            let off = round_up(offset, field_start, 8, max);
            let v = cursor.u64_at(off, endianness)?;
            Ok((Argument::UInt64(v), off + 8))
        }
        TypeCode::Double => {
            let off = round_up(offset, field_start, 8, max);
            let v = cursor.f64_at(off, endianness)?;
            Ok((Argument::Double(v), off + 8))
        }
        TypeCode::String => {
            let (s, off) = decode_string(cursor, endianness, offset, field_start)?;
            Ok((Argument::String(s), off))
        }
        TypeCode::ObjectPath => {
            let (s, off) = decode_string(cursor, endianness, offset, field_start)?;
            Ok((Argument::ObjectPath(s), off))
        }
        TypeCode::Signature => {
            let (s, off) = decode_embedded_signature(cursor, offset)?;
            Ok((Argument::Signature(s), off))
        }
        TypeCode::Array => decode_array(cursor, endianness, offset, field_start, sig, depth),
        TypeCode::StructBegin | TypeCode::DictEntryBegin => {
            decode_struct_like(cursor, endianness, offset, field_start, sig, code, depth)
        }
        TypeCode::Variant => decode_variant(cursor, endianness, offset, field_start, depth),
        TypeCode::StructEnd | TypeCode::DictEntryEnd => Err(DecodeError::missing_signature(
            offset,
            "container close without a matching open",
        )),
    }
}

/// Length-prefixed string: 4-aligned u32 length, bytes, trailing NUL.
fn decode_string(
    cursor: &ByteCursor<'_>,
    endianness: Endianness,
    offset: usize,
    field_start: usize,
) -> DecodeResult<(String, usize)> {
    let off = round_up(offset, field_start, 4, cursor.reported_len());
    let len = cursor.u32_at(off, endianness)? as usize;
    let data_off = off + 4;
    // The declared length plus its NUL must fit in the reported remainder.
    if len.saturating_add(1) > cursor.remaining(data_off) {
        return Err(DecodeError::bad_string_length(
            len,
            off,
            cursor.remaining(data_off),
        ));
    }
    let bytes = cursor.bytes_at(data_off, len)?;
    let text = String::from_utf8_lossy(bytes).into_owned();
    Ok((text, data_off + len + 1))
}

/// Embedded signature: 1-byte length, bytes, trailing NUL. No pre-padding.
fn decode_embedded_signature(
    cursor: &ByteCursor<'_>,
    offset: usize,
) -> DecodeResult<(String, usize)> {
    let len = cursor.u8_at(offset)? as usize;
    // Length byte + signature bytes + NUL, measured from the length byte.
    if len.saturating_add(2) > cursor.remaining(offset) {
        return Err(DecodeError::bad_signature_length(
            len,
            offset,
            cursor.remaining(offset),
        ));
    }
    let bytes = cursor.bytes_at(offset + 1, len)?;
    let text = String::from_utf8_lossy(bytes).into_owned();
    Ok((text, offset + 1 + len + 1))
}

fn decode_array(
    cursor: &ByteCursor<'_>,
    endianness: Endianness,
    offset: usize,
    field_start: usize,
    sig: &mut SignatureCursor<'_>,
    depth: usize,
) -> DecodeResult<(Argument, usize)> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(DecodeError::TooDeep {
            offset,
            limit: MAX_NESTING_DEPTH,
        });
    }
    let max = cursor.reported_len();
    let len_off = round_up(offset, field_start, 4, max);
    let len = cursor.u32_at(len_off, endianness)? as usize;

    // The element type is consumed from the caller's signature exactly once,
    // whether or not any element gets decoded; this keeps the caller's
    // cursor in sync for whatever follows the array.
    let elem_sig = sig.split_one_type(len_off)?;
    let elem_head = elem_sig
        .peek()
        .ok_or_else(|| DecodeError::missing_signature(len_off, "empty array element type"))?;
    let elem_code = TypeCode::try_from(elem_head)
        .map_err(|_| DecodeError::unknown_type(elem_head, len_off))?;

    let start = round_up(len_off + 4, field_start, elem_code.alignment(), max);
    if len > MAX_ARRAY_LEN {
        return Err(DecodeError::bad_array_length(len, len_off, MAX_ARRAY_LEN));
    }
    if start.saturating_add(len) > cursor.reported_len() {
        return Err(DecodeError::BadArrayLength {
            len,
            offset: len_off,
            limit: MAX_ARRAY_LEN,
            diagnosis: "declared length runs past the end of the frame".to_string(),
        });
    }
    trace!(len, elem = %elem_sig.to_text(), "array");

    let mut elements = Vec::new();
    let mut off = start;
    while off - start < len {
        // Fresh copy of the element signature per element; a desync in one
        // element cannot leak into the next.
        let mut esig = elem_sig;
        let code_byte = esig.next_code().expect("element signature is non-empty");
        let code = TypeCode::try_from(code_byte)
            .map_err(|_| DecodeError::unknown_type(code_byte, off))?;
        let (element, new_off) =
            decode_argument(cursor, endianness, off, field_start, &mut esig, code, depth + 1)?;
        if new_off - start > len {
            // The last element must end exactly at start + len.
            return Err(DecodeError::BadArrayLength {
                len,
                offset: len_off,
                limit: MAX_ARRAY_LEN,
                diagnosis: "elements overrun the declared array length".to_string(),
            });
        }
        elements.push(element);
        off = new_off;
    }
    Ok((Argument::Array(elements), start + len))
}

fn decode_struct_like(
    cursor: &ByteCursor<'_>,
    endianness: Endianness,
    offset: usize,
    field_start: usize,
    sig: &mut SignatureCursor<'_>,
    open: TypeCode,
    depth: usize,
) -> DecodeResult<(Argument, usize)> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(DecodeError::TooDeep {
            offset,
            limit: MAX_NESTING_DEPTH,
        });
    }
    let close = if open == TypeCode::StructBegin {
        b')'
    } else {
        b'}'
    };
    let mut off = round_up(offset, field_start, 8, cursor.reported_len());
    let mut members = Vec::new();
    loop {
        match sig.peek() {
            None => {
                return Err(DecodeError::missing_signature(
                    off,
                    "signature ended inside a container",
                ))
            }
            Some(b) if b == close => {
                sig.next_code();
                break;
            }
            Some(code_byte) => {
                sig.next_code();
                let code = TypeCode::try_from(code_byte)
                    .map_err(|_| DecodeError::unknown_type(code_byte, off))?;
                let (member, new_off) =
                    decode_argument(cursor, endianness, off, field_start, sig, code, depth + 1)?;
                members.push(member);
                off = new_off;
            }
        }
    }
    if open == TypeCode::DictEntryBegin {
        if members.len() != 2 {
            return Err(DecodeError::missing_signature(
                off,
                "dict entry requires exactly a key and a value",
            ));
        }
        let value = members.pop().expect("two members");
        let key = members.pop().expect("two members");
        Ok((Argument::DictEntry(Box::new(key), Box::new(value)), off))
    } else {
        Ok((Argument::Struct(members), off))
    }
}

/// Variant: a 1-byte signature (as in [`decode_embedded_signature`]) followed
/// by exactly one value of that type. Self-describing: the outer signature
/// contributed only the `v`.
fn decode_variant(
    cursor: &ByteCursor<'_>,
    endianness: Endianness,
    offset: usize,
    field_start: usize,
    depth: usize,
) -> DecodeResult<(Argument, usize)> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(DecodeError::TooDeep {
            offset,
            limit: MAX_NESTING_DEPTH,
        });
    }
    let sig_len = cursor.u8_at(offset)? as usize;
    if sig_len.saturating_add(2) > cursor.remaining(offset) {
        return Err(DecodeError::bad_signature_length(
            sig_len,
            offset,
            cursor.remaining(offset),
        ));
    }
    let sig_bytes = cursor.bytes_at(offset + 1, sig_len)?;
    let off = offset + 1 + sig_len + 1;
    let mut inner = SignatureCursor::new(sig_bytes);
    let code_byte = inner
        .next_code()
        .ok_or_else(|| DecodeError::missing_signature(offset, "variant carries no signature"))?;
    let code =
        TypeCode::try_from(code_byte).map_err(|_| DecodeError::unknown_type(code_byte, off))?;
    trace!(sig = %String::from_utf8_lossy(sig_bytes), "variant");
    let (value, new_off) =
        decode_argument(cursor, endianness, off, field_start, &mut inner, code, depth + 1)?;
    let text = String::from_utf8_lossy(sig_bytes).into_owned();
    Ok((Argument::Variant(text, Box::new(value)), new_off))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Buffer;

    fn decode_one(data: &[u8], sig: &str, offset: usize) -> DecodeResult<(Argument, usize)> {
        let buf = Buffer::complete(data);
        let cursor = ByteCursor::new(&buf);
        let mut cur = SignatureCursor::from_str(sig);
        let code = TypeCode::try_from(cur.next_code().unwrap()).unwrap();
        decode_argument(&cursor, Endianness::Little, offset, 0, &mut cur, code, 0)
    }

    #[test]
    fn scalar_padding_is_applied() {
        // u16 at offset 1 pads to 2.
        let data = [0xFFu8, 0x00, 0x34, 0x12];
        let (arg, off) = decode_one(&data, "q", 1).unwrap();
        assert_eq!(arg, Argument::UInt16(0x1234));
        assert_eq!(off, 4);
    }

    #[test]
    fn string_with_nul() {
        let data = [2, 0, 0, 0, b'h', b'i', 0];
        let (arg, off) = decode_one(&data, "s", 0).unwrap();
        assert_eq!(arg, Argument::String("hi".into()));
        assert_eq!(off, 7);
    }

    #[test]
    fn string_length_checked_against_remainder() {
        let data = [200, 0, 0, 0, b'h', b'i', 0];
        assert!(matches!(
            decode_one(&data, "s", 0),
            Err(DecodeError::BadStringLength { len: 200, .. })
        ));
    }

    #[test]
    fn byte_array_consumes_exactly_declared_length() {
        let data = [3, 0, 0, 0, 0xAA, 0xBB, 0xCC];
        let (arg, off) = decode_one(&data, "ay", 0).unwrap();
        assert_eq!(
            arg,
            Argument::Array(vec![
                Argument::Byte(0xAA),
                Argument::Byte(0xBB),
                Argument::Byte(0xCC)
            ])
        );
        assert_eq!(off, 7);
    }

    #[test]
    fn empty_array_still_consumes_element_signature() {
        let data = [0, 0, 0, 0, 9, 9];
        let buf = Buffer::complete(&data);
        let cursor = ByteCursor::new(&buf);
        let mut sig = SignatureCursor::from_str("a(ii)u");
        let code = TypeCode::try_from(sig.next_code().unwrap()).unwrap();
        let (arg, _off) =
            decode_argument(&cursor, Endianness::Little, 0, 0, &mut sig, code, 0).unwrap();
        assert_eq!(arg, Argument::Array(vec![]));
        // The element type is gone; only the trailing `u` remains.
        assert_eq!(sig.to_text(), "u");
    }

    #[test]
    fn array_of_u16_respects_element_alignment_gaps() {
        // Length 4, then two u16 elements; the second pads relative to the
        // field start, which is offset 0 here.
        let data = [4, 0, 0, 0, 0x01, 0x00, 0x02, 0x00];
        let (arg, off) = decode_one(&data, "aq", 0).unwrap();
        assert_eq!(
            arg,
            Argument::Array(vec![Argument::UInt16(1), Argument::UInt16(2)])
        );
        assert_eq!(off, 8);
    }

    #[test]
    fn oversized_array_length_rejected() {
        let mut data = vec![0u8; 8];
        data[..4].copy_from_slice(&200_000u32.to_le_bytes());
        assert!(matches!(
            decode_one(&data, "ay", 0),
            Err(DecodeError::BadArrayLength { len: 200_000, .. })
        ));
    }

    #[test]
    fn array_length_past_frame_end_rejected() {
        let data = [100, 0, 0, 0, 1, 2, 3];
        assert!(matches!(
            decode_one(&data, "ay", 0),
            Err(DecodeError::BadArrayLength { .. })
        ));
    }

    #[test]
    fn struct_members_share_the_signature_tail() {
        // (yu): byte, pad to 4, u32.
        let data = [7, 0, 0, 0, 42, 0, 0, 0];
        let (arg, off) = decode_one(&data, "(yu)", 0).unwrap();
        assert_eq!(
            arg,
            Argument::Struct(vec![Argument::Byte(7), Argument::UInt32(42)])
        );
        assert_eq!(off, 8);
    }

    #[test]
    fn dict_entry_decodes_key_value() {
        let data = [1, 0, 0, 0, 99, 0, 0, 0];
        let (arg, _off) = decode_one(&data, "{ui}", 0).unwrap();
        assert_eq!(
            arg,
            Argument::DictEntry(
                Box::new(Argument::UInt32(1)),
                Box::new(Argument::Int32(99))
            )
        );
    }

    #[test]
    fn variant_is_self_describing() {
        let data = [1, b'u', 0, 0, 5, 0, 0, 0];
        let buf = Buffer::complete(&data);
        let cursor = ByteCursor::new(&buf);
        let mut sig = SignatureCursor::from_str("v");
        let code = TypeCode::try_from(sig.next_code().unwrap()).unwrap();
        let (arg, _off) =
            decode_argument(&cursor, Endianness::Little, 0, 0, &mut sig, code, 0).unwrap();
        match arg {
            Argument::Variant(s, inner) => {
                assert_eq!(s, "u");
                // u32 pads to 4 relative to field start 0: bytes 4..8 are
                // the padded read position after the 3-byte variant prelude.
                assert_eq!(*inner, Argument::UInt32(5));
            }
            other => panic!("expected variant, got {other:?}"),
        }
    }

    #[test]
    fn nesting_ceiling_is_enforced() {
        let mut sig = String::new();
        for _ in 0..(MAX_NESTING_DEPTH + 2) {
            sig.push('(');
        }
        sig.push('y');
        for _ in 0..(MAX_NESTING_DEPTH + 2) {
            sig.push(')');
        }
        let data = [0u8; 16];
        assert!(matches!(
            decode_one(&data, &sig, 0),
            Err(DecodeError::TooDeep { .. })
        ));
    }

    #[test]
    fn empty_struct_reports_zero_progress() {
        let data = [0u8; 8];
        assert!(matches!(
            decode_one(&data, "()", 0),
            Err(DecodeError::EmptyArgument { offset: 0 })
        ));
    }
}
