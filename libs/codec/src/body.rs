//! Message body decoding
//!
//! The body is a flat sequence of arguments described by the signature
//! harvested from the header fields. The orchestrator has already verified
//! that `body_len` bytes were captured before this runs, so any read
//! failure in here means the declared lengths are inconsistent.

use tracing::trace;
use types::{Argument, Endianness, TypeCode};

use crate::argument::decode_argument;
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeResult};
use crate::signature::SignatureCursor;

/// Decode the body region at `offset`, `body_len` bytes long.
///
/// Arguments decode until the signature is exhausted or the declared body
/// length is covered, whichever comes first. A body with no signature is
/// skipped whole: there is nothing to drive the decode, and an unannotated
/// body is not an error. Returns the arguments and the offset of the byte
/// after the body region.
pub fn decode_body(
    cursor: &ByteCursor<'_>,
    endianness: Endianness,
    offset: usize,
    body_len: usize,
    signature: Option<&str>,
) -> DecodeResult<(Vec<Argument>, usize)> {
    let start = offset;
    let end = offset + body_len;
    let mut arguments = Vec::new();
    let Some(signature) = signature else {
        if body_len > 0 {
            trace!(body_len, "body without signature, skipping");
        }
        return Ok((arguments, end));
    };
    let mut sig = SignatureCursor::from_str(signature);
    let mut off = offset;
    while !sig.is_empty() && off - start < body_len {
        let code_byte = sig.next_code().expect("cursor is non-empty");
        let code = TypeCode::try_from(code_byte)
            .map_err(|_| DecodeError::unknown_type(code_byte, off))?;
        let (argument, new_off) =
            decode_argument(cursor, endianness, off, start, &mut sig, code, 0)?;
        arguments.push(argument);
        off = new_off;
    }
    Ok((arguments, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Buffer;

    #[test]
    fn decodes_argument_sequence() {
        let mut data = 7u32.to_le_bytes().to_vec();
        data.extend_from_slice(&[2, 0, 0, 0, b'h', b'i', 0]);
        let buf = Buffer::complete(&data);
        let (args, end) = decode_body(
            &ByteCursor::new(&buf),
            Endianness::Little,
            0,
            data.len(),
            Some("us"),
        )
        .unwrap();
        assert_eq!(
            args,
            vec![Argument::UInt32(7), Argument::String("hi".into())]
        );
        assert_eq!(end, data.len());
    }

    #[test]
    fn missing_signature_skips_body() {
        let data = [0xAB; 12];
        let buf = Buffer::complete(&data);
        let (args, end) =
            decode_body(&ByteCursor::new(&buf), Endianness::Little, 0, 12, None).unwrap();
        assert!(args.is_empty());
        assert_eq!(end, 12);
    }

    #[test]
    fn stops_when_declared_length_is_covered() {
        // Signature promises two u32s but the body length only covers one.
        let data = 9u32.to_le_bytes();
        let buf = Buffer::complete(&data);
        let (args, end) =
            decode_body(&ByteCursor::new(&buf), Endianness::Little, 0, 4, Some("uu")).unwrap();
        assert_eq!(args, vec![Argument::UInt32(9)]);
        assert_eq!(end, 4);
    }
}
