//! ARDP frame decoding
//!
//! ## Purpose
//!
//! On datagram transport every buffer opens with an ARDP segment header:
//! a fixed big-endian prefix (flags, header length, ports, data length,
//! sequence numbers) followed by one of two shape-specific tails. The
//! header length byte counts 2-byte words and doubles as the recognizer:
//! a SYN header must be exactly 28 bytes, anything else at least 34, and a
//! buffer that fails this shape test is simply not ARDP traffic.
//!
//! The prefix is cast zero-copy from the wire; the network byte order is
//! part of the field types, so a misread endianness is unrepresentable.

use tracing::trace;
use types::{
    ArdpDetail, ArdpFlags, ArdpHeader, Endianness, ARDP_DATA_HEADER_LEN, ARDP_FIXED_PREFIX_LEN,
    ARDP_SYN_HEADER_LEN,
};
use zerocopy::byteorder::{BigEndian, U16, U32};
use zerocopy::{FromBytes, FromZeroes, Ref, Unaligned};

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, DecodeResult};

/// Wire layout of the prefix common to every ARDP segment.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, FromZeroes, Unaligned)]
struct RawPrefix {
    flags: u8,
    /// Header length in 2-byte words.
    header_words: u8,
    src_port: U16<BigEndian>,
    dst_port: U16<BigEndian>,
    data_len: U16<BigEndian>,
    seq: U32<BigEndian>,
    ack: U32<BigEndian>,
}

/// Decode one ARDP header at `offset`.
///
/// Returns the header and the offset of the payload behind it. Failure
/// modes are kept distinct on purpose:
/// - a shape mismatch is `NotThisProtocol` — the recognizer's silent miss;
/// - a recognized shape cut short is `OutOfRange` — the caller turns it
///   into a request for the missing bytes, since a partial ARDP header is
///   never reported as decoded.
pub fn decode_frame(cursor: &ByteCursor<'_>, offset: usize) -> DecodeResult<(ArdpHeader, usize)> {
    if cursor.captured_remaining(offset) < 2 {
        return Err(DecodeError::not_this_protocol(
            "fewer than two bytes, cannot recognize an ARDP header",
        ));
    }
    let flags = ArdpFlags::from_bits(cursor.u8_at(offset)?);
    let header_len = cursor.u8_at(offset + 1)? as usize * 2;
    if flags.syn() {
        if header_len != ARDP_SYN_HEADER_LEN {
            return Err(DecodeError::not_this_protocol(format!(
                "SYN header length {header_len}, expected {ARDP_SYN_HEADER_LEN}"
            )));
        }
    } else if header_len < ARDP_DATA_HEADER_LEN {
        return Err(DecodeError::not_this_protocol(format!(
            "header length {header_len}, expected at least {ARDP_DATA_HEADER_LEN}"
        )));
    }

    // Shape recognized; from here on truncation means "bytes missing", and
    // the whole header must be present before anything is reported.
    let header_bytes = cursor.bytes_at(offset, header_len)?;
    let prefix = Ref::<_, RawPrefix>::new(&header_bytes[..ARDP_FIXED_PREFIX_LEN])
        .ok_or_else(|| {
            DecodeError::out_of_range(offset, offset + ARDP_FIXED_PREFIX_LEN, cursor.captured_len())
        })?
        .into_ref();

    let ext = offset + ARDP_FIXED_PREFIX_LEN;
    let detail = if flags.syn() {
        ArdpDetail::Syn {
            seg_max: cursor.u16_at(ext, Endianness::Big)?,
            seg_buf_max: cursor.u16_at(ext + 2, Endianness::Big)?,
            delayed_ack_timeout: cursor.u32_at(ext + 4, Endianness::Big)?,
            options: cursor.u16_at(ext + 8, Endianness::Big)?,
        }
    } else {
        let eack_len = header_len - ARDP_DATA_HEADER_LEN;
        let eack = if flags.eak() && eack_len > 0 {
            Some(cursor.bytes_at(ext + 18, eack_len)?.to_vec())
        } else {
            None
        };
        ArdpDetail::Data {
            ttl: cursor.u32_at(ext, Endianness::Big)?,
            last_consumed_seq: cursor.u32_at(ext + 4, Endianness::Big)?,
            next_seq_to_ack: cursor.u32_at(ext + 8, Endianness::Big)?,
            fragment_start_seq: cursor.u32_at(ext + 12, Endianness::Big)?,
            fragment_count: cursor.u16_at(ext + 16, Endianness::Big)?,
            eack,
        }
    };

    let header = ArdpHeader {
        flags,
        header_len,
        src_port: prefix.src_port.get(),
        dst_port: prefix.dst_port.get(),
        data_len: prefix.data_len.get(),
        seq: prefix.seq.get(),
        ack: prefix.ack.get(),
        detail,
    };
    trace!(?header.flags, header.seq, header.data_len, "ardp header");
    // Reserved bytes between the last defined field and header_len are
    // skipped; the payload starts where the header says it does.
    Ok((header, offset + header_len))
}
