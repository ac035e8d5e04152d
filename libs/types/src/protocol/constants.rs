//! Protocol constants
//!
//! These values are part of the wire format or of the decoder's hardening
//! contract and MUST remain consistent across implementations. Tightening
//! any limit changes which adversarial inputs are rejected.

/// Size of the fixed message header in bytes.
///
/// Layout: endianness byte @0, message kind @1, flags @2, major version @3,
/// body length u32 @4, serial u32 @8, header-fields length u32 @12.
pub const FIXED_HEADER_LEN: usize = 16;

/// Maximum declared byte length of a single array body.
///
/// Arrays above this limit are rejected as malformed before any element is
/// decoded, bounding the memory a hostile length field can demand.
pub const MAX_ARRAY_LEN: usize = 131_072;

/// Ceiling on container nesting (arrays, structs, dict entries, variants).
///
/// Recursion past this depth is rejected as malformed rather than risking
/// stack exhaustion on adversarial signatures.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Search window for the `\n` terminating a SASL line, beyond the command
/// keyword itself.
pub const SASL_LINE_WINDOW: usize = 256;

/// Endianness marker bytes accepted at offset 0 of a message header.
pub const LITTLE_ENDIAN_BYTE: u8 = b'l';
pub const BIG_ENDIAN_BYTE: u8 = b'B';

/// ARDP header length, in bytes, required when the SYN flag is set.
pub const ARDP_SYN_HEADER_LEN: usize = 28;

/// Minimum ARDP header length, in bytes, for non-SYN segments.
pub const ARDP_DATA_HEADER_LEN: usize = 34;

/// Bytes in the ARDP prefix common to every segment shape
/// (flags, header length, ports, data length, sequence, ack).
pub const ARDP_FIXED_PREFIX_LEN: usize = 16;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_prefix_fits_both_ardp_shapes() {
        assert!(ARDP_FIXED_PREFIX_LEN < ARDP_SYN_HEADER_LEN);
        assert!(ARDP_SYN_HEADER_LEN < ARDP_DATA_HEADER_LEN);
    }
}
