//! Decode errors for bus message processing
//!
//! Every way an untrusted buffer can defeat the decoder has a named variant
//! with enough context (offsets, sizes, expected/actual) to report the
//! failure without re-parsing. Constructor helpers attach a short diagnosis
//! where the raw numbers alone would leave the reporter guessing.

use serde::Serialize;
use thiserror::Error;

/// Decode failure taxonomy.
///
/// Two variants are signals rather than failures and never surface in a
/// decode report: `OutOfRange` is a cursor-level condition that callers
/// upgrade by context (more bytes needed, or lengths proven inconsistent),
/// and `NotThisProtocol` is a recognizer miss that means "try the next
/// recognizer", not "reject the buffer".
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum DecodeError {
    /// A raw read would touch bytes beyond the captured length.
    #[error("read out of range: need bytes through offset {need}, captured {captured} (read at offset {offset})")]
    OutOfRange {
        offset: usize,
        /// Absolute end offset the read requires.
        need: usize,
        captured: usize,
    },

    /// The endianness marker byte is neither `'l'` nor `'B'`.
    #[error("bad endianness byte {byte:#04x} at offset {offset} (indicates: {diagnosis})")]
    BadEndianness {
        byte: u8,
        offset: usize,
        diagnosis: String,
    },

    /// Declared lengths require more bytes than the buffer holds.
    #[error("truncated: need bytes through offset {need}, have {have} (at offset {offset})")]
    Truncated {
        offset: usize,
        need: usize,
        have: usize,
    },

    /// Array length field fails its bounds checks.
    #[error("bad array length {len} at offset {offset}: limit {limit} ({diagnosis})")]
    BadArrayLength {
        len: usize,
        offset: usize,
        limit: usize,
        diagnosis: String,
    },

    /// String or object-path length field exceeds the remaining buffer.
    #[error("bad string length {len} at offset {offset}: only {remaining} bytes remain")]
    BadStringLength {
        len: usize,
        offset: usize,
        remaining: usize,
    },

    /// Embedded signature length exceeds the remaining buffer.
    #[error("bad signature length {len} at offset {offset}: only {remaining} bytes remain")]
    BadSignatureLength {
        len: usize,
        offset: usize,
        remaining: usize,
    },

    /// A container decode needed signature bytes that are not there.
    #[error("missing signature at offset {offset}: {context}")]
    MissingSignature { offset: usize, context: String },

    /// An argument decoded to zero bytes. Loop prevention: the caller must
    /// treat the entire remaining buffer as consumed.
    #[error("argument at offset {offset} consumed no bytes; stopping")]
    EmptyArgument { offset: usize },

    /// A signature byte outside the type registry.
    #[error("unknown type code {code:#04x} ({printable}) at offset {offset}")]
    UnknownType {
        code: u8,
        printable: char,
        offset: usize,
    },

    /// Container nesting exceeded the recursion ceiling.
    #[error("container nesting exceeds {limit} levels at offset {offset}")]
    TooDeep { offset: usize, limit: usize },

    /// Recognizer mismatch; silent "try something else" signal.
    #[error("not this protocol: {context}")]
    NotThisProtocol { context: String },
}

impl DecodeError {
    pub fn out_of_range(offset: usize, need: usize, captured: usize) -> Self {
        Self::OutOfRange {
            offset,
            need,
            captured,
        }
    }

    /// Create a BadEndianness error with a diagnosis of the stray byte.
    pub fn bad_endianness(byte: u8, offset: usize) -> Self {
        let diagnosis = match byte {
            0x00 => "uninitialized or zero-filled buffer",
            b if b.is_ascii_uppercase() || b.is_ascii_lowercase() => {
                "text where a message should start - handshake leftovers or mid-stream desync"
            }
            _ => "data corruption or a non-message payload",
        };
        Self::BadEndianness {
            byte,
            offset,
            diagnosis: diagnosis.to_string(),
        }
    }

    pub fn truncated(offset: usize, need: usize, have: usize) -> Self {
        Self::Truncated { offset, need, have }
    }

    /// Create a BadArrayLength error with a diagnosis of the length field.
    pub fn bad_array_length(len: usize, offset: usize, limit: usize) -> Self {
        let diagnosis = if len > limit * 8 {
            "likely corrupted length field"
        } else {
            "exceeds the protocol array limit"
        };
        Self::BadArrayLength {
            len,
            offset,
            limit,
            diagnosis: diagnosis.to_string(),
        }
    }

    pub fn bad_string_length(len: usize, offset: usize, remaining: usize) -> Self {
        Self::BadStringLength {
            len,
            offset,
            remaining,
        }
    }

    pub fn bad_signature_length(len: usize, offset: usize, remaining: usize) -> Self {
        Self::BadSignatureLength {
            len,
            offset,
            remaining,
        }
    }

    pub fn missing_signature(offset: usize, context: impl Into<String>) -> Self {
        Self::MissingSignature {
            offset,
            context: context.into(),
        }
    }

    pub fn unknown_type(code: u8, offset: usize) -> Self {
        let printable = if code.is_ascii_graphic() {
            code as char
        } else {
            '?'
        };
        Self::UnknownType {
            code,
            printable,
            offset,
        }
    }

    pub fn not_this_protocol(context: impl Into<String>) -> Self {
        Self::NotThisProtocol {
            context: context.into(),
        }
    }

    /// Upgrade a cursor-level `OutOfRange` into `Truncated`.
    ///
    /// Used once the frame-completeness check has passed: any read that
    /// still lands past the captured bytes proves the declared lengths are
    /// inconsistent, which is a malformed buffer, not a short one.
    pub fn into_truncated(self) -> Self {
        match self {
            Self::OutOfRange {
                offset,
                need,
                captured,
            } => Self::Truncated {
                offset,
                need,
                have: captured,
            },
            other => other,
        }
    }

    /// True for the silent recognizer-miss signal.
    pub fn is_recognizer_miss(&self) -> bool {
        matches!(self, Self::NotThisProtocol { .. })
    }
}

/// Result type for decode operations.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endianness_diagnosis_distinguishes_text_from_corruption() {
        match DecodeError::bad_endianness(b'x', 3) {
            DecodeError::BadEndianness { diagnosis, .. } => {
                assert!(diagnosis.contains("text"))
            }
            _ => panic!("wrong variant"),
        }
        match DecodeError::bad_endianness(0xF7, 0) {
            DecodeError::BadEndianness { diagnosis, .. } => {
                assert!(diagnosis.contains("corruption"))
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn out_of_range_upgrades_to_truncated() {
        let err = DecodeError::out_of_range(10, 14, 12).into_truncated();
        assert_eq!(err, DecodeError::truncated(10, 14, 12));
        // Non-range errors pass through untouched.
        let err = DecodeError::bad_string_length(5, 0, 2).into_truncated();
        assert!(matches!(err, DecodeError::BadStringLength { .. }));
    }
}
