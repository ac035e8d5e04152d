//! Message header model
//!
//! The fixed 16-byte header is identical for all messages and carries the
//! byte order, message kind, routing flags, and the two lengths (header
//! fields, body) that drive frame completeness checks downstream.

use num_enum::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::protocol::constants::FIXED_HEADER_LEN;

/// Byte order of the multi-byte integers in one message.
///
/// Chosen per message by the sender and announced in the first header byte
/// (`'l'` or `'B'`); every integer after that byte is read accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endianness {
    Little,
    Big,
}

/// Message kind from header byte 1.
///
/// Unknown kinds decode as `Invalid` rather than failing: the field is
/// informational and a structurally valid message with a kind this decoder
/// does not know is still worth decoding.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, Serialize, Deserialize)]
pub enum MessageKind {
    #[num_enum(default)]
    Invalid = 0,
    MethodCall = 1,
    MethodReply = 2,
    ErrorReply = 3,
    Signal = 4,
}

/// Routing and delivery flags from header byte 2.
///
/// Stored as the raw bitset; unknown bits are preserved so a re-encoder or
/// reporter can surface them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MessageFlags(u8);

impl MessageFlags {
    pub const NO_REPLY_EXPECTED: u8 = 0x01;
    pub const NO_AUTO_START: u8 = 0x02;
    pub const ALLOW_REMOTE_MSG: u8 = 0x04;
    pub const SESSIONLESS: u8 = 0x10;
    pub const GLOBAL_BROADCAST: u8 = 0x20;
    pub const COMPRESSED: u8 = 0x40;
    pub const ENCRYPTED: u8 = 0x80;

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, mask: u8) -> bool {
        self.0 & mask != 0
    }

    pub fn no_reply_expected(&self) -> bool {
        self.contains(Self::NO_REPLY_EXPECTED)
    }

    pub fn sessionless(&self) -> bool {
        self.contains(Self::SESSIONLESS)
    }

    pub fn compressed(&self) -> bool {
        self.contains(Self::COMPRESSED)
    }

    pub fn encrypted(&self) -> bool {
        self.contains(Self::ENCRYPTED)
    }
}

impl fmt::Debug for MessageFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(u8, &str); 7] = [
            (MessageFlags::NO_REPLY_EXPECTED, "NO_REPLY_EXPECTED"),
            (MessageFlags::NO_AUTO_START, "NO_AUTO_START"),
            (MessageFlags::ALLOW_REMOTE_MSG, "ALLOW_REMOTE_MSG"),
            (MessageFlags::SESSIONLESS, "SESSIONLESS"),
            (MessageFlags::GLOBAL_BROADCAST, "GLOBAL_BROADCAST"),
            (MessageFlags::COMPRESSED, "COMPRESSED"),
            (MessageFlags::ENCRYPTED, "ENCRYPTED"),
        ];
        let mut set = NAMES.iter().filter(|(m, _)| self.contains(*m)).peekable();
        if set.peek().is_none() {
            return write!(f, "MessageFlags(0)");
        }
        write!(f, "MessageFlags(")?;
        let mut first = true;
        for (_, name) in set {
            if !first {
                write!(f, "|")?;
            }
            write!(f, "{name}")?;
            first = false;
        }
        write!(f, ")")
    }
}

/// Decoded fixed message header.
///
/// Lengths are kept as declared on the wire; whether enough bytes actually
/// arrived to honor them is the orchestrator's frame-completeness concern,
/// not the header's.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MessageHeader {
    pub endianness: Endianness,
    pub kind: MessageKind,
    pub flags: MessageFlags,
    pub major_version: u8,
    /// Declared body length in bytes.
    pub body_len: u32,
    /// Sender-assigned correlation number. Extracted, never interpreted.
    pub serial: u32,
    /// Declared header-fields region length in bytes, before 8-alignment.
    pub fields_len: u32,
}

impl MessageHeader {
    /// Wire size of the fixed header.
    pub const SIZE: usize = FIXED_HEADER_LEN;

    /// True for kinds that answer an earlier method call.
    pub fn is_reply(&self) -> bool {
        matches!(self.kind, MessageKind::MethodReply | MessageKind::ErrorReply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_maps_to_invalid() {
        assert_eq!(MessageKind::from(9u8), MessageKind::Invalid);
        assert_eq!(MessageKind::from(2u8), MessageKind::MethodReply);
    }

    #[test]
    fn flags_debug_lists_set_bits() {
        let flags = MessageFlags::from_bits(0x41);
        let text = format!("{flags:?}");
        assert!(text.contains("NO_REPLY_EXPECTED"));
        assert!(text.contains("COMPRESSED"));
        assert!(!text.contains("ENCRYPTED"));
    }

    #[test]
    fn unknown_flag_bits_survive_round_trip() {
        let flags = MessageFlags::from_bits(0x08);
        assert_eq!(flags.bits(), 0x08);
        assert_eq!(format!("{flags:?}"), "MessageFlags(0)");
    }
}
