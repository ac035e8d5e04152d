//! Header field model
//!
//! After the fixed header comes a variable-length list of header fields:
//! object path, interface, member, signature, and friends. Each field is a
//! `(code, value)` pair where the value is a full typed argument.

use num_enum::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::protocol::argument::Argument;

/// Header field codes.
///
/// Unknown codes map to `Invalid`; the field's value is still decoded so
/// the entry padding arithmetic stays in sync.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, Serialize, Deserialize)]
pub enum FieldCode {
    #[num_enum(default)]
    Invalid = 0,
    ObjectPath = 1,
    Interface = 2,
    Member = 3,
    ErrorName = 4,
    ReplySerial = 5,
    Destination = 6,
    Sender = 7,
    Signature = 8,
    Handles = 9,
    Timestamp = 10,
    TimeToLive = 11,
    CompressionToken = 12,
    SessionId = 13,
}

/// One decoded header field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderField {
    pub code: FieldCode,
    pub value: Argument,
}

impl HeaderField {
    pub fn new(code: FieldCode, value: Argument) -> Self {
        Self { code, value }
    }
}
