//! Decoded message model: fixed header, header fields, typed body.

pub mod field;
pub mod header;

use serde::{Deserialize, Serialize};

use crate::protocol::argument::Argument;
use field::HeaderField;
use header::MessageHeader;

/// One fully decoded bus message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub header: MessageHeader,
    pub fields: Vec<HeaderField>,
    pub body: Vec<Argument>,
}

impl BusMessage {
    /// First field with the given code, if present.
    pub fn field(&self, code: field::FieldCode) -> Option<&HeaderField> {
        self.fields.iter().find(|f| f.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::message::field::FieldCode;
    use crate::protocol::message::header::{Endianness, MessageFlags, MessageKind};

    #[test]
    fn message_serializes_for_presentation_layers() {
        let msg = BusMessage {
            header: MessageHeader {
                endianness: Endianness::Little,
                kind: MessageKind::Signal,
                flags: MessageFlags::from_bits(0),
                major_version: 1,
                body_len: 0,
                serial: 7,
                fields_len: 0,
            },
            fields: vec![HeaderField::new(
                FieldCode::Member,
                Argument::String("Ping".into()),
            )],
            body: vec![],
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: BusMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
        assert_eq!(msg.field(FieldCode::Member).unwrap().value.as_str(), Some("Ping"));
    }
}
