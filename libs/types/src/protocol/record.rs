//! Per-buffer decode records
//!
//! One buffer can legally carry several things in sequence: a connect byte,
//! handshake lines, then binary messages; or an ARDP header and a message
//! fragment. Each successfully decoded unit becomes a [`Record`], emitted in
//! strictly increasing offset order.

use serde::{Deserialize, Serialize};

use crate::protocol::ardp::ArdpHeader;
use crate::protocol::message::header::MessageHeader;
use crate::protocol::message::BusMessage;
use crate::protocol::sasl::SaslLine;

/// One decoded unit from a buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Record {
    /// The 0x00 connect byte that opens a stream connection.
    Connect,
    /// A recognized SASL handshake line.
    Sasl(SaslLine),
    /// An ARDP segment header (datagram transport).
    Ardp(ArdpHeader),
    /// A complete message: header, fields, typed body.
    Message(BusMessage),
    /// Fixed header of a message whose remainder lies in later datagram
    /// fragments. Not an error: datagrams cannot request more bytes.
    PartialMessage(MessageHeader),
    /// A non-initial fragment of a message started in an earlier datagram;
    /// carries only its position within the fragmented whole.
    Fragment { index: u32, count: u16 },
}

impl Record {
    /// The complete message inside this record, if it holds one.
    pub fn as_message(&self) -> Option<&BusMessage> {
        match self {
            Record::Message(msg) => Some(msg),
            _ => None,
        }
    }
}
