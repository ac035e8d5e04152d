//! # Buswire Types Library
//!
//! Pure data structures for the Buswire bus-message decoder: the decoded
//! message model (header, header fields, typed argument trees), the ARDP
//! datagram-framing model, the SASL handshake vocabulary, and the wire
//! constants shared by every decoder stage.
//!
//! ## Design Philosophy
//!
//! - **No parsing logic**: everything here is the *result* of decoding.
//!   The decoding rules live in the `codec` crate; this split keeps the
//!   data model dependency-light and usable by presentation layers that
//!   never touch raw bytes.
//! - **Owned trees**: a decoded [`Argument`] owns its strings and children.
//!   Decoding is done once per buffer; consumers walk the tree freely with
//!   no lifetime ties back to the network buffer.
//! - **Wire enums stay honest**: values harvested from untrusted bytes go
//!   through `num_enum` conversions. Unknown message kinds and header field
//!   codes map to an explicit `Invalid` variant instead of failing, because
//!   the wire reserves room for codes this decoder does not know yet.
//!
//! ## Quick Start
//!
//! ```rust
//! use types::{Argument, FieldCode, MessageKind};
//!
//! let arg = Argument::Struct(vec![Argument::UInt32(7), Argument::String("hi".into())]);
//! assert_eq!(arg.type_code(), types::TypeCode::StructBegin);
//! assert_eq!(MessageKind::from(4u8), MessageKind::Signal);
//! assert_eq!(FieldCode::from(250u8), FieldCode::Invalid);
//! ```

pub mod protocol;

// Re-export the protocol model at the crate root; every consumer wants these.
pub use protocol::ardp::{ArdpDetail, ArdpFlags, ArdpHeader};
pub use protocol::argument::{Argument, TypeCode};
pub use protocol::constants::*;
pub use protocol::message::field::{FieldCode, HeaderField};
pub use protocol::message::header::{Endianness, MessageFlags, MessageHeader, MessageKind};
pub use protocol::message::BusMessage;
pub use protocol::record::Record;
pub use protocol::sasl::{SaslCommand, SaslLine};
