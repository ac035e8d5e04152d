//! Wire-protocol data model
//!
//! Submodules mirror the layers of the wire format: the message itself
//! (`message`, `argument`), the datagram framing that may precede it
//! (`ardp`), the stream handshake (`sasl`), and the per-buffer decode
//! records (`record`).

pub mod ardp;
pub mod argument;
pub mod constants;
pub mod message;
pub mod record;
pub mod sasl;
