//! # Buswire Protocol Codec
//!
//! ## Purpose
//!
//! Decoding rules for the Buswire bus-message protocol: a self-describing,
//! length-and-signature-driven binary format carried either directly over a
//! reliable byte stream (preceded by a connect byte and a SASL handshake)
//! or inside ARDP reliable-datagram framing. Given an untrusted buffer the
//! decoder produces typed records, a precise request for more bytes, or a
//! deterministic malformed outcome — never an out-of-bounds read, an
//! infinite loop, or unbounded recursion.
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types  →  [codec]  →  callers
//!     ↑            ↓             ↓
//! Pure Data   Decoding Rules   Rendering, reassembly,
//! Structures  Bounds/Limits    malformed reporting
//! ```
//!
//! This crate contains no I/O and no buffering: "need more data" is a
//! return value, and the cross-call reassembly loop belongs to the caller.
//!
//! ## What This Crate Contains
//! - Bounds-checked byte access over partially captured buffers (`cursor`)
//! - Field-relative alignment arithmetic (`align`)
//! - Signature cursors with per-branch copy semantics (`signature`)
//! - The recursive typed-argument decoder (`argument`)
//! - Fixed header and header-field decoding (`header`), body decoding
//!   (`body`)
//! - SASL handshake recognition (`sasl`) and ARDP frame decoding (`ardp`)
//! - The per-buffer orchestrator and outcome types (`orchestrator`)
//!
//! ## What This Crate Does NOT Contain
//! - Transport sockets or reassembly buffers (callers own delivery)
//! - Rendering of decoded trees (presentation layers own display)
//! - Message construction (this is a decoder; the test suite carries a
//!   reference encoder for round-trips)

pub mod align;
pub mod ardp;
pub mod argument;
pub mod body;
pub mod cursor;
pub mod error;
pub mod header;
pub mod orchestrator;
pub mod sasl;
pub mod signature;

// Re-export the decoding surface most callers need.
pub use cursor::{Buffer, ByteCursor};
pub use error::{DecodeError, DecodeResult};
pub use orchestrator::{
    decode_buffer, decode_message_at, AdditionalBytes, DecodeOutcome, DecodeReport, Transport,
};
pub use signature::SignatureCursor;
