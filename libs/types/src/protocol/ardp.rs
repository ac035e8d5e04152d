//! ARDP datagram-framing model
//!
//! On unreliable datagram delivery, messages ride inside ARDP segments: a
//! small big-endian header carrying connection flags, ports, and sequence
//! bookkeeping. SYN segments negotiate segment sizes; every other segment
//! carries delivery state and, optionally, a selective-ack (EACK) bitmap.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ARDP control flags. Bits 6-7 carry the protocol version.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ArdpFlags(u8);

impl ArdpFlags {
    pub const SYN: u8 = 0x01;
    pub const ACK: u8 = 0x02;
    pub const EAK: u8 = 0x04;
    pub const RST: u8 = 0x08;
    pub const NUL: u8 = 0x10;
    pub const VERSION_MASK: u8 = 0xC0;

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn syn(&self) -> bool {
        self.0 & Self::SYN != 0
    }

    pub fn ack(&self) -> bool {
        self.0 & Self::ACK != 0
    }

    pub fn eak(&self) -> bool {
        self.0 & Self::EAK != 0
    }

    pub fn rst(&self) -> bool {
        self.0 & Self::RST != 0
    }

    pub fn nul(&self) -> bool {
        self.0 & Self::NUL != 0
    }

    pub fn version(&self) -> u8 {
        (self.0 & Self::VERSION_MASK) >> 6
    }
}

impl fmt::Debug for ArdpFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(u8, &str); 5] = [
            (ArdpFlags::SYN, "SYN"),
            (ArdpFlags::ACK, "ACK"),
            (ArdpFlags::EAK, "EAK"),
            (ArdpFlags::RST, "RST"),
            (ArdpFlags::NUL, "NUL"),
        ];
        write!(f, "ArdpFlags(v{}", self.version())?;
        for (mask, name) in NAMES {
            if self.0 & mask != 0 {
                write!(f, "|{name}")?;
            }
        }
        write!(f, ")")
    }
}

/// Shape-specific tail of an ARDP header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArdpDetail {
    /// Connection setup: negotiated segment limits.
    Syn {
        seg_max: u16,
        seg_buf_max: u16,
        delayed_ack_timeout: u32,
        options: u16,
    },
    /// Established-connection bookkeeping.
    Data {
        ttl: u32,
        last_consumed_seq: u32,
        next_seq_to_ack: u32,
        fragment_start_seq: u32,
        fragment_count: u16,
        /// Selective-ack bitmap, present when EAK is set and the header
        /// length leaves room for it.
        eack: Option<Vec<u8>>,
    },
}

/// Decoded ARDP segment header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArdpHeader {
    pub flags: ArdpFlags,
    /// Header length in bytes (the wire carries it in 2-byte words).
    pub header_len: usize,
    pub src_port: u16,
    pub dst_port: u16,
    /// Payload bytes following the header.
    pub data_len: u16,
    pub seq: u32,
    pub ack: u32,
    pub detail: ArdpDetail,
}

impl ArdpHeader {
    /// Fragment index of this segment within a fragmented message, when the
    /// bookkeeping says it is not the first fragment.
    pub fn fragment_index(&self) -> Option<u32> {
        match &self.detail {
            ArdpDetail::Data {
                fragment_start_seq, ..
            } if !self.flags.syn() && self.seq > *fragment_start_seq => {
                Some(self.seq - fragment_start_seq)
            }
            _ => None,
        }
    }
}
