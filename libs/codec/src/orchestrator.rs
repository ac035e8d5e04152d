//! Per-buffer decode orchestration
//!
//! ## Purpose
//!
//! Walks one untrusted buffer and turns it into records plus a single
//! outcome. On stream transport the walk is a small state machine —
//! connect byte, SASL lines, then messages — because a stream buffer can
//! legally carry all three in sequence. On datagram transport the ARDP
//! recognizer runs first and hands its payload to the same message
//! pipeline.
//!
//! The frame-completeness check lives here: before committing to a
//! header-fields/body decode, the declared lengths are compared against
//! what was captured. Coming up short is not an error — it is either a
//! request for more bytes (stream) or a fragmented-message report
//! (datagram, which has no way to ask).

use tracing::{debug, warn};
use types::{BusMessage, MessageHeader, Record, FIXED_HEADER_LEN};

use crate::align::round_up_8;
use crate::ardp;
use crate::body::decode_body;
use crate::cursor::{Buffer, ByteCursor};
use crate::error::DecodeError;
use crate::header::{decode_fixed_header, decode_header_fields};
use crate::sasl::{self, SaslProbe};

/// Delivery semantics of the transport a buffer arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Transport {
    /// Reliable byte stream; more bytes can be requested.
    Stream,
    /// Datagram delivery; each buffer is all there is.
    Datagram,
}

/// How many more bytes a `NeedMoreData` outcome is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum AdditionalBytes {
    /// Exactly this many bytes are missing.
    Exact(usize),
    /// One more delivery of unknown size; used for line-oriented SASL,
    /// where nothing announces the line length up front.
    OneMoreSegment,
}

/// Final status of one decode call.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum DecodeOutcome {
    /// Everything consumable was decoded into records.
    Decoded { consumed: usize },
    /// More bytes are required; re-invoke with a larger buffer starting at
    /// `resume_at`. Not an error.
    NeedMoreData {
        resume_at: usize,
        additional: AdditionalBytes,
    },
    /// Deterministic stop: the buffer is malformed from `reason` onward and
    /// the rest of it must not be parsed.
    Malformed {
        reason: DecodeError,
        consumed_to_end: usize,
    },
}

/// Records decoded from one buffer plus the outcome that ended the walk.
///
/// Records survive a malformed outcome deliberately: a reporter shows
/// whatever decoded cleanly before the failure point, annotated with the
/// reason.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DecodeReport {
    pub records: Vec<Record>,
    pub outcome: DecodeOutcome,
}

impl DecodeReport {
    /// The first complete message in this buffer, if any.
    pub fn first_message(&self) -> Option<&BusMessage> {
        self.records.iter().find_map(Record::as_message)
    }
}

/// Decode one buffer.
pub fn decode_buffer(buffer: &Buffer<'_>, transport: Transport) -> DecodeReport {
    let cursor = ByteCursor::new(buffer);
    debug!(
        captured = buffer.captured_len(),
        reported = buffer.reported_len(),
        ?transport,
        "decode buffer"
    );
    match transport {
        Transport::Stream => decode_stream(&cursor),
        Transport::Datagram => decode_datagram(&cursor),
    }
}

/// Decode a single message starting at `offset`, skipping handshake and
/// framing recognition. Entry point for callers that peeled an outer
/// framing layer themselves.
pub fn decode_message_at(buffer: &Buffer<'_>, offset: usize, transport: Transport) -> DecodeReport {
    let cursor = ByteCursor::new(buffer);
    let mut records = Vec::new();
    let outcome = message_step_outcome(
        &cursor,
        decode_message_step(&cursor, offset, transport),
        &mut records,
    );
    DecodeReport { records, outcome }
}

enum State {
    ExpectConnectByte,
    ExpectSasl,
    ExpectMessage,
}

fn decode_stream(cursor: &ByteCursor<'_>) -> DecodeReport {
    let mut records = Vec::new();
    let mut offset = 0usize;
    let mut state = State::ExpectConnectByte;
    loop {
        if cursor.captured_remaining(offset) == 0 {
            // Captured bytes are exhausted. If the transport reported more,
            // the frame is mid-delivery; otherwise the walk is complete.
            let outcome = if cursor.remaining(offset) > 0 {
                DecodeOutcome::NeedMoreData {
                    resume_at: offset,
                    additional: AdditionalBytes::Exact(cursor.remaining(offset)),
                }
            } else {
                DecodeOutcome::Decoded { consumed: offset }
            };
            return DecodeReport { records, outcome };
        }
        match state {
            State::ExpectConnectByte => {
                if sasl::is_connect_byte(cursor, offset) {
                    records.push(Record::Connect);
                    offset += 1;
                }
                state = State::ExpectSasl;
            }
            State::ExpectSasl => match sasl::probe_line(cursor, offset) {
                SaslProbe::Line(line, next) => {
                    records.push(Record::Sasl(line));
                    offset = next;
                }
                SaslProbe::NeedMoreSegment => {
                    return DecodeReport {
                        records,
                        outcome: DecodeOutcome::NeedMoreData {
                            resume_at: offset,
                            additional: AdditionalBytes::OneMoreSegment,
                        },
                    };
                }
                SaslProbe::NotHandshake => state = State::ExpectMessage,
            },
            State::ExpectMessage => {
                match decode_message_step(cursor, offset, Transport::Stream) {
                    MessageStep::Complete(message, next) => {
                        records.push(Record::Message(*message));
                        offset = next;
                    }
                    step => {
                        let outcome = message_step_outcome(cursor, step, &mut records);
                        return DecodeReport { records, outcome };
                    }
                }
            }
        }
    }
}

fn decode_datagram(cursor: &ByteCursor<'_>) -> DecodeReport {
    let mut records = Vec::new();
    match ardp::decode_frame(cursor, 0) {
        Ok((header, payload_off)) => {
            let data_len = header.data_len as usize;
            let fragment = header.fragment_index().map(|index| {
                let count = match &header.detail {
                    types::ArdpDetail::Data { fragment_count, .. } => *fragment_count,
                    types::ArdpDetail::Syn { .. } => 0,
                };
                (index, count)
            });
            records.push(Record::Ardp(header));
            if data_len == 0 {
                return DecodeReport {
                    records,
                    outcome: DecodeOutcome::Decoded {
                        consumed: payload_off,
                    },
                };
            }
            let step = decode_message_step(cursor, payload_off, Transport::Datagram);
            // A payload that is not a message start, inside a segment whose
            // bookkeeping says "not the first fragment", is a continuation
            // of an earlier message, not an error.
            if let (MessageStep::Malformed(_), Some((index, count))) = (&step, fragment) {
                debug!(index, count, "datagram payload is a message fragment");
                records.push(Record::Fragment { index, count });
                return DecodeReport {
                    records,
                    outcome: DecodeOutcome::Decoded {
                        consumed: cursor.reported_len(),
                    },
                };
            }
            let outcome = message_step_outcome(cursor, step, &mut records);
            DecodeReport { records, outcome }
        }
        Err(miss) if miss.is_recognizer_miss() => {
            // Not ARDP framing at all; try the datagram as a bare message.
            debug!(%miss, "not an ARDP frame");
            let outcome = message_step_outcome(
                cursor,
                decode_message_step(cursor, 0, Transport::Datagram),
                &mut records,
            );
            DecodeReport { records, outcome }
        }
        // A recognized ARDP shape cut short: no partial header is ever
        // reported; ask for the missing bytes from the top of the frame.
        Err(DecodeError::OutOfRange { need, .. }) => DecodeReport {
            records,
            outcome: DecodeOutcome::NeedMoreData {
                resume_at: 0,
                additional: AdditionalBytes::Exact(need - cursor.captured_len()),
            },
        },
        Err(reason) => DecodeReport {
            records,
            outcome: DecodeOutcome::Malformed {
                reason,
                consumed_to_end: cursor.reported_len(),
            },
        },
    }
}

/// One attempt to decode a message at an offset.
enum MessageStep {
    Complete(Box<BusMessage>, usize),
    /// Datagram only: the fixed header arrived but the declared remainder
    /// did not, and a datagram cannot ask for it.
    Fragmented(MessageHeader),
    NeedMore {
        resume_at: usize,
        additional: AdditionalBytes,
    },
    Malformed(DecodeError),
}

fn decode_message_step(cursor: &ByteCursor<'_>, offset: usize, transport: Transport) -> MessageStep {
    let captured = cursor.captured_remaining(offset);
    if captured < FIXED_HEADER_LEN {
        return match transport {
            Transport::Stream => MessageStep::NeedMore {
                resume_at: offset,
                additional: AdditionalBytes::Exact(FIXED_HEADER_LEN - captured),
            },
            Transport::Datagram => MessageStep::Malformed(DecodeError::truncated(
                offset,
                offset + FIXED_HEADER_LEN,
                cursor.captured_len(),
            )),
        };
    }
    let header = match decode_fixed_header(cursor, offset) {
        Ok(header) => header,
        Err(e) => return MessageStep::Malformed(e.into_truncated()),
    };

    // Frame completeness: everything the lengths declare must be captured
    // before any of it is decoded.
    let fields_len = header.fields_len as usize;
    let needed = FIXED_HEADER_LEN + round_up_8(fields_len) + header.body_len as usize;
    if captured < needed {
        return match transport {
            Transport::Stream => MessageStep::NeedMore {
                resume_at: offset,
                additional: AdditionalBytes::Exact(needed - captured),
            },
            Transport::Datagram => MessageStep::Fragmented(header),
        };
    }

    let fields_start = offset + FIXED_HEADER_LEN;
    let (fields, body_signature, _) =
        match decode_header_fields(cursor, header.endianness, fields_start, fields_len) {
            Ok(decoded) => decoded,
            Err(e) => return MessageStep::Malformed(e.into_truncated()),
        };
    let body_start = fields_start + round_up_8(fields_len);
    let body = match decode_body(
        cursor,
        header.endianness,
        body_start,
        header.body_len as usize,
        body_signature.as_deref(),
    ) {
        Ok((body, _)) => body,
        Err(e) => return MessageStep::Malformed(e.into_truncated()),
    };

    MessageStep::Complete(
        Box::new(BusMessage {
            header,
            fields,
            body,
        }),
        offset + needed,
    )
}

fn message_step_outcome(
    cursor: &ByteCursor<'_>,
    step: MessageStep,
    records: &mut Vec<Record>,
) -> DecodeOutcome {
    match step {
        MessageStep::Complete(message, next) => {
            records.push(Record::Message(*message));
            DecodeOutcome::Decoded { consumed: next }
        }
        MessageStep::Fragmented(header) => {
            records.push(Record::PartialMessage(header));
            DecodeOutcome::Decoded {
                consumed: cursor.reported_len(),
            }
        }
        MessageStep::NeedMore {
            resume_at,
            additional,
        } => DecodeOutcome::NeedMoreData {
            resume_at,
            additional,
        },
        MessageStep::Malformed(reason) => {
            let head_len = cursor.captured_len().min(16);
            warn!(
                %reason,
                head = %hex::encode(cursor.bytes_at(0, head_len).unwrap_or(&[])),
                "malformed buffer"
            );
            DecodeOutcome::Malformed {
                reason,
                consumed_to_end: cursor.reported_len(),
            }
        }
    }
}
