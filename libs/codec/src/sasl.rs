//! SASL handshake recognition
//!
//! Stream connections open with a single 0x00 connect byte and then a short
//! line-oriented exchange (`AUTH ...\n`, `BEGIN\n`, ...). The recognizer is
//! deliberately non-committal: if the bytes at the current offset are not a
//! known command keyword, it passes through without consuming anything and
//! the buffer is treated as ordinary message traffic.

use types::{SaslCommand, SaslLine, SASL_LINE_WINDOW};

use crate::cursor::ByteCursor;

/// Result of probing one offset for a handshake line.
#[derive(Debug, Clone, PartialEq)]
pub enum SaslProbe {
    /// A complete line was recognized; the offset after its `\n` follows.
    Line(SaslLine, usize),
    /// A keyword (or keyword prefix) was found but its line terminator is
    /// not captured yet and the search window is not exhausted. The caller
    /// should request one more segment — line length is unknowable.
    NeedMoreSegment,
    /// No handshake vocabulary at this offset; not an error.
    NotHandshake,
}

/// True when the byte at `offset` is the connect byte.
pub fn is_connect_byte(cursor: &ByteCursor<'_>, offset: usize) -> bool {
    cursor.u8_at(offset) == Ok(0x00)
}

/// Probe `offset` for a SASL command line.
pub fn probe_line(cursor: &ByteCursor<'_>, offset: usize) -> SaslProbe {
    let available = cursor.captured_remaining(offset);
    if available == 0 {
        return SaslProbe::NotHandshake;
    }
    let Some(command) = match_keyword(cursor, offset, available) else {
        // A short buffer ending in a proper keyword prefix ("AU") cannot be
        // told apart from non-handshake bytes yet.
        if is_keyword_prefix(cursor, offset, available) {
            return SaslProbe::NeedMoreSegment;
        }
        return SaslProbe::NotHandshake;
    };

    let keyword = command.keyword().as_bytes();
    let window = keyword.len() + SASL_LINE_WINDOW;
    let searchable = available.min(window);
    let line = cursor
        .bytes_at(offset, searchable)
        .expect("searchable is within captured bytes");
    match line.iter().position(|&b| b == b'\n') {
        Some(newline) => {
            let raw = &line[keyword.len()..newline];
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let parameter = match raw.strip_prefix(b" ") {
                Some(rest) if !rest.is_empty() => {
                    Some(String::from_utf8_lossy(rest).into_owned())
                }
                _ => None,
            };
            SaslProbe::Line(SaslLine { command, parameter }, offset + newline + 1)
        }
        // No terminator inside the window: if the window itself is not yet
        // full this can still become a line; past the window it is binary
        // data that merely starts like a keyword.
        None if available < window => SaslProbe::NeedMoreSegment,
        None => SaslProbe::NotHandshake,
    }
}

fn match_keyword(cursor: &ByteCursor<'_>, offset: usize, available: usize) -> Option<SaslCommand> {
    // Longest keyword first so DATA never shadows a hypothetical DATAX.
    SaslCommand::ALL.into_iter().find(|cmd| {
        let keyword = cmd.keyword().as_bytes();
        available >= keyword.len()
            && cursor.bytes_at(offset, keyword.len()) == Ok(keyword)
    })
}

fn is_keyword_prefix(cursor: &ByteCursor<'_>, offset: usize, available: usize) -> bool {
    let Ok(head) = cursor.bytes_at(offset, available) else {
        return false;
    };
    SaslCommand::ALL.into_iter().any(|cmd| {
        let keyword = cmd.keyword().as_bytes();
        keyword.len() > head.len() && keyword.starts_with(head)
    })
}
