//! SASL handshake vocabulary
//!
//! Stream connections open with a short line-oriented exchange before binary
//! messages begin. The decoder only recognizes the vocabulary; it does not
//! authenticate.

use serde::{Deserialize, Serialize};

/// The SASL command keywords this decoder recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaslCommand {
    Auth,
    Cancel,
    Begin,
    Data,
    Error,
    Rejected,
    Ok,
}

impl SaslCommand {
    /// All commands, longest keyword first so that prefix matching never
    /// picks a shorter keyword that happens to prefix a longer one.
    pub const ALL: [SaslCommand; 7] = [
        SaslCommand::Rejected,
        SaslCommand::Cancel,
        SaslCommand::Error,
        SaslCommand::Begin,
        SaslCommand::Auth,
        SaslCommand::Data,
        SaslCommand::Ok,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            SaslCommand::Auth => "AUTH",
            SaslCommand::Cancel => "CANCEL",
            SaslCommand::Begin => "BEGIN",
            SaslCommand::Data => "DATA",
            SaslCommand::Error => "ERROR",
            SaslCommand::Rejected => "REJECTED",
            SaslCommand::Ok => "OK",
        }
    }
}

/// One recognized handshake line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaslLine {
    pub command: SaslCommand,
    /// Text after the command keyword, if any. Mechanism names, hex
    /// challenges, and error strings all land here uninterpreted.
    pub parameter: Option<String>,
}
