//! Typed argument model
//!
//! ## Purpose
//!
//! Message bodies and header-field values are trees of typed arguments,
//! described on the wire by one-letter signature codes (`u`, `s`, `a{sv}`,
//! ...). This module holds the decoded tree ([`Argument`]) and the type-code
//! registry ([`TypeCode`]) with the alignment table the decoder pads by.

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

/// Signature type codes.
///
/// Discriminants are the ASCII signature characters themselves, so a raw
/// signature byte converts with `TypeCode::try_from(b)`; bytes outside the
/// registry are a decode error, not a silent skip — an unknown code makes
/// the rest of the signature unparseable.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
pub enum TypeCode {
    Byte = b'y',
    Boolean = b'b',
    Int16 = b'n',
    UInt16 = b'q',
    Int32 = b'i',
    UInt32 = b'u',
    Int64 = b'x',
    UInt64 = b't',
    Double = b'd',
    String = b's',
    ObjectPath = b'o',
    Signature = b'g',
    Array = b'a',
    StructBegin = b'(',
    StructEnd = b')',
    DictEntryBegin = b'{',
    DictEntryEnd = b'}',
    Variant = b'v',
    Handle = b'h',
}

impl TypeCode {
    /// Pre-padding boundary for this type, in bytes. 0 means no padding.
    ///
    /// String-like types and variants are listed as 0 here even though their
    /// length prefixes carry their own alignment; that prefix alignment is
    /// applied inside the decode path, not by this table.
    pub fn alignment(self) -> usize {
        match self {
            TypeCode::Int16 | TypeCode::UInt16 => 2,
            TypeCode::Boolean | TypeCode::Int32 | TypeCode::UInt32 | TypeCode::Array => 4,
            TypeCode::Int64
            | TypeCode::UInt64
            | TypeCode::Double
            | TypeCode::StructBegin
            | TypeCode::DictEntryBegin => 8,
            _ => 0,
        }
    }

    /// The ASCII signature character for this code.
    pub fn as_char(self) -> char {
        self as u8 as char
    }

    /// True for codes that open a container.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            TypeCode::Array | TypeCode::StructBegin | TypeCode::DictEntryBegin | TypeCode::Variant
        )
    }
}

/// One decoded value.
///
/// Containers own their children; `Variant` also records the embedded
/// signature that described its inner value, since that signature is wire
/// data (self-describing) rather than something the outer signature knew.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Argument {
    Byte(u8),
    Bool(bool),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Handle(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    String(String),
    ObjectPath(String),
    Signature(String),
    Array(Vec<Argument>),
    Struct(Vec<Argument>),
    DictEntry(Box<Argument>, Box<Argument>),
    Variant(String, Box<Argument>),
}

impl Argument {
    /// The signature code this value decodes from.
    pub fn type_code(&self) -> TypeCode {
        match self {
            Argument::Byte(_) => TypeCode::Byte,
            Argument::Bool(_) => TypeCode::Boolean,
            Argument::Int16(_) => TypeCode::Int16,
            Argument::UInt16(_) => TypeCode::UInt16,
            Argument::Int32(_) => TypeCode::Int32,
            Argument::UInt32(_) => TypeCode::UInt32,
            Argument::Handle(_) => TypeCode::Handle,
            Argument::Int64(_) => TypeCode::Int64,
            Argument::UInt64(_) => TypeCode::UInt64,
            Argument::Double(_) => TypeCode::Double,
            Argument::String(_) => TypeCode::String,
            Argument::ObjectPath(_) => TypeCode::ObjectPath,
            Argument::Signature(_) => TypeCode::Signature,
            Argument::Array(_) => TypeCode::Array,
            Argument::Struct(_) => TypeCode::StructBegin,
            Argument::DictEntry(_, _) => TypeCode::DictEntryBegin,
            Argument::Variant(_, _) => TypeCode::Variant,
        }
    }

    /// Unsigned 32-bit view of this value, if it has one.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Argument::UInt32(v) | Argument::Handle(v) => Some(*v),
            _ => None,
        }
    }

    /// String view for the three string-like variants.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Argument::String(s) | Argument::ObjectPath(s) | Argument::Signature(s) => Some(s),
            _ => None,
        }
    }
}
