//! Reference encoder for round-trip and scenario tests.
//!
//! Test-only: the production crate is a pure decoder. The encoder mirrors
//! the wire rules (field-relative padding, length prefixes, entry layout)
//! closely enough to produce byte-exact fixtures without hand-assembling
//! every buffer.

use types::{Argument, FieldCode, TypeCode};

/// Derive the signature string for one argument tree.
///
/// Panics on empty arrays: the element type is unknowable from the value
/// alone, and tests that need empty arrays build their bytes by hand.
pub fn signature_of(arg: &Argument) -> String {
    match arg {
        Argument::Array(elements) => {
            let first = elements
                .first()
                .expect("cannot derive a signature for an empty array");
            format!("a{}", signature_of(first))
        }
        Argument::Struct(members) => {
            let inner: String = members.iter().map(|m| signature_of(m)).collect();
            format!("({inner})")
        }
        Argument::DictEntry(key, value) => {
            format!("{{{}{}}}", signature_of(key), signature_of(value))
        }
        other => other.type_code().as_char().to_string(),
    }
}

fn pad_to(out: &mut Vec<u8>, field_start: usize, boundary: usize) {
    if boundary <= 1 {
        return;
    }
    while (out.len() - field_start) % boundary != 0 {
        out.push(0);
    }
}

/// Append one argument, little-endian, padding relative to `field_start`.
pub fn encode_argument(out: &mut Vec<u8>, arg: &Argument, field_start: usize) {
    match arg {
        Argument::Byte(v) => out.push(*v),
        Argument::Bool(v) => {
            pad_to(out, field_start, 4);
            out.extend_from_slice(&(*v as u32).to_le_bytes());
        }
        Argument::Int16(v) => {
            pad_to(out, field_start, 2);
            out.extend_from_slice(&v.to_le_bytes());
        }
        Argument::UInt16(v) => {
            pad_to(out, field_start, 2);
            out.extend_from_slice(&v.to_le_bytes());
        }
        Argument::Int32(v) => {
            pad_to(out, field_start, 4);
            out.extend_from_slice(&v.to_le_bytes());
        }
        Argument::UInt32(v) => {
            pad_to(out, field_start, 4);
            out.extend_from_slice(&v.to_le_bytes());
        }
        Argument::Handle(v) => out.extend_from_slice(&v.to_le_bytes()),
        Argument::Int64(v) => {
            pad_to(out, field_start, 8);
            out.extend_from_slice(&v.to_le_bytes());
        }
        Argument::UInt64(v) => {
            pad_to(out, field_start, 8);
            out.extend_from_slice(&v.to_le_bytes());
        }
        Argument::Double(v) => {
            pad_to(out, field_start, 8);
            out.extend_from_slice(&v.to_bits().to_le_bytes());
        }
        Argument::String(s) | Argument::ObjectPath(s) => {
            pad_to(out, field_start, 4);
            out.extend_from_slice(&(s.len() as u32).to_le_bytes());
            out.extend_from_slice(s.as_bytes());
            out.push(0);
        }
        Argument::Signature(s) => {
            out.push(s.len() as u8);
            out.extend_from_slice(s.as_bytes());
            out.push(0);
        }
        Argument::Array(elements) => {
            pad_to(out, field_start, 4);
            let len_pos = out.len();
            out.extend_from_slice(&[0; 4]);
            let elem_code = TypeCode::try_from(signature_of(arg).as_bytes()[1])
                .expect("array signature starts with a valid element code");
            pad_to(out, field_start, elem_code.alignment());
            let start = out.len();
            for element in elements {
                encode_argument(out, element, field_start);
            }
            let body_len = (out.len() - start) as u32;
            out[len_pos..len_pos + 4].copy_from_slice(&body_len.to_le_bytes());
        }
        Argument::Struct(members) => {
            pad_to(out, field_start, 8);
            for member in members {
                encode_argument(out, member, field_start);
            }
        }
        Argument::DictEntry(key, value) => {
            pad_to(out, field_start, 8);
            encode_argument(out, key, field_start);
            encode_argument(out, value, field_start);
        }
        Argument::Variant(sig, inner) => {
            out.push(sig.len() as u8);
            out.extend_from_slice(sig.as_bytes());
            out.push(0);
            encode_argument(out, inner, field_start);
        }
    }
}

/// Fluent little-endian message builder in the shape the decoder expects.
pub struct MessageBuilder {
    kind: u8,
    flags: u8,
    serial: u32,
    fields: Vec<(FieldCode, Argument)>,
    body: Vec<Argument>,
}

impl MessageBuilder {
    pub fn new(kind: u8) -> Self {
        Self {
            kind,
            flags: 0,
            serial: 1,
            fields: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_serial(mut self, serial: u32) -> Self {
        self.serial = serial;
        self
    }

    pub fn with_flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }

    pub fn add_field(mut self, code: FieldCode, value: Argument) -> Self {
        self.fields.push((code, value));
        self
    }

    pub fn add_body_arg(mut self, arg: Argument) -> Self {
        self.body.push(arg);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut fields = self.fields;
        if !self.body.is_empty() {
            let signature: String = self.body.iter().map(|a| signature_of(a)).collect();
            fields.push((FieldCode::Signature, Argument::Signature(signature)));
        }

        let mut fields_region = Vec::new();
        for (i, (code, value)) in fields.iter().enumerate() {
            let entry_start = fields_region.len();
            fields_region.push(*code as u8);
            fields_region.push(1);
            fields_region.push(value.type_code() as u8);
            fields_region.push(0);
            encode_argument(&mut fields_region, value, entry_start);
            // Entries pad to 8 relative to their own start; the region's
            // declared length excludes padding after the last entry.
            if i + 1 < fields.len() {
                pad_to(&mut fields_region, entry_start, 8);
            }
        }
        let fields_len = fields_region.len() as u32;

        let mut body_region = Vec::new();
        for arg in &self.body {
            encode_argument(&mut body_region, arg, 0);
        }
        let body_len = body_region.len() as u32;

        let mut message = vec![b'l', self.kind, self.flags, 1];
        message.extend_from_slice(&body_len.to_le_bytes());
        message.extend_from_slice(&self.serial.to_le_bytes());
        message.extend_from_slice(&fields_len.to_le_bytes());
        message.extend_from_slice(&fields_region);
        while message.len() % 8 != 0 {
            message.push(0);
        }
        message.extend_from_slice(&body_region);
        message
    }
}
