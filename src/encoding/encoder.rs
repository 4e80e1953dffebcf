// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire message encoder.
//!
//! Walks a message's argument graph and emits type-tagged big-endian bytes,
//! symmetric to the decoder. Records are assigned reference ids in encounter
//! order, keyed by arena slot identity: the first occurrence emits the full
//! record payload, every later occurrence (including cycles back into a
//! record still being written) emits a backreference only.

use crate::core::{CodecError, Message, MessageKind, RecordGraph, Result, Value};

use super::decoder::MAX_NESTING_DEPTH;
use super::refs::ReferenceAssigner;
use super::tag::TypeTag;
use super::writer::WireWriter;
use super::ENVELOPE_HEADER_SIZE;

/// Encoder for one message.
pub struct WireEncoder<'a> {
    writer: WireWriter,
    refs: ReferenceAssigner,
    graph: &'a RecordGraph,
}

impl<'a> WireEncoder<'a> {
    fn new(graph: &'a RecordGraph) -> Self {
        Self {
            writer: WireWriter::new(),
            refs: ReferenceAssigner::new(),
            graph,
        }
    }

    /// Encode a message to its wire bytes: version byte, body size, parts.
    pub fn encode(message: &Message) -> Result<Vec<u8>> {
        let mut encoder = WireEncoder::new(&message.records);

        match message.kind {
            MessageKind::Request => {
                encoder.write_part_string(TypeTag::RequestMethod, &message.method)?;
                if let Some(callback) = &message.callback {
                    encoder.write_part_string(TypeTag::RequestCallback, callback)?;
                }
                encoder.write_part_arguments(TypeTag::RequestParameters, &message.arguments)?;
            }
            MessageKind::Response => {
                encoder.write_part_string(TypeTag::ResponseMethod, &message.method)?;
                encoder.write_part_arguments(TypeTag::ResponseParameters, &message.arguments)?;
            }
        }

        let body = encoder.writer.finish();
        let size = count_i32(body.len(), "message body")?;
        let mut data = Vec::with_capacity(ENVELOPE_HEADER_SIZE + body.len());
        data.push(message.protocol_version);
        data.extend_from_slice(&size.to_be_bytes());
        data.extend_from_slice(&body);
        Ok(data)
    }

    /// Write a part carrying a tagged string payload.
    fn write_part_string(&mut self, part: TypeTag, value: &str) -> Result<()> {
        self.writer.put_u8(part.as_u8());
        self.write_string(value)
    }

    /// Write a parameters part carrying a tagged array payload.
    fn write_part_arguments(&mut self, part: TypeTag, arguments: &[Value]) -> Result<()> {
        self.writer.put_u8(part.as_u8());
        self.write_elements(TypeTag::Array, arguments, 0)
    }

    /// Write a tagged, length-prefixed UTF-8 string.
    fn write_string(&mut self, value: &str) -> Result<()> {
        let len = count_i32(value.len(), "string")?;
        self.writer.put_u8(TypeTag::String.as_u8());
        self.writer.put_i32(len);
        self.writer.put_bytes(value.as_bytes());
        Ok(())
    }

    /// Write a tagged container with its element count and tagged elements.
    fn write_elements(&mut self, tag: TypeTag, elements: &[Value], depth: usize) -> Result<()> {
        let count = count_i32(elements.len(), tag.name())?;
        self.writer.put_u8(tag.as_u8());
        self.writer.put_i32(count);
        for element in elements {
            self.encode_value(element, depth + 1)?;
        }
        Ok(())
    }

    /// Encode one value with its leading type tag.
    fn encode_value(&mut self, value: &Value, depth: usize) -> Result<()> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(CodecError::depth_exceeded(MAX_NESTING_DEPTH));
        }
        match value {
            Value::Null => {
                self.writer.put_u8(TypeTag::Null.as_u8());
            }
            Value::Byte(v) => {
                self.writer.put_u8(TypeTag::Byte.as_u8());
                self.writer.put_i8(*v);
            }
            Value::Short(v) => {
                self.writer.put_u8(TypeTag::Short.as_u8());
                self.writer.put_i16(*v);
            }
            Value::Int(v) => {
                self.writer.put_u8(TypeTag::Int.as_u8());
                self.writer.put_i32(*v);
            }
            Value::Long(v) => {
                self.writer.put_u8(TypeTag::Long.as_u8());
                self.writer.put_i64(*v);
            }
            Value::Float(v) => {
                self.writer.put_u8(TypeTag::Float.as_u8());
                self.writer.put_f32(*v);
            }
            Value::Double(v) => {
                self.writer.put_u8(TypeTag::Double.as_u8());
                self.writer.put_f64(*v);
            }
            Value::Bool(v) => {
                self.writer.put_u8(TypeTag::Bool.as_u8());
                self.writer.put_u8(u8::from(*v));
            }
            Value::Char(c) => {
                let scalar = *c as u32;
                if scalar > 0xFFFF {
                    return Err(CodecError::encode(
                        "char",
                        format!("'{c}' is not representable as one UTF-16 unit"),
                    ));
                }
                self.writer.put_u8(TypeTag::Char.as_u8());
                self.writer.put_u16(scalar as u16);
            }
            Value::String(s) => self.write_string(s)?,
            Value::Array(items) => self.write_elements(TypeTag::Array, items, depth)?,
            Value::List(items) => self.write_elements(TypeTag::List, items, depth)?,
            Value::Set(items) => self.write_elements(TypeTag::Set, items, depth)?,
            Value::Map(entries) => {
                let count = count_i32(entries.len(), "Map")?;
                self.writer.put_u8(TypeTag::Map.as_u8());
                self.writer.put_i32(count);
                for (key, val) in entries {
                    self.encode_value(key, depth + 1)?;
                    self.encode_value(val, depth + 1)?;
                }
            }
            Value::Record(id) => {
                if let Some(reference) = self.refs.existing(*id) {
                    // Already introduced: identity is carried by the id alone
                    self.writer.put_u8(TypeTag::Reference.as_u8());
                    self.writer.put_i32(reference);
                    return Ok(());
                }
                let graph = self.graph;
                let record = graph.get(*id).ok_or_else(|| {
                    CodecError::encode(
                        "record",
                        format!("record id {} is not in the message graph", id.index()),
                    )
                })?;
                if record.type_name.is_empty() {
                    return Err(CodecError::encode("record", "type name is empty"));
                }
                // Assign the id before the fields so cycles back into this
                // record encode as references
                let reference = self.refs.assign(*id);
                self.writer.put_u8(TypeTag::Record.as_u8());
                self.writer.put_i32(reference);
                self.write_string(&record.type_name)?;
                self.writer.put_i32(count_i32(record.len(), "record fields")?);
                for (name, field_value) in record.iter() {
                    self.write_string(name)?;
                    self.encode_value(field_value, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

/// Convert a length to the i32 the wire carries, rejecting overflow.
fn count_i32(len: usize, context: &str) -> Result<i32> {
    i32::try_from(len)
        .map_err(|_| CodecError::encode("count", format!("{context} length {len} exceeds i32")))
}
