// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire message decoder.
//!
//! Interprets one fully received buffer as an envelope of typed parts and
//! reconstructs a [`Message`] and its argument graph. Decoding is synchronous,
//! single-pass and eager; all mutable state (cursor, reference table,
//! partially built records) is private to the call, so independent buffers can
//! be decoded concurrently with no coordination.
//!
//! Structural errors (truncation, tag mismatches, bad envelopes, unknown
//! references) abort the whole call; a record whose type cannot be resolved
//! degrades to null with a log line and the rest of the message decodes
//! normally.

use tracing::warn;

use crate::core::{CodecError, Message, MessageKind, RecordGraph, Result, Value};
use crate::registry::{MutatorRegistry, Reconstruction};

use super::cursor::WireCursor;
use super::refs::ReferenceTable;
use super::tag::TypeTag;

/// Maximum value nesting accepted by the protocol.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Decoder for one message buffer.
///
/// The decoder owns the read cursor; a fresh decoder always starts at
/// position zero regardless of what the transport did with the buffer.
pub struct WireDecoder<'a, 'r> {
    cursor: WireCursor<'a>,
    registry: &'r MutatorRegistry,
    refs: ReferenceTable,
    graph: RecordGraph,
}

impl<'a, 'r> WireDecoder<'a, 'r> {
    /// Create a decoder over a buffer.
    pub fn new(registry: &'r MutatorRegistry, data: &'a [u8]) -> Self {
        Self {
            cursor: WireCursor::new(data),
            registry,
            refs: ReferenceTable::new(),
            graph: RecordGraph::new(),
        }
    }

    /// Decode the buffer into a message.
    ///
    /// Reads the version byte and body size, then accumulates parts until the
    /// buffer is exhausted. Partial messages are never returned: the first
    /// structural error aborts the whole call.
    pub fn decode(mut self) -> Result<Message> {
        let protocol_version = self.cursor.read_u8()?;
        let size_pos = self.cursor.position();
        let body_size = self.cursor.read_i32()?;
        if body_size < 0 {
            return Err(CodecError::invalid_count(
                body_size as i64,
                self.cursor.remaining(),
                size_pos,
            ));
        }
        // The declared size does not bound individual reads, but a buffer
        // shorter than the declared body can only be a truncated message;
        // failing here keeps every prefix-truncation deterministic.
        if body_size as usize > self.cursor.remaining() {
            return Err(CodecError::truncated(
                body_size as usize,
                self.cursor.remaining(),
                size_pos,
            ));
        }

        let mut kind = MessageKind::Request;
        let mut method = String::new();
        let mut callback = None;
        let mut arguments = Vec::new();

        while self.cursor.is_readable() {
            let pos = self.cursor.position();
            let byte = self.cursor.read_u8()?;
            let tag = TypeTag::from_u8(byte)
                .ok_or_else(|| CodecError::invalid_envelope(byte, pos))?;
            match tag {
                TypeTag::RequestMethod => {
                    kind = MessageKind::Request;
                    method = self.read_string(None)?;
                }
                TypeTag::RequestCallback => {
                    kind = MessageKind::Request;
                    callback = Some(self.read_string(None)?);
                }
                TypeTag::RequestParameters => {
                    kind = MessageKind::Request;
                    arguments = self.read_elements(None, TypeTag::Array, 0)?;
                }
                TypeTag::ResponseMethod => {
                    kind = MessageKind::Response;
                    method = self.read_string(None)?;
                }
                TypeTag::ResponseParameters => {
                    kind = MessageKind::Response;
                    arguments = self.read_elements(None, TypeTag::Array, 0)?;
                }
                _ => return Err(CodecError::invalid_envelope(byte, pos)),
            }
        }

        Ok(Message {
            protocol_version,
            kind,
            method,
            callback,
            arguments,
            records: self.graph,
        })
    }

    // ========================================================================
    // Tag handling
    // ========================================================================

    /// Verify the next value carries the expected tag.
    ///
    /// `Some(tag)` means a container context already read and resolved the
    /// tag; `None` reads one tag byte from the cursor first.
    fn expect_tag(&mut self, tag: Option<TypeTag>, expected: TypeTag) -> Result<()> {
        let pos = self.cursor.position();
        let (byte, found) = match tag {
            Some(t) => (t.as_u8(), Some(t)),
            None => {
                let b = self.cursor.read_u8()?;
                (b, TypeTag::from_u8(b))
            }
        };
        if found == Some(expected) {
            Ok(())
        } else {
            Err(CodecError::type_mismatch(expected.name(), byte, pos))
        }
    }

    /// Decode one value of any type.
    ///
    /// The single dispatch point mapping every tag to its decoding routine;
    /// an unrecognized tag is always fatal.
    pub fn decode_any(&mut self, tag: Option<TypeTag>, depth: usize) -> Result<Value> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(CodecError::depth_exceeded(MAX_NESTING_DEPTH));
        }
        let pos = self.cursor.position();
        let tag = match tag {
            Some(t) => t,
            None => {
                let byte = self.cursor.read_u8()?;
                TypeTag::from_u8(byte).ok_or_else(|| CodecError::unknown_tag(byte, pos))?
            }
        };
        match tag {
            TypeTag::Null => Ok(Value::Null),
            TypeTag::Byte => Ok(Value::Byte(self.read_byte(Some(tag))?)),
            TypeTag::Short => Ok(Value::Short(self.read_short(Some(tag))?)),
            TypeTag::Int => Ok(Value::Int(self.read_int(Some(tag))?)),
            TypeTag::Long => Ok(Value::Long(self.read_long(Some(tag))?)),
            TypeTag::Float => Ok(Value::Float(self.read_float(Some(tag))?)),
            TypeTag::Double => Ok(Value::Double(self.read_double(Some(tag))?)),
            TypeTag::Bool => Ok(Value::Bool(self.read_bool(Some(tag))?)),
            TypeTag::Char => Ok(Value::Char(self.read_char(Some(tag))?)),
            TypeTag::String => Ok(Value::String(self.read_string(Some(tag))?)),
            TypeTag::Array => Ok(Value::Array(self.read_elements(
                Some(tag),
                TypeTag::Array,
                depth,
            )?)),
            TypeTag::List => Ok(Value::List(self.read_elements(
                Some(tag),
                TypeTag::List,
                depth,
            )?)),
            TypeTag::Set => {
                let items = self.read_elements(Some(tag), TypeTag::Set, depth)?;
                let mut set: Vec<Value> = Vec::with_capacity(items.len());
                for item in items {
                    if !set.contains(&item) {
                        set.push(item);
                    }
                }
                Ok(Value::Set(set))
            }
            TypeTag::Map => self.read_map(Some(tag), depth),
            TypeTag::Record => self.read_record(Some(tag), depth),
            TypeTag::Reference => self.read_reference(Some(tag)),
            // Envelope parts are not values
            _ => Err(CodecError::type_mismatch("Value", tag.as_u8(), pos)),
        }
    }

    // ========================================================================
    // Fixed-width primitives
    // ========================================================================

    /// Read a single signed byte.
    pub fn read_byte(&mut self, tag: Option<TypeTag>) -> Result<i8> {
        self.expect_tag(tag, TypeTag::Byte)?;
        self.cursor.read_i8()
    }

    /// Read a short (16 bits).
    pub fn read_short(&mut self, tag: Option<TypeTag>) -> Result<i16> {
        self.expect_tag(tag, TypeTag::Short)?;
        self.cursor.read_i16()
    }

    /// Read an int (32 bits).
    pub fn read_int(&mut self, tag: Option<TypeTag>) -> Result<i32> {
        self.expect_tag(tag, TypeTag::Int)?;
        self.cursor.read_i32()
    }

    /// Read a long (64 bits).
    pub fn read_long(&mut self, tag: Option<TypeTag>) -> Result<i64> {
        self.expect_tag(tag, TypeTag::Long)?;
        self.cursor.read_i64()
    }

    /// Read a float (32-bit IEEE-754).
    pub fn read_float(&mut self, tag: Option<TypeTag>) -> Result<f32> {
        self.expect_tag(tag, TypeTag::Float)?;
        self.cursor.read_f32()
    }

    /// Read a double (64-bit IEEE-754).
    pub fn read_double(&mut self, tag: Option<TypeTag>) -> Result<f64> {
        self.expect_tag(tag, TypeTag::Double)?;
        self.cursor.read_f64()
    }

    /// Read a boolean; any nonzero byte is true.
    pub fn read_bool(&mut self, tag: Option<TypeTag>) -> Result<bool> {
        self.expect_tag(tag, TypeTag::Bool)?;
        Ok(self.cursor.read_u8()? != 0)
    }

    /// Read a char from one UTF-16 code unit.
    pub fn read_char(&mut self, tag: Option<TypeTag>) -> Result<char> {
        self.expect_tag(tag, TypeTag::Char)?;
        let unit = self.cursor.read_u16()?;
        char::from_u32(unit as u32).ok_or_else(|| {
            CodecError::invalid_data("char", format!("0x{unit:04X} is not a scalar value"))
        })
    }

    // ========================================================================
    // Variable-length payloads
    // ========================================================================

    /// Read a length-prefixed UTF-8 string. Length zero yields an empty
    /// string without further reads.
    pub fn read_string(&mut self, tag: Option<TypeTag>) -> Result<String> {
        self.expect_tag(tag, TypeTag::String)?;
        let pos = self.cursor.position();
        let len = self.cursor.read_i32()?;
        if len < 0 {
            return Err(CodecError::invalid_count(
                len as i64,
                self.cursor.remaining(),
                pos,
            ));
        }
        if len == 0 {
            return Ok(String::new());
        }
        let bytes = self.cursor.read_bytes(len as usize)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| CodecError::invalid_data("string", e.to_string()))
    }

    /// Read an element count, rejecting negative values and counts that
    /// cannot possibly fit in the remaining buffer (every element carries at
    /// least a tag byte). This bounds allocation from attacker-controlled
    /// counts before anything is reserved.
    fn read_count(&mut self) -> Result<usize> {
        let pos = self.cursor.position();
        let count = self.cursor.read_i32()?;
        if count < 0 || count as usize > self.cursor.remaining() {
            return Err(CodecError::invalid_count(
                count as i64,
                self.cursor.remaining(),
                pos,
            ));
        }
        Ok(count as usize)
    }

    /// Read the elements of an Array, List or Set.
    fn read_elements(
        &mut self,
        tag: Option<TypeTag>,
        expected: TypeTag,
        depth: usize,
    ) -> Result<Vec<Value>> {
        self.expect_tag(tag, expected)?;
        let count = self.read_count()?;
        let mut elements = Vec::with_capacity(count);
        for _ in 0..count {
            elements.push(self.decode_any(None, depth + 1)?);
        }
        Ok(elements)
    }

    /// Read a map of tagged key/value pairs; an equal key replaces the
    /// earlier entry (last write wins).
    fn read_map(&mut self, tag: Option<TypeTag>, depth: usize) -> Result<Value> {
        self.expect_tag(tag, TypeTag::Map)?;
        let count = self.read_count()?;
        let mut entries: Vec<(Value, Value)> = Vec::with_capacity(count);
        for _ in 0..count {
            let key = self.decode_any(None, depth + 1)?;
            let value = self.decode_any(None, depth + 1)?;
            if let Some(entry) = entries.iter_mut().find(|(k, _)| *k == key) {
                entry.1 = value;
            } else {
                entries.push((key, value));
            }
        }
        Ok(Value::Map(entries))
    }

    // ========================================================================
    // Records and references
    // ========================================================================

    /// Read a record: reference id, type name, field count, fields.
    ///
    /// The instance slot is registered in the reference table before field
    /// population begins, so self-referential graphs resolve while the record
    /// is still being filled in.
    fn read_record(&mut self, tag: Option<TypeTag>, depth: usize) -> Result<Value> {
        self.expect_tag(tag, TypeTag::Record)?;
        let header_pos = self.cursor.position();
        let reference = self.cursor.read_i32()?;
        let type_name = self.read_string(None)?;
        if type_name.is_empty() {
            return Err(CodecError::missing_type_name(header_pos));
        }
        let count = self.read_count()?;

        match self.registry.resolve(&type_name)? {
            Some(Reconstruction::Mutator(mutator)) => {
                match mutator.new_instance(&type_name) {
                    Ok(instance) => {
                        let id = self.graph.insert(instance);
                        self.refs.insert(reference, id);
                        for _ in 0..count {
                            let key = self.read_string(None)?;
                            let value = self.decode_any(None, depth + 1)?;
                            if let Some(slot) = self.graph.get_mut(id) {
                                if !mutator.set(slot, &key, value) {
                                    warn!(
                                        type_name = %type_name,
                                        field = %key,
                                        "mutator rejected field, skipping"
                                    );
                                }
                            }
                        }
                        Ok(Value::Record(id))
                    }
                    Err(e) => {
                        warn!(
                            type_name = %type_name,
                            error = %e,
                            "mutator failed to instantiate, record decodes to null"
                        );
                        self.discard_fields(count, depth)?;
                        Ok(Value::Null)
                    }
                }
            }
            Some(Reconstruction::Descriptor(plan)) => {
                let id = self.graph.insert(plan.instantiate());
                self.refs.insert(reference, id);
                for _ in 0..count {
                    let key = self.read_string(None)?;
                    let value = self.decode_any(None, depth + 1)?;
                    if let Some(slot) = self.graph.get_mut(id) {
                        plan.apply(slot, &key, value);
                    }
                }
                Ok(Value::Record(id))
            }
            None => {
                warn!(
                    type_name = %type_name,
                    "no mutator or descriptor for type, record decodes to null"
                );
                self.discard_fields(count, depth)?;
                Ok(Value::Null)
            }
        }
    }

    /// Consume the fields of a record whose instance could not be built,
    /// keeping the stream position consistent for whatever follows. Records
    /// nested inside the discarded fields are still decoded and registered,
    /// so later references to them stay valid.
    fn discard_fields(&mut self, count: usize, depth: usize) -> Result<()> {
        for _ in 0..count {
            let _key = self.read_string(None)?;
            let _value = self.decode_any(None, depth + 1)?;
        }
        Ok(())
    }

    /// Read a backreference to a previously introduced record. A miss is a
    /// hard error: ids are assigned in encounter order, so a valid stream can
    /// never reference a record before its header.
    fn read_reference(&mut self, tag: Option<TypeTag>) -> Result<Value> {
        self.expect_tag(tag, TypeTag::Reference)?;
        let pos = self.cursor.position();
        let reference = self.cursor.read_i32()?;
        self.refs
            .resolve(reference)
            .map(Value::Record)
            .ok_or_else(|| CodecError::unknown_reference(reference, pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::writer::WireWriter;
    use crate::registry::DynamicMutator;
    use std::sync::Arc;

    fn dynamic_registry() -> MutatorRegistry {
        let mut registry = MutatorRegistry::new();
        registry.register_mutator(Arc::new(DynamicMutator));
        registry
    }

    /// Write a tagged string the way the encoder does.
    fn put_string(writer: &mut WireWriter, s: &str) {
        writer.put_u8(TypeTag::String.as_u8());
        writer.put_i32(s.len() as i32);
        writer.put_bytes(s.as_bytes());
    }

    /// Wrap a body in the version + size envelope header.
    fn envelope(body: Vec<u8>) -> Vec<u8> {
        let mut data = vec![1u8];
        data.extend_from_slice(&(body.len() as i32).to_be_bytes());
        data.extend_from_slice(&body);
        data
    }

    #[test]
    fn test_decode_request_with_method_and_callback() {
        let mut body = WireWriter::new();
        body.put_u8(TypeTag::RequestMethod.as_u8());
        put_string(&mut body, "ping");
        body.put_u8(TypeTag::RequestCallback.as_u8());
        put_string(&mut body, "cb1");
        body.put_u8(TypeTag::RequestParameters.as_u8());
        body.put_u8(TypeTag::Array.as_u8());
        body.put_i32(0);

        let registry = MutatorRegistry::new();
        let msg = WireDecoder::new(&registry, &envelope(body.finish()))
            .decode()
            .expect("decode");
        assert_eq!(msg.kind, MessageKind::Request);
        assert_eq!(msg.method, "ping");
        assert_eq!(msg.callback.as_deref(), Some("cb1"));
        assert!(msg.arguments.is_empty());
        assert_eq!(msg.protocol_version, 1);
    }

    #[test]
    fn test_decode_response_with_arguments() {
        let mut body = WireWriter::new();
        body.put_u8(TypeTag::ResponseMethod.as_u8());
        put_string(&mut body, "ping");
        body.put_u8(TypeTag::ResponseParameters.as_u8());
        body.put_u8(TypeTag::Array.as_u8());
        body.put_i32(1);
        body.put_u8(TypeTag::Int.as_u8());
        body.put_i32(42);

        let registry = MutatorRegistry::new();
        let msg = WireDecoder::new(&registry, &envelope(body.finish()))
            .decode()
            .expect("decode");
        assert_eq!(msg.kind, MessageKind::Response);
        assert_eq!(msg.arguments, vec![Value::Int(42)]);
    }

    #[test]
    fn test_invalid_envelope_tag() {
        let mut body = WireWriter::new();
        body.put_u8(TypeTag::Int.as_u8());
        body.put_i32(1);

        let registry = MutatorRegistry::new();
        let result = WireDecoder::new(&registry, &envelope(body.finish())).decode();
        assert!(matches!(result, Err(CodecError::InvalidEnvelope { .. })));
    }

    #[test]
    fn test_unassigned_envelope_byte() {
        let body = vec![99u8];
        let registry = MutatorRegistry::new();
        let result = WireDecoder::new(&registry, &envelope(body)).decode();
        assert!(matches!(
            result,
            Err(CodecError::InvalidEnvelope { tag: 99, .. })
        ));
    }

    #[test]
    fn test_declared_size_larger_than_buffer() {
        let mut data = vec![1u8];
        data.extend_from_slice(&100i32.to_be_bytes());
        data.push(TypeTag::RequestMethod.as_u8());

        let registry = MutatorRegistry::new();
        let result = WireDecoder::new(&registry, &data).decode();
        assert!(matches!(result, Err(CodecError::Truncated { .. })));
    }

    #[test]
    fn test_negative_declared_size() {
        let mut data = vec![1u8];
        data.extend_from_slice(&(-5i32).to_be_bytes());

        let registry = MutatorRegistry::new();
        let result = WireDecoder::new(&registry, &data).decode();
        assert!(matches!(result, Err(CodecError::InvalidCount { .. })));
    }

    #[test]
    fn test_string_length_past_buffer_is_truncation() {
        let mut body = WireWriter::new();
        body.put_u8(TypeTag::RequestMethod.as_u8());
        body.put_u8(TypeTag::String.as_u8());
        body.put_i32(3);
        body.put_bytes(b"pi"); // one byte short

        // Hand-build the envelope with a deliberately matching size so the
        // inner string read is what fails.
        let body = body.finish();
        let mut data = vec![1u8];
        data.extend_from_slice(&(body.len() as i32).to_be_bytes());
        data.extend_from_slice(&body);

        let registry = MutatorRegistry::new();
        let result = WireDecoder::new(&registry, &data).decode();
        assert!(matches!(result, Err(CodecError::Truncated { .. })));
    }

    #[test]
    fn test_negative_string_length() {
        let mut body = WireWriter::new();
        body.put_u8(TypeTag::RequestMethod.as_u8());
        body.put_u8(TypeTag::String.as_u8());
        body.put_i32(-1);
        body.put_bytes(&[0u8; 8]);

        let registry = MutatorRegistry::new();
        let result = WireDecoder::new(&registry, &envelope(body.finish())).decode();
        assert!(matches!(result, Err(CodecError::InvalidCount { .. })));
    }

    #[test]
    fn test_container_count_exceeding_buffer() {
        let mut body = WireWriter::new();
        body.put_u8(TypeTag::RequestParameters.as_u8());
        body.put_u8(TypeTag::Array.as_u8());
        body.put_i32(1_000_000);

        let registry = MutatorRegistry::new();
        let result = WireDecoder::new(&registry, &envelope(body.finish())).decode();
        assert!(matches!(result, Err(CodecError::InvalidCount { .. })));
    }

    #[test]
    fn test_type_mismatch_names_expected_and_found() {
        // Parameters part must carry an Array, not an Int
        let mut body = WireWriter::new();
        body.put_u8(TypeTag::RequestParameters.as_u8());
        body.put_u8(TypeTag::Int.as_u8());
        body.put_i32(42);

        let registry = MutatorRegistry::new();
        match WireDecoder::new(&registry, &envelope(body.finish())).decode() {
            Err(CodecError::TypeMismatch {
                expected, found, ..
            }) => {
                assert_eq!(expected, "Array");
                assert_eq!(found, TypeTag::Int.as_u8());
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_record_with_empty_type_name() {
        let mut body = WireWriter::new();
        body.put_u8(TypeTag::RequestParameters.as_u8());
        body.put_u8(TypeTag::Array.as_u8());
        body.put_i32(1);
        body.put_u8(TypeTag::Record.as_u8());
        body.put_i32(1); // reference id
        put_string(&mut body, ""); // empty type name
        body.put_i32(0);

        let registry = dynamic_registry();
        let result = WireDecoder::new(&registry, &envelope(body.finish())).decode();
        assert!(matches!(result, Err(CodecError::MissingTypeName { .. })));
    }

    #[test]
    fn test_unknown_reference_is_fatal() {
        let mut body = WireWriter::new();
        body.put_u8(TypeTag::RequestParameters.as_u8());
        body.put_u8(TypeTag::Array.as_u8());
        body.put_i32(1);
        body.put_u8(TypeTag::Reference.as_u8());
        body.put_i32(7);

        let registry = dynamic_registry();
        let result = WireDecoder::new(&registry, &envelope(body.finish())).decode();
        assert!(matches!(
            result,
            Err(CodecError::UnknownReference { reference: 7, .. })
        ));
    }

    #[test]
    fn test_unresolvable_record_decodes_to_null() {
        let mut body = WireWriter::new();
        body.put_u8(TypeTag::RequestParameters.as_u8());
        body.put_u8(TypeTag::Array.as_u8());
        body.put_i32(2);
        body.put_u8(TypeTag::Record.as_u8());
        body.put_i32(1);
        put_string(&mut body, "demo.Unknown");
        body.put_i32(1);
        put_string(&mut body, "x");
        body.put_u8(TypeTag::Int.as_u8());
        body.put_i32(5);
        // A second argument after the failed record must still decode
        body.put_u8(TypeTag::Int.as_u8());
        body.put_i32(6);

        let registry = MutatorRegistry::new(); // nothing registered
        let msg = WireDecoder::new(&registry, &envelope(body.finish()))
            .decode()
            .expect("decode");
        assert_eq!(msg.arguments, vec![Value::Null, Value::Int(6)]);
        assert!(msg.records.is_empty());
    }

    #[test]
    fn test_self_referential_record() {
        let mut body = WireWriter::new();
        body.put_u8(TypeTag::RequestParameters.as_u8());
        body.put_u8(TypeTag::Array.as_u8());
        body.put_i32(1);
        body.put_u8(TypeTag::Record.as_u8());
        body.put_i32(1);
        put_string(&mut body, "demo.Node");
        body.put_i32(1);
        put_string(&mut body, "next");
        body.put_u8(TypeTag::Reference.as_u8());
        body.put_i32(1); // points back at the record being read

        let registry = dynamic_registry();
        let msg = WireDecoder::new(&registry, &envelope(body.finish()))
            .decode()
            .expect("decode");
        let id = msg.arguments[0].as_record_id().expect("record");
        let record = msg.records.get(id).expect("slot");
        assert_eq!(record.get("next"), Some(&Value::Record(id)));
    }

    #[test]
    fn test_set_deduplicates_by_equality() {
        let mut body = WireWriter::new();
        body.put_u8(TypeTag::RequestParameters.as_u8());
        body.put_u8(TypeTag::Array.as_u8());
        body.put_i32(1);
        body.put_u8(TypeTag::Set.as_u8());
        body.put_i32(3);
        body.put_u8(TypeTag::Int.as_u8());
        body.put_i32(1);
        body.put_u8(TypeTag::Int.as_u8());
        body.put_i32(1);
        body.put_u8(TypeTag::Int.as_u8());
        body.put_i32(2);

        let registry = MutatorRegistry::new();
        let msg = WireDecoder::new(&registry, &envelope(body.finish()))
            .decode()
            .expect("decode");
        assert_eq!(
            msg.arguments[0],
            Value::Set(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn test_map_last_write_wins_on_equal_keys() {
        let mut body = WireWriter::new();
        body.put_u8(TypeTag::RequestParameters.as_u8());
        body.put_u8(TypeTag::Array.as_u8());
        body.put_i32(1);
        body.put_u8(TypeTag::Map.as_u8());
        body.put_i32(2);
        put_string(&mut body, "k");
        body.put_u8(TypeTag::Int.as_u8());
        body.put_i32(1);
        put_string(&mut body, "k");
        body.put_u8(TypeTag::Int.as_u8());
        body.put_i32(2);

        let registry = MutatorRegistry::new();
        let msg = WireDecoder::new(&registry, &envelope(body.finish()))
            .decode()
            .expect("decode");
        assert_eq!(
            msg.arguments[0],
            Value::Map(vec![(Value::String("k".to_string()), Value::Int(2))])
        );
    }

    #[test]
    fn test_nesting_depth_guard() {
        let mut body = WireWriter::new();
        body.put_u8(TypeTag::RequestParameters.as_u8());
        body.put_u8(TypeTag::Array.as_u8());
        body.put_i32(1);
        for _ in 0..MAX_NESTING_DEPTH + 4 {
            body.put_u8(TypeTag::List.as_u8());
            body.put_i32(1);
        }
        body.put_u8(TypeTag::Null.as_u8());

        let registry = MutatorRegistry::new();
        let result = WireDecoder::new(&registry, &envelope(body.finish())).decode();
        assert!(matches!(result, Err(CodecError::DepthExceeded { .. })));
    }

    #[test]
    fn test_surrogate_char_unit_is_invalid_data() {
        let mut body = WireWriter::new();
        body.put_u8(TypeTag::RequestParameters.as_u8());
        body.put_u8(TypeTag::Array.as_u8());
        body.put_i32(1);
        body.put_u8(TypeTag::Char.as_u8());
        body.put_u16(0xD800);

        let registry = MutatorRegistry::new();
        let result = WireDecoder::new(&registry, &envelope(body.finish())).decode();
        assert!(matches!(result, Err(CodecError::InvalidData { .. })));
    }
}
