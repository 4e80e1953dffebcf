// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Codec value type system.
//!
//! Provides the tagged-union representation of every encodable datum, plus the
//! arena that holds record instances so that shared and cyclic object graphs
//! can be expressed without owning pointers. All variants are
//! serde-serializable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tagged value for wire encoding and decoding.
///
/// Every container is fully heterogeneous: elements are tagged `Value`s, not a
/// homogeneous generic type. Records are not stored inline; a [`Value::Record`]
/// carries an index into the enclosing [`RecordGraph`], which is what makes a
/// graph with shared nodes (two containers pointing at the *same* record) or
/// cycles representable with plain owned data.
///
/// # Design Principles
///
/// - **Serde support**: all variants are serializable for downstream processing
/// - **Owned types**: owned `String`/`Vec` for clarity and simplicity
/// - **Identity by index**: record identity is the arena slot, never the
///   field contents, so two equal-but-distinct records stay distinct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Absent value
    Null,
    /// 8-bit signed integer
    Byte(i8),
    /// 16-bit signed integer
    Short(i16),
    /// 32-bit signed integer
    Int(i32),
    /// 64-bit signed integer
    Long(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// Boolean
    Bool(bool),
    /// Single character (one UTF-16 code unit on the wire)
    Char(char),
    /// UTF-8 string
    String(String),
    /// Fixed-arity heterogeneous sequence
    Array(Vec<Value>),
    /// Ordered heterogeneous sequence
    List(Vec<Value>),
    /// Unordered sequence deduplicated by equality
    Set(Vec<Value>),
    /// Key/value pairs; keys are deduplicated by equality, last write wins
    Map(Vec<(Value, Value)>),
    /// A record instance stored in the enclosing [`RecordGraph`]
    Record(RecordId),
}

impl Value {
    // ========================================================================
    // Type Checking Predicates
    // ========================================================================

    /// Check if this value is a numeric type (integers or floats).
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Byte(_)
                | Value::Short(_)
                | Value::Int(_)
                | Value::Long(_)
                | Value::Float(_)
                | Value::Double(_)
        )
    }

    /// Check if this value is an integer type.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Value::Byte(_) | Value::Short(_) | Value::Int(_) | Value::Long(_)
        )
    }

    /// Check if this value is a floating-point type.
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_) | Value::Double(_))
    }

    /// Check if this value is a container type.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Value::Array(_) | Value::List(_) | Value::Set(_) | Value::Map(_)
        )
    }

    /// Check if this value is a record reference.
    pub fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    // ========================================================================
    // Type Conversion Methods
    // ========================================================================

    /// Try to convert this value to i64 (for integer types only).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(*v as i64),
            Value::Short(v) => Some(*v as i64),
            Value::Int(v) => Some(*v as i64),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to convert this value to f64 (for numeric values only).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Byte(v) => Some(*v as f64),
            Value::Short(v) => Some(*v as f64),
            Value::Int(v) => Some(*v as f64),
            Value::Long(v) => Some(*v as f64),
            Value::Float(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get the inner boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the inner string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the elements of an Array, List or Set.
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) | Value::List(v) | Value::Set(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get the inner map entries.
    pub fn as_entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Try to get the record id.
    pub fn as_record_id(&self) -> Option<RecordId> {
        match self {
            Value::Record(id) => Some(*id),
            _ => None,
        }
    }

    // ========================================================================
    // Codec-Specific Helpers
    // ========================================================================

    /// Get the type name of this value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "'{v}'"),
            Value::String(v) => write!(f, "\"{v}\""),
            Value::Array(v) => write!(f, "[{} elements]", v.len()),
            Value::List(v) => write!(f, "[{} elements]", v.len()),
            Value::Set(v) => write!(f, "{{{} elements}}", v.len()),
            Value::Map(v) => write!(f, "{{{} entries}}", v.len()),
            Value::Record(id) => write!(f, "record#{}", id.index()),
        }
    }
}

// =============================================================================
// Record Storage
// =============================================================================

/// Stable handle to a record slot inside a [`RecordGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(u32);

impl RecordId {
    /// Get the slot index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named, user-defined structure: fully qualified type name plus an ordered
/// field map with string keys.
///
/// Field equality is order-insensitive: two records are equal when they have
/// the same type name and the same field set, regardless of the order the
/// fields were assigned in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordValue {
    /// Fully qualified type name; mandatory and non-empty on the wire
    pub type_name: String,
    /// name -> value pairs in assignment order; `set` replaces in place
    fields: Vec<(String, Value)>,
}

impl RecordValue {
    /// Create an empty record of the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Set a field, replacing any existing value under the same name.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if let Some(entry) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set(name, value);
        self
    }

    /// Get a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over the fields in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl PartialEq for RecordValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

/// Arena of record instances built during one encode/decode pass.
///
/// Every record gets a stable slot at header time; values that point at the
/// record capture its [`RecordId`] index instead of an owning pointer, so
/// cyclic graphs carry no ownership cycles. The graph travels with the
/// [`Message`](crate::core::Message) that owns it and is never shared between
/// messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordGraph {
    records: Vec<RecordValue>,
}

impl RecordGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record and return its stable handle.
    pub fn insert(&mut self, record: RecordValue) -> RecordId {
        let id = RecordId(self.records.len() as u32);
        self.records.push(record);
        id
    }

    /// Get a record by handle.
    pub fn get(&self, id: RecordId) -> Option<&RecordValue> {
        self.records.get(id.index())
    }

    /// Get a mutable record by handle.
    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut RecordValue> {
        self.records.get_mut(id.index())
    }

    /// Number of records in the graph.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the graph holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over (handle, record) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &RecordValue)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (RecordId(i as u32), r))
    }
}
