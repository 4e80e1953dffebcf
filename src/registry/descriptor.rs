// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Type descriptors and the descriptor-driven record fallback.
//!
//! When no mutator claims a record's type name, the decoder falls back to a
//! dynamic type lookup: a [`DescriptorRegistry`] maps fully qualified type
//! names to [`RecordDescriptor`]s registered at process start. A descriptor
//! declares the settable fields of a type (and optionally a parent type whose
//! fields are inherited), which is enough to instantiate a default-populated
//! record and assign decoded fields with per-field type checking.
//!
//! Field-level problems never abort a record: an unknown field name or a value
//! incompatible with the declared field kind is logged and skipped.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{CodecError, RecordValue, Result, Value};

/// Maximum number of ancestor descriptors walked when collecting fields.
pub const MAX_TYPE_DEPTH: usize = 10;

/// Declared kind of a record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// 8-bit signed integer
    Byte,
    /// 16-bit signed integer
    Short,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// Boolean
    Bool,
    /// Single character
    Char,
    /// UTF-8 string
    String,
    /// Fixed-arity sequence with a declared element kind
    Array(Box<FieldKind>),
    /// Ordered sequence with dynamic elements
    List,
    /// Deduplicated sequence with dynamic elements
    Set,
    /// Key/value pairs with dynamic entries
    Map,
    /// A nested record of any type
    Record,
    /// Accepts any value
    Any,
}

impl FieldKind {
    /// The default a freshly instantiated field holds before assignment.
    ///
    /// Primitives default to zero, reference kinds to null.
    pub fn default_value(&self) -> Value {
        match self {
            FieldKind::Byte => Value::Byte(0),
            FieldKind::Short => Value::Short(0),
            FieldKind::Int => Value::Int(0),
            FieldKind::Long => Value::Long(0),
            FieldKind::Float => Value::Float(0.0),
            FieldKind::Double => Value::Double(0.0),
            FieldKind::Bool => Value::Bool(false),
            FieldKind::Char => Value::Char('\0'),
            FieldKind::String
            | FieldKind::Array(_)
            | FieldKind::List
            | FieldKind::Set
            | FieldKind::Map
            | FieldKind::Record
            | FieldKind::Any => Value::Null,
        }
    }

    /// Check whether a decoded value is assignable to this kind as-is.
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            FieldKind::Any => true,
            FieldKind::Byte => matches!(value, Value::Byte(_)),
            FieldKind::Short => matches!(value, Value::Short(_)),
            FieldKind::Int => matches!(value, Value::Int(_)),
            FieldKind::Long => matches!(value, Value::Long(_)),
            FieldKind::Float => matches!(value, Value::Float(_)),
            FieldKind::Double => matches!(value, Value::Double(_)),
            FieldKind::Bool => matches!(value, Value::Bool(_)),
            FieldKind::Char => matches!(value, Value::Char(_)),
            FieldKind::String => matches!(value, Value::String(_)),
            FieldKind::Array(elem) => match value {
                Value::Array(items) => items.iter().all(|item| elem.admits(item)),
                _ => false,
            },
            FieldKind::List => matches!(value, Value::List(_)),
            FieldKind::Set => matches!(value, Value::Set(_)),
            FieldKind::Map => matches!(value, Value::Map(_)),
            FieldKind::Record => matches!(value, Value::Record(_)),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Byte => write!(f, "byte"),
            FieldKind::Short => write!(f, "short"),
            FieldKind::Int => write!(f, "int"),
            FieldKind::Long => write!(f, "long"),
            FieldKind::Float => write!(f, "float"),
            FieldKind::Double => write!(f, "double"),
            FieldKind::Bool => write!(f, "bool"),
            FieldKind::Char => write!(f, "char"),
            FieldKind::String => write!(f, "string"),
            FieldKind::Array(elem) => write!(f, "array<{elem}>"),
            FieldKind::List => write!(f, "list"),
            FieldKind::Set => write!(f, "set"),
            FieldKind::Map => write!(f, "map"),
            FieldKind::Record => write!(f, "record"),
            FieldKind::Any => write!(f, "any"),
        }
    }
}

/// One settable field declared by a [`RecordDescriptor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as it appears on the wire
    pub name: String,
    /// Declared kind, checked before assignment
    pub kind: FieldKind,
    /// Immutable fields are excluded from reconstruction entirely
    #[serde(default = "default_mutable")]
    pub mutable: bool,
}

fn default_mutable() -> bool {
    true
}

impl FieldDescriptor {
    /// Create a mutable field descriptor.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            mutable: true,
        }
    }

    /// Mark the field immutable, excluding it from reconstruction.
    pub fn immutable(mut self) -> Self {
        self.mutable = false;
        self
    }
}

/// Declared shape of a record type, registered by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDescriptor {
    /// Fully qualified type name
    pub name: String,
    /// Parent type whose fields are inherited, if any
    #[serde(default)]
    pub parent: Option<String>,
    /// Fields declared directly on this type
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    /// Create a descriptor with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
        }
    }

    /// Declare a mutable field.
    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDescriptor::new(name, kind));
        self
    }

    /// Declare an arbitrary field descriptor.
    pub fn with_descriptor(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the parent type.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// Flattened, reconstruction-ready view of a type: every mutable field the
/// type declares or inherits, in declaration order (own fields first).
#[derive(Debug, Clone)]
pub struct FieldPlan {
    type_name: String,
    fields: Vec<FieldDescriptor>,
}

impl FieldPlan {
    /// The type this plan builds.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The settable fields, in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Instantiate a record with every settable field at its default.
    pub fn instantiate(&self) -> RecordValue {
        let mut record = RecordValue::new(self.type_name.clone());
        for field in &self.fields {
            record.set(field.name.clone(), field.kind.default_value());
        }
        record
    }

    /// Assign one decoded field, checking it against the declared kind.
    ///
    /// Mismatches are logged and skipped; they never fail. Null values are
    /// never assigned, leaving the field at its default.
    pub fn apply(&self, instance: &mut RecordValue, field: &str, value: Value) {
        if value.is_null() {
            return;
        }
        let Some(descriptor) = self.fields.iter().find(|f| f.name == field) else {
            warn!(
                field = field,
                type_name = %self.type_name,
                "field received but not declared on type, skipping"
            );
            return;
        };
        match (&descriptor.kind, value) {
            (FieldKind::Array(elem), Value::Array(items)) => {
                // Fresh array of the declared element kind; un-coercible
                // elements keep the element default at their index.
                let coerced = items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| {
                        if elem.admits(&item) || item.is_null() {
                            item
                        } else {
                            warn!(
                                field = field,
                                type_name = %self.type_name,
                                index = index,
                                expected = %elem,
                                received = item.type_name(),
                                "array element is not assignable, using default"
                            );
                            elem.default_value()
                        }
                    })
                    .collect();
                instance.set(field, Value::Array(coerced));
            }
            (FieldKind::Array(_), other) => {
                warn!(
                    field = field,
                    type_name = %self.type_name,
                    received = other.type_name(),
                    "array field received non-array value, skipping"
                );
            }
            (kind, value) => {
                if kind.admits(&value) {
                    instance.set(field, value);
                } else {
                    warn!(
                        field = field,
                        type_name = %self.type_name,
                        expected = %kind,
                        received = value.type_name(),
                        "value is not assignable to field, skipping"
                    );
                }
            }
        }
    }
}

/// Thread-safe registry of record descriptors.
///
/// Populated once at process start and read-only during decoding; RwLock
/// gives concurrent decode calls safe shared reads.
#[derive(Default)]
pub struct DescriptorRegistry {
    inner: RwLock<HashMap<String, RecordDescriptor>>,
}

impl DescriptorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its own type name.
    pub fn register(&self, descriptor: RecordDescriptor) -> Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| CodecError::Other(format!("Descriptor registry lock poisoned: {e}")))?;
        inner.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Get a descriptor by type name.
    pub fn get(&self, name: &str) -> Result<Option<RecordDescriptor>> {
        let inner = self
            .inner
            .read()
            .map_err(|e| CodecError::Other(format!("Descriptor registry lock poisoned: {e}")))?;
        Ok(inner.get(name).cloned())
    }

    /// Check if a type name is registered.
    pub fn contains(&self, name: &str) -> Result<bool> {
        let inner = self
            .inner
            .read()
            .map_err(|e| CodecError::Other(format!("Descriptor registry lock poisoned: {e}")))?;
        Ok(inner.contains_key(name))
    }

    /// Get all registered type names.
    pub fn names(&self) -> Result<Vec<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|e| CodecError::Other(format!("Descriptor registry lock poisoned: {e}")))?;
        Ok(inner.keys().cloned().collect())
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> Result<usize> {
        let inner = self
            .inner
            .read()
            .map_err(|e| CodecError::Other(format!("Descriptor registry lock poisoned: {e}")))?;
        Ok(inner.len())
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Build the flattened field plan for a type.
    ///
    /// Walks the ancestor chain with an explicit depth-counted loop capped at
    /// [`MAX_TYPE_DEPTH`]. A field redeclared by a subtype shadows the
    /// ancestor's declaration. A missing *root* descriptor is a
    /// [`CodecError::TypeNotFound`]; a missing ancestor merely truncates the
    /// walk with a warning.
    pub fn field_plan(&self, type_name: &str) -> Result<FieldPlan> {
        let mut fields: Vec<FieldDescriptor> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut current = Some(type_name.to_string());
        let mut depth = 0;

        while let Some(name) = current.take() {
            if depth >= MAX_TYPE_DEPTH {
                warn!(
                    type_name = type_name,
                    limit = MAX_TYPE_DEPTH,
                    "ancestor chain exceeds depth limit, truncating field collection"
                );
                break;
            }
            let Some(descriptor) = self.get(&name)? else {
                if depth == 0 {
                    return Err(CodecError::type_not_found(type_name));
                }
                warn!(
                    type_name = type_name,
                    ancestor = %name,
                    "ancestor descriptor is not registered, truncating field collection"
                );
                break;
            };
            for field in &descriptor.fields {
                if field.mutable && seen.insert(field.name.clone()) {
                    fields.push(field.clone());
                }
            }
            current = descriptor.parent;
            depth += 1;
        }

        Ok(FieldPlan {
            type_name: type_name.to_string(),
            fields,
        })
    }
}
