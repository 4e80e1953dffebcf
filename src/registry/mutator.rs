// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Pluggable record reconstruction strategies.
//!
//! A [`RecordMutator`] builds and populates record instances for the type
//! names it recognizes, decoupling the wire format from any particular object
//! model. Mutators are discovered at process start and collected into a
//! [`MutatorRegistry`], which the decoder consults once per record: the first
//! mutator that claims a type name wins; otherwise the registry falls back to
//! the descriptor-driven reconstruction in
//! [`descriptor`](crate::registry::descriptor).

use std::sync::Arc;

use crate::core::{RecordValue, Result, Value};

use super::descriptor::{DescriptorRegistry, FieldPlan};

/// Strategy that builds a record instance for type names it recognizes.
///
/// Implementations must be safe for concurrent readers: the registry is
/// populated once at startup and shared across decode calls.
pub trait RecordMutator: Send + Sync {
    /// Whether this mutator can build instances of the given type.
    fn can_create(&self, type_name: &str) -> bool;

    /// Create a fresh, unpopulated instance of the type.
    fn new_instance(&self, type_name: &str) -> Result<RecordValue>;

    /// Assign a decoded field to the instance.
    ///
    /// Returns false when the field was not applied; the decoder logs the
    /// rejection and moves on to the next field.
    fn set(&self, instance: &mut RecordValue, field: &str, value: Value) -> bool;
}

/// Accept-all mutator that builds plain dynamic records.
///
/// Useful for inspection tooling and embedders that want every record decoded
/// generically instead of being dropped for lack of a descriptor.
#[derive(Debug, Default, Clone, Copy)]
pub struct DynamicMutator;

impl RecordMutator for DynamicMutator {
    fn can_create(&self, _type_name: &str) -> bool {
        true
    }

    fn new_instance(&self, type_name: &str) -> Result<RecordValue> {
        Ok(RecordValue::new(type_name))
    }

    fn set(&self, instance: &mut RecordValue, field: &str, value: Value) -> bool {
        instance.set(field, value);
        true
    }
}

/// How a type name resolved against the registry.
pub enum Reconstruction<'a> {
    /// A mutator claimed the type
    Mutator(&'a dyn RecordMutator),
    /// The descriptor fallback produced a field plan
    Descriptor(FieldPlan),
}

/// Process-wide collection of reconstruction strategies.
///
/// Built once at startup, then treated as immutable: decode calls only read.
/// Mutators are tried in registration order before the descriptor fallback.
#[derive(Default)]
pub struct MutatorRegistry {
    mutators: Vec<Arc<dyn RecordMutator>>,
    descriptors: DescriptorRegistry,
}

impl MutatorRegistry {
    /// Create a registry with no mutators and no descriptors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mutator. Later registrations lose ties to earlier ones.
    pub fn register_mutator(&mut self, mutator: Arc<dyn RecordMutator>) {
        self.mutators.push(mutator);
    }

    /// The descriptor registry backing the fallback strategy.
    pub fn descriptors(&self) -> &DescriptorRegistry {
        &self.descriptors
    }

    /// Number of registered mutators.
    pub fn mutator_count(&self) -> usize {
        self.mutators.len()
    }

    /// Resolve a reconstruction strategy for a type name.
    ///
    /// `Ok(None)` means neither a mutator nor a descriptor knows the type:
    /// the class-resolution failure the decoder degrades on.
    pub fn resolve(&self, type_name: &str) -> Result<Option<Reconstruction<'_>>> {
        for mutator in &self.mutators {
            if mutator.can_create(type_name) {
                return Ok(Some(Reconstruction::Mutator(mutator.as_ref())));
            }
        }
        match self.descriptors.field_plan(type_name) {
            Ok(plan) => Ok(Some(Reconstruction::Descriptor(plan))),
            Err(crate::core::CodecError::TypeNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
