// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Record reconstruction registry.
//!
//! Given a record's type name from the wire, the registry produces a strategy
//! for building the instance and assigning its decoded fields:
//! - [`mutator`] - pluggable [`RecordMutator`] strategies, tried first
//! - [`descriptor`] - descriptor-driven fallback for types without a mutator
//!
//! The registry is populated once at process start (the discovery mechanism
//! belongs to the embedding application) and is read-only during decoding.

pub mod descriptor;
pub mod mutator;

pub use descriptor::{
    DescriptorRegistry, FieldDescriptor, FieldKind, FieldPlan, RecordDescriptor, MAX_TYPE_DEPTH,
};
pub use mutator::{DynamicMutator, MutatorRegistry, Reconstruction, RecordMutator};
