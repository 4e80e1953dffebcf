// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # rpccodec
//!
//! Self-describing binary codec for RPC request/response exchange.
//!
//! The codec converts an in-memory object graph (one RPC invocation or its
//! response) into a compact, type-tagged byte stream and reconstructs an
//! equivalent graph on the receiving side, without a shared compile-time
//! schema. Shared and cyclic object identity is carried by explicit
//! backreferences; record reconstruction is pluggable through mutators.
//!
//! ## Architecture
//!
//! The library is organized into three layers:
//! - `core/` - value model, record arena, message envelope, error taxonomy
//! - `registry/` - record reconstruction strategies (mutators + descriptors)
//! - `encoding/` - tag table, cursors, the decoder/encoder pair and the
//!   [`WireCodec`] facade
//!
//! ## Example: Round trip
//!
//! ```rust
//! use std::sync::Arc;
//! use rpccodec::{DynamicMutator, Message, MutatorRegistry, Value, WireCodec};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = MutatorRegistry::new();
//! registry.register_mutator(Arc::new(DynamicMutator));
//! let codec = WireCodec::new(Arc::new(registry));
//!
//! let request = Message::request("ping")
//!     .with_callback("cb1")
//!     .with_arguments(vec![Value::Int(42)]);
//! let bytes = codec.encode(&request)?;
//! let decoded = codec.decode(&bytes)?;
//! assert_eq!(decoded.method, "ping");
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{
    CodecError, Message, MessageKind, RecordGraph, RecordId, RecordValue, Result, Value,
    PROTOCOL_VERSION,
};

// Record reconstruction
pub mod registry;

pub use registry::{
    DescriptorRegistry, DynamicMutator, FieldDescriptor, FieldKind, MutatorRegistry,
    RecordDescriptor, RecordMutator,
};

// Wire encoding/decoding
pub mod encoding;

pub use encoding::{
    TypeTag, WireCodec, WireCursor, WireDecoder, WireEncoder, WireWriter, ENVELOPE_HEADER_SIZE,
};
