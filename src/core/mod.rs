// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout rpccodec.
//!
//! This module provides the foundational types for the library:
//! - [`CodecError`] - Comprehensive error handling
//! - [`Value`] - Tagged value representation
//! - [`RecordGraph`] - Arena storage for shared/cyclic record instances
//! - [`Message`] - The request/response envelope

pub mod error;
pub mod message;
pub mod value;

pub use error::{CodecError, Result};
pub use message::{Message, MessageKind, PROTOCOL_VERSION};
pub use value::{RecordGraph, RecordId, RecordValue, Value};
