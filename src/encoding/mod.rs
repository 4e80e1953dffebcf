// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire encoding and decoding.
//!
//! This module implements the self-describing binary format:
//! - [`tag`] - the fixed tag table shared by encoder and decoder
//! - [`cursor`] / [`writer`] - bounds-checked big-endian buffer access
//! - [`decoder`] - envelope and value decoding over untrusted input
//! - [`encoder`] - the symmetric graph walk
//! - [`refs`] - per-call reference tables for shared/cyclic identity
//! - [`codec`] - the [`WireCodec`] facade handed to the transport layer

pub mod codec;
pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod refs;
pub mod tag;
pub mod writer;

pub use codec::WireCodec;
pub use cursor::WireCursor;
pub use decoder::{WireDecoder, MAX_NESTING_DEPTH};
pub use encoder::WireEncoder;
pub use refs::{ReferenceAssigner, ReferenceTable};
pub use tag::TypeTag;
pub use writer::WireWriter;

/// Size of the envelope header: 1 version byte + 4-byte body size.
pub const ENVELOPE_HEADER_SIZE: usize = 5;
