// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Growable big-endian write buffer.
//!
//! The encoder writes a message body through this writer before the envelope
//! header is prepended; writes themselves cannot fail, all fallible logic
//! lives in the encoder.

/// Default initial capacity for the write buffer.
const DEFAULT_CAPACITY: usize = 64;

/// Write buffer producing big-endian wire bytes.
#[derive(Debug)]
pub struct WireWriter {
    buffer: Vec<u8>,
}

impl Default for WireWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl WireWriter {
    /// Create a new writer with default capacity.
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Current size of the written data.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Get a reference to the written data.
    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the writer and return the written bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }

    /// Write a single byte.
    pub fn put_u8(&mut self, value: u8) -> &mut Self {
        self.buffer.push(value);
        self
    }

    /// Write a signed byte.
    pub fn put_i8(&mut self, value: i8) -> &mut Self {
        self.buffer.push(value as u8);
        self
    }

    /// Write a big-endian u16.
    pub fn put_u16(&mut self, value: u16) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Write a big-endian i16.
    pub fn put_i16(&mut self, value: i16) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Write a big-endian i32.
    pub fn put_i32(&mut self, value: i32) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Write a big-endian i64.
    pub fn put_i64(&mut self, value: i64) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Write a big-endian f32.
    pub fn put_f32(&mut self, value: f32) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Write a big-endian f64.
    pub fn put_f64(&mut self, value: f64) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Write raw bytes.
    pub fn put_bytes(&mut self, data: &[u8]) -> &mut Self {
        self.buffer.extend_from_slice(data);
        self
    }
}
