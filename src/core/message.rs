// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Message envelope types.
//!
//! A [`Message`] is the outermost structure the codec produces and consumes:
//! one RPC request or response, carrying the invoked method name, an optional
//! callback correlation token (requests only), the argument values and the
//! record graph those arguments point into.

use serde::{Deserialize, Serialize};

use super::value::{RecordGraph, RecordId, RecordValue, Value};

/// Protocol version emitted by the encoder.
pub const PROTOCOL_VERSION: u8 = 1;

/// Whether a message is an invocation or the reply to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// An invocation of a remote method
    Request,
    /// The result of a previously issued invocation
    Response,
}

/// One request or response.
///
/// A message is constructed fresh per decode call, handed to the dispatcher
/// and never mutated afterwards; it is not pooled. The [`RecordGraph`] it owns
/// holds every record instance its arguments reference, so the message is
/// self-contained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Protocol version from the envelope header
    pub protocol_version: u8,
    /// Request or response
    pub kind: MessageKind,
    /// Name of the invoked method; required for both kinds
    pub method: String,
    /// Correlation token for async replies; request-only, absent when `None`
    pub callback: Option<String>,
    /// Ordered argument values
    pub arguments: Vec<Value>,
    /// Record instances referenced by the arguments
    pub records: RecordGraph,
}

impl Message {
    /// Create an empty request for the given method.
    pub fn request(method: impl Into<String>) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            kind: MessageKind::Request,
            method: method.into(),
            callback: None,
            arguments: Vec::new(),
            records: RecordGraph::new(),
        }
    }

    /// Create an empty response for the given method.
    pub fn response(method: impl Into<String>) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            kind: MessageKind::Response,
            method: method.into(),
            callback: None,
            arguments: Vec::new(),
            records: RecordGraph::new(),
        }
    }

    /// Set the callback correlation token.
    pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    /// Set the argument list.
    pub fn with_arguments(mut self, arguments: Vec<Value>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Insert a record into the message's graph and return its handle.
    pub fn insert_record(&mut self, record: RecordValue) -> RecordId {
        self.records.insert(record)
    }

    /// Resolve a value to the record it points at, if it is a record.
    pub fn record(&self, value: &Value) -> Option<&RecordValue> {
        match value {
            Value::Record(id) => self.records.get(*id),
            _ => None,
        }
    }

    /// Check whether this message is a request.
    pub fn is_request(&self) -> bool {
        self.kind == MessageKind::Request
    }
}
