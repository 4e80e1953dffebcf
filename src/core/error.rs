// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for rpccodec.
//!
//! Provides the error taxonomy shared by the decoder and encoder:
//! - Structural/framing failures (truncation, tag mismatches, bad envelopes)
//! - Record reconstruction failures (missing type identity, unresolvable types)
//! - Encode-side failures
//!
//! Structural errors are always fatal to the current encode/decode call.
//! Per-field reconstruction problems are *not* errors: they are logged at the
//! site that detects them and the field is skipped.

use std::fmt;

/// Errors that can occur while encoding or decoding a wire message.
#[derive(Debug, Clone)]
pub enum CodecError {
    /// A read was attempted past the end of available data
    Truncated {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Cursor position when the read was attempted
        position: usize,
    },

    /// A tag byte did not match the type expected at this decode site
    TypeMismatch {
        /// Name of the expected wire type
        expected: &'static str,
        /// Raw tag byte that was observed
        found: u8,
        /// Cursor position of the offending tag
        position: usize,
    },

    /// A tag byte does not map to any known wire type
    UnknownTag {
        /// Raw tag byte that was observed
        tag: u8,
        /// Cursor position of the offending tag
        position: usize,
    },

    /// A top-level part tag is not valid for a message envelope
    InvalidEnvelope {
        /// Raw tag byte that was observed
        tag: u8,
        /// Cursor position of the offending tag
        position: usize,
    },

    /// A record arrived without a usable type name
    MissingTypeName {
        /// Cursor position of the record header
        position: usize,
    },

    /// A declared element count is negative or cannot fit in the buffer
    InvalidCount {
        /// Count that was read
        count: i64,
        /// Bytes remaining in the buffer
        remaining: usize,
        /// Cursor position of the count field
        position: usize,
    },

    /// A reference id has no corresponding entry in the reference table
    UnknownReference {
        /// The id that was looked up
        reference: i32,
        /// Cursor position of the reference payload
        position: usize,
    },

    /// Value nesting exceeded the protocol's accepted limit
    DepthExceeded {
        /// The nesting limit that was exceeded
        limit: usize,
    },

    /// No descriptor or mutator could produce an instance for a type name
    TypeNotFound {
        /// Type name that could not be resolved
        type_name: String,
    },

    /// Payload bytes could not be interpreted (bad UTF-8, bad char unit, ...)
    InvalidData {
        /// What was being decoded
        context: &'static str,
        /// Error message
        message: String,
    },

    /// Encoding failed
    EncodeError {
        /// What was being encoded
        context: &'static str,
        /// Error message
        message: String,
    },

    /// Other error
    Other(String),
}

impl CodecError {
    /// Create a truncated-buffer error.
    pub fn truncated(requested: usize, available: usize, position: usize) -> Self {
        CodecError::Truncated {
            requested,
            available,
            position,
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(expected: &'static str, found: u8, position: usize) -> Self {
        CodecError::TypeMismatch {
            expected,
            found,
            position,
        }
    }

    /// Create an unknown-tag error.
    pub fn unknown_tag(tag: u8, position: usize) -> Self {
        CodecError::UnknownTag { tag, position }
    }

    /// Create an invalid-envelope error.
    pub fn invalid_envelope(tag: u8, position: usize) -> Self {
        CodecError::InvalidEnvelope { tag, position }
    }

    /// Create a missing-type-name error.
    pub fn missing_type_name(position: usize) -> Self {
        CodecError::MissingTypeName { position }
    }

    /// Create an invalid-count error.
    pub fn invalid_count(count: i64, remaining: usize, position: usize) -> Self {
        CodecError::InvalidCount {
            count,
            remaining,
            position,
        }
    }

    /// Create an unknown-reference error.
    pub fn unknown_reference(reference: i32, position: usize) -> Self {
        CodecError::UnknownReference {
            reference,
            position,
        }
    }

    /// Create a depth-exceeded error.
    pub fn depth_exceeded(limit: usize) -> Self {
        CodecError::DepthExceeded { limit }
    }

    /// Create a "type not found" error.
    pub fn type_not_found(type_name: impl Into<String>) -> Self {
        CodecError::TypeNotFound {
            type_name: type_name.into(),
        }
    }

    /// Create an invalid-data error.
    pub fn invalid_data(context: &'static str, message: impl Into<String>) -> Self {
        CodecError::InvalidData {
            context,
            message: message.into(),
        }
    }

    /// Create an encode error.
    pub fn encode(context: &'static str, message: impl Into<String>) -> Self {
        CodecError::EncodeError {
            context,
            message: message.into(),
        }
    }

    /// True for errors that indicate a malformed or corrupted byte stream,
    /// as opposed to a reconstruction problem on an otherwise valid stream.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            CodecError::Truncated { .. }
                | CodecError::TypeMismatch { .. }
                | CodecError::UnknownTag { .. }
                | CodecError::InvalidEnvelope { .. }
                | CodecError::MissingTypeName { .. }
                | CodecError::InvalidCount { .. }
                | CodecError::UnknownReference { .. }
                | CodecError::DepthExceeded { .. }
                | CodecError::InvalidData { .. }
        )
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CodecError::Truncated {
                requested,
                available,
                position,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("position", position.to_string()),
            ],
            CodecError::TypeMismatch {
                expected,
                found,
                position,
            } => vec![
                ("expected", expected.to_string()),
                ("found", found.to_string()),
                ("position", position.to_string()),
            ],
            CodecError::UnknownTag { tag, position } => vec![
                ("tag", tag.to_string()),
                ("position", position.to_string()),
            ],
            CodecError::InvalidEnvelope { tag, position } => vec![
                ("tag", tag.to_string()),
                ("position", position.to_string()),
            ],
            CodecError::MissingTypeName { position } => {
                vec![("position", position.to_string())]
            }
            CodecError::InvalidCount {
                count,
                remaining,
                position,
            } => vec![
                ("count", count.to_string()),
                ("remaining", remaining.to_string()),
                ("position", position.to_string()),
            ],
            CodecError::UnknownReference {
                reference,
                position,
            } => vec![
                ("reference", reference.to_string()),
                ("position", position.to_string()),
            ],
            CodecError::DepthExceeded { limit } => vec![("limit", limit.to_string())],
            CodecError::TypeNotFound { type_name } => vec![("type", type_name.clone())],
            CodecError::InvalidData { context, message } => vec![
                ("context", context.to_string()),
                ("message", message.clone()),
            ],
            CodecError::EncodeError { context, message } => vec![
                ("context", context.to_string()),
                ("message", message.clone()),
            ],
            CodecError::Other(msg) => vec![("message", msg.clone())],
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Truncated {
                requested,
                available,
                position,
            } => write!(
                f,
                "Truncated buffer: requested {requested} bytes at position {position}, but only {available} bytes available"
            ),
            CodecError::TypeMismatch {
                expected,
                found,
                position,
            } => write!(
                f,
                "Type mismatch at position {position}: expected {expected}, found tag {found}"
            ),
            CodecError::UnknownTag { tag, position } => {
                write!(f, "Unknown type tag {tag} at position {position}")
            }
            CodecError::InvalidEnvelope { tag, position } => write!(
                f,
                "Invalid envelope: tag {tag} at position {position} is not a method, callback or parameters part"
            ),
            CodecError::MissingTypeName { position } => write!(
                f,
                "Record at position {position} has no fully qualified type name"
            ),
            CodecError::InvalidCount {
                count,
                remaining,
                position,
            } => write!(
                f,
                "Invalid element count {count} at position {position} ({remaining} bytes remaining)"
            ),
            CodecError::UnknownReference {
                reference,
                position,
            } => write!(
                f,
                "Reference {reference} at position {position} does not resolve to a previously read record"
            ),
            CodecError::DepthExceeded { limit } => {
                write!(f, "Value nesting exceeds the limit of {limit}")
            }
            CodecError::TypeNotFound { type_name } => {
                write!(f, "Type not found: '{type_name}'")
            }
            CodecError::InvalidData { context, message } => {
                write!(f, "Invalid {context} payload: {message}")
            }
            CodecError::EncodeError { context, message } => {
                write!(f, "Failed to encode {context}: {message}")
            }
            CodecError::Other(msg) => write!(f, "Other error: {msg}"),
        }
    }
}

impl std::error::Error for CodecError {}

/// Result type for rpccodec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
