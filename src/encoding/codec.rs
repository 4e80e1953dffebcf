// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Unified codec entry point.
//!
//! [`WireCodec`] bundles a process-wide [`MutatorRegistry`] with the encode
//! and decode operations, so the transport layer hands buffers in and gets
//! messages out without touching decoder internals. The codec itself is
//! stateless between calls: every decode gets a private cursor and reference
//! table, so one codec instance can serve concurrent calls over independent
//! buffers.

use std::sync::Arc;

use crate::core::{Message, Result};
use crate::registry::MutatorRegistry;

use super::decoder::WireDecoder;
use super::encoder::WireEncoder;

/// Encode/decode facade over one reconstruction registry.
#[derive(Clone)]
pub struct WireCodec {
    registry: Arc<MutatorRegistry>,
}

impl WireCodec {
    /// Create a codec over a registry populated at process start.
    pub fn new(registry: Arc<MutatorRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this codec consults for record reconstruction.
    pub fn registry(&self) -> &MutatorRegistry {
        &self.registry
    }

    /// Decode one fully received buffer into a message.
    pub fn decode(&self, data: &[u8]) -> Result<Message> {
        WireDecoder::new(&self.registry, data).decode()
    }

    /// Encode a message into its wire bytes.
    pub fn encode(&self, message: &Message) -> Result<Vec<u8>> {
        WireEncoder::encode(message)
    }
}

impl Default for WireCodec {
    fn default() -> Self {
        Self::new(Arc::new(MutatorRegistry::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MessageKind, Value};
    use crate::registry::{DynamicMutator, MutatorRegistry};

    fn dynamic_codec() -> WireCodec {
        let mut registry = MutatorRegistry::new();
        registry.register_mutator(Arc::new(DynamicMutator));
        WireCodec::new(Arc::new(registry))
    }

    #[test]
    fn test_codec_round_trip() {
        let codec = dynamic_codec();
        let msg = Message::request("ping")
            .with_callback("cb1")
            .with_arguments(vec![Value::Int(42), Value::String("hi".to_string())]);

        let data = codec.encode(&msg).expect("encode");
        let decoded = codec.decode(&data).expect("decode");
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_codec_is_shareable_across_threads() {
        let codec = dynamic_codec();
        let data = codec
            .encode(&Message::response("pong").with_arguments(vec![Value::Long(7)]))
            .expect("encode");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let codec = codec.clone();
                let data = data.clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        let msg = codec.decode(&data).expect("decode");
                        assert_eq!(msg.kind, MessageKind::Response);
                        assert_eq!(msg.arguments, vec![Value::Long(7)]);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("join");
        }
    }
}
