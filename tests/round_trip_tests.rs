// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Round-trip integration tests.
//!
//! Tests cover:
//! - Encoding and decoding requests and responses through the codec facade
//! - Every supported value type surviving a round trip structurally intact
//! - Container nesting, heterogeneous elements, set/map semantics

use std::sync::Arc;

use rpccodec::{
    DynamicMutator, Message, MessageKind, MutatorRegistry, RecordValue, Value, WireCodec,
};

// ============================================================================
// Test Fixtures
// ============================================================================

fn dynamic_codec() -> WireCodec {
    let mut registry = MutatorRegistry::new();
    registry.register_mutator(Arc::new(DynamicMutator));
    WireCodec::new(Arc::new(registry))
}

fn round_trip(msg: &Message) -> Message {
    let codec = dynamic_codec();
    let data = codec.encode(msg).expect("encode");
    codec.decode(&data).expect("decode")
}

// ============================================================================
// Envelope Round Trips
// ============================================================================

#[test]
fn test_request_with_callback_and_empty_arguments() {
    let msg = Message::request("ping").with_callback("cb1");
    let decoded = round_trip(&msg);

    assert_eq!(decoded.kind, MessageKind::Request);
    assert_eq!(decoded.method, "ping");
    assert_eq!(decoded.callback.as_deref(), Some("cb1"));
    assert!(decoded.arguments.is_empty());
}

#[test]
fn test_response_with_single_int_argument() {
    let msg = Message::response("ping").with_arguments(vec![Value::Int(42)]);
    let decoded = round_trip(&msg);

    assert_eq!(decoded.kind, MessageKind::Response);
    assert_eq!(decoded.method, "ping");
    assert_eq!(decoded.callback, None);
    assert_eq!(decoded.arguments.len(), 1);
    assert_eq!(decoded.arguments[0], Value::Int(42));
}

#[test]
fn test_request_without_callback() {
    let decoded = round_trip(&Message::request("status"));
    assert_eq!(decoded.callback, None);
}

#[test]
fn test_empty_callback_is_present_not_absent() {
    let decoded = round_trip(&Message::request("status").with_callback(""));
    assert_eq!(decoded.callback.as_deref(), Some(""));
}

#[test]
fn test_full_message_equality() {
    let msg = Message::request("calc.add")
        .with_callback("corr-77")
        .with_arguments(vec![
            Value::Int(1),
            Value::Double(2.5),
            Value::String("three".to_string()),
        ]);
    assert_eq!(round_trip(&msg), msg);
}

// ============================================================================
// Primitive Round Trips
// ============================================================================

#[test]
fn test_all_primitives_round_trip() {
    let msg = Message::request("all").with_arguments(vec![
        Value::Null,
        Value::Byte(-8),
        Value::Short(-1600),
        Value::Int(-320_000),
        Value::Long(-64_000_000_000),
        Value::Float(1.5),
        Value::Double(-2.25),
        Value::Bool(true),
        Value::Bool(false),
        Value::Char('z'),
        Value::Char('é'),
        Value::String("hello".to_string()),
    ]);
    assert_eq!(round_trip(&msg), msg);
}

#[test]
fn test_integer_extremes() {
    let msg = Message::request("extremes").with_arguments(vec![
        Value::Byte(i8::MIN),
        Value::Byte(i8::MAX),
        Value::Short(i16::MIN),
        Value::Short(i16::MAX),
        Value::Int(i32::MIN),
        Value::Int(i32::MAX),
        Value::Long(i64::MIN),
        Value::Long(i64::MAX),
    ]);
    assert_eq!(round_trip(&msg), msg);
}

#[test]
fn test_float_specials() {
    let msg = Message::request("floats").with_arguments(vec![
        Value::Float(f32::MIN_POSITIVE),
        Value::Double(f64::INFINITY),
        Value::Double(f64::NEG_INFINITY),
    ]);
    assert_eq!(round_trip(&msg), msg);
}

#[test]
fn test_empty_and_unicode_strings() {
    let msg = Message::request("strings").with_arguments(vec![
        Value::String(String::new()),
        Value::String("naïve déjà-vu 日本語".to_string()),
    ]);
    assert_eq!(round_trip(&msg), msg);
}

// ============================================================================
// Container Round Trips
// ============================================================================

#[test]
fn test_heterogeneous_list() {
    let msg = Message::request("list").with_arguments(vec![Value::List(vec![
        Value::Int(1),
        Value::String("two".to_string()),
        Value::Null,
        Value::Bool(true),
    ])]);
    assert_eq!(round_trip(&msg), msg);
}

#[test]
fn test_array_preserves_order_and_duplicates() {
    let msg = Message::request("array").with_arguments(vec![Value::Array(vec![
        Value::Int(2),
        Value::Int(1),
        Value::Int(2),
    ])]);
    let decoded = round_trip(&msg);
    assert_eq!(
        decoded.arguments[0],
        Value::Array(vec![Value::Int(2), Value::Int(1), Value::Int(2)])
    );
}

#[test]
fn test_set_deduplicates_on_decode() {
    // The encoder writes whatever it is given; the decoder's set semantics
    // collapse equal elements.
    let msg = Message::request("set").with_arguments(vec![Value::Set(vec![
        Value::Int(1),
        Value::Int(1),
        Value::Int(2),
    ])]);
    let decoded = round_trip(&msg);
    assert_eq!(
        decoded.arguments[0],
        Value::Set(vec![Value::Int(1), Value::Int(2)])
    );
}

#[test]
fn test_map_with_mixed_key_types() {
    let msg = Message::request("map").with_arguments(vec![Value::Map(vec![
        (Value::String("a".to_string()), Value::Int(1)),
        (Value::Int(2), Value::String("b".to_string())),
    ])]);
    assert_eq!(round_trip(&msg), msg);
}

#[test]
fn test_nested_containers() {
    let inner = Value::Map(vec![(
        Value::String("xs".to_string()),
        Value::List(vec![Value::Int(1), Value::Int(2)]),
    )]);
    let msg = Message::request("nested")
        .with_arguments(vec![Value::List(vec![Value::Array(vec![inner])])]);
    assert_eq!(round_trip(&msg), msg);
}

#[test]
fn test_empty_containers() {
    let msg = Message::request("empty").with_arguments(vec![
        Value::Array(vec![]),
        Value::List(vec![]),
        Value::Set(vec![]),
        Value::Map(vec![]),
    ]);
    assert_eq!(round_trip(&msg), msg);
}

// ============================================================================
// Record Round Trips
// ============================================================================

#[test]
fn test_record_in_container() {
    let mut msg = Message::request("save");
    let id = msg.insert_record(
        RecordValue::new("demo.Point")
            .with("x", Value::Int(1))
            .with("y", Value::Int(2)),
    );
    msg.arguments = vec![Value::List(vec![Value::Record(id), Value::Int(9)])];

    let decoded = round_trip(&msg);
    let elements = decoded.arguments[0].as_elements().expect("list");
    let record = decoded.record(&elements[0]).expect("record resolves");
    assert_eq!(record.type_name, "demo.Point");
    assert_eq!(record.get("x"), Some(&Value::Int(1)));
    assert_eq!(record.get("y"), Some(&Value::Int(2)));
    assert_eq!(elements[1], Value::Int(9));
}

#[test]
fn test_record_field_values_of_every_shape() {
    let mut msg = Message::request("save");
    let id = msg.insert_record(
        RecordValue::new("demo.Everything")
            .with("n", Value::Null)
            .with("s", Value::String("str".to_string()))
            .with("xs", Value::List(vec![Value::Bool(false)]))
            .with(
                "m",
                Value::Map(vec![(Value::Char('k'), Value::Double(0.5))]),
            ),
    );
    msg.arguments = vec![Value::Record(id)];

    let decoded = round_trip(&msg);
    let record = decoded.record(&decoded.arguments[0]).expect("record");
    assert_eq!(record.get("n"), Some(&Value::Null));
    assert_eq!(record.get("s"), Some(&Value::String("str".to_string())));
    assert_eq!(record.get("xs"), Some(&Value::List(vec![Value::Bool(false)])));
    assert_eq!(
        record.get("m"),
        Some(&Value::Map(vec![(Value::Char('k'), Value::Double(0.5))]))
    );
}
