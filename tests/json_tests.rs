// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! JSON encoding integration tests.
//!
//! Tests cover:
//! - Envelope keys, key order and literal forms of the benchmark message
//! - Schema-driven and inferred decoding
//! - Status codes, timestamps and non-finite decimals

mod common;

use common::*;

use serde_json::Value;
use uapubsub::encoding::json::UA_DATA;
use uapubsub::{
    DataSetMessage, ErrorKind, Field, JsonCodec, NetworkMessage, PublisherId, StatusCode, TypeTag,
    Variant, VariantValue,
};

fn schema_codec() -> JsonCodec {
    let mut codec = JsonCodec::new();
    codec.register_schema(bench_schema());
    codec
}

fn encode_value(msg: &NetworkMessage) -> Value {
    let text = JsonCodec::new().encode_at(msg, fixed_instant()).unwrap();
    serde_json::from_str(&text).unwrap()
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn test_bench_envelope() {
    let root = encode_value(&bench_message());
    let keys: Vec<&str> = root.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        [
            "MessageId",
            "MessageType",
            "PublisherId",
            "DataSetClassId",
            "Messages"
        ]
    );
    assert_eq!(root["MessageType"], UA_DATA);
    assert_eq!(root["PublisherId"], BENCH_PUBLISHER);
    assert_eq!(root["DataSetClassId"], BENCH_CLASS_ID);

    let dsm = &root["Messages"][0];
    assert_eq!(dsm["DataSetWriterId"], 1000);
    assert_eq!(dsm["SequenceNumber"], 1);
    let payload = dsm["Payload"].as_object().unwrap();
    let names: Vec<&str> = payload.keys().map(String::as_str).collect();
    assert_eq!(names, ["Val_F32_A", "Val_I32_C"]);
}

#[test]
fn test_bench_literals() {
    let text = JsonCodec::new()
        .encode_at(&bench_message(), fixed_instant())
        .unwrap();
    assert!(text.contains(r#""Val_F32_A":{"Value":25.5,"#), "{text}");
    assert!(text.contains(r#""Val_I32_C":{"Value":42,"#), "{text}");
    assert!(text.contains(r#""SourceTimestamp":"2024-05-17T08:30:15.123456700Z""#));
    assert!(!text.contains("StatusCode"));
}

#[test]
fn test_message_id_generated_when_unset() {
    let codec = JsonCodec::new();
    let first: Value = serde_json::from_str(&codec.encode(&bench_message()).unwrap()).unwrap();
    let second: Value = serde_json::from_str(&codec.encode(&bench_message()).unwrap()).unwrap();
    let first = first["MessageId"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(first).is_ok());
    assert_ne!(first, second["MessageId"].as_str().unwrap());

    let root = encode_value(&bench_message().with_message_id("msg-7"));
    assert_eq!(root["MessageId"], "msg-7");
}

#[test]
fn test_float_uses_shortest_decimal() {
    let dsm = DataSetMessage::new(
        1,
        1,
        vec![Field::new("ratio", VariantValue::new(0.1f32))],
    )
    .unwrap();
    let msg = NetworkMessage::new(BENCH_PUBLISHER, vec![dsm]).unwrap();
    let text = JsonCodec::new().encode(&msg).unwrap();
    assert!(text.contains(r#""Value":0.1,"#), "{text}");
}

#[test]
fn test_numeric_publisher_id_is_a_number() {
    let dsm = DataSetMessage::new(1, 1, bench_fields()).unwrap();
    let msg = NetworkMessage::new(PublisherId::UInt32(70_000), vec![dsm]).unwrap();
    let root = encode_value(&msg);
    assert_eq!(root["PublisherId"], 70_000);
}

#[test]
fn test_status_code_written_when_not_good() {
    let dsm = DataSetMessage::new(
        1,
        1,
        vec![Field::new(
            "temp",
            VariantValue::new(21.0f64).with_status(StatusCode::Uncertain),
        )],
    )
    .unwrap();
    let msg = NetworkMessage::new(BENCH_PUBLISHER, vec![dsm]).unwrap();
    let root = encode_value(&msg);
    assert_eq!(
        root["Messages"][0]["Payload"]["temp"]["StatusCode"],
        0x4000_0000u32
    );
}

#[test]
fn test_non_finite_decimals() {
    let dsm = DataSetMessage::new(
        1,
        1,
        vec![
            Field::new("a", VariantValue::new(f32::NAN)),
            Field::new("b", VariantValue::new(f64::INFINITY)),
            Field::new("c", VariantValue::new(f64::NEG_INFINITY)),
        ],
    )
    .unwrap();
    let msg = NetworkMessage::new(BENCH_PUBLISHER, vec![dsm]).unwrap();
    let root = encode_value(&msg);
    let payload = &root["Messages"][0]["Payload"];
    assert_eq!(payload["a"]["Value"], "NaN");
    assert_eq!(payload["b"]["Value"], "Infinity");
    assert_eq!(payload["c"]["Value"], "-Infinity");
}

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn test_decode_with_schema_restores_types() {
    let msg = bench_message().with_message_id("m-1");
    let codec = schema_codec();
    let text = codec.encode_at(&msg, fixed_instant()).unwrap();
    let decoded = codec.decode(&text).unwrap();

    assert_eq!(decoded.message_id(), Some("m-1"));
    assert_eq!(decoded.dataset_class_id(), Some(bench_class_id()));
    let dsm = &decoded.messages()[0];
    let a = dsm.field("Val_F32_A").unwrap();
    assert_eq!(a.value(), &Variant::Float(25.5));
    assert_eq!(a.status(), StatusCode::Good);
    assert_eq!(a.source_timestamp(), Some(fixed_instant()));
    assert_eq!(dsm.field("Val_I32_C").unwrap().value(), &Variant::Int32(42));
}

#[test]
fn test_decode_without_schema_infers_types() {
    let text = JsonCodec::new()
        .encode_at(&bench_message(), fixed_instant())
        .unwrap();
    let decoded = JsonCodec::new().decode(&text).unwrap();
    let dsm = &decoded.messages()[0];
    assert_eq!(dsm.field("Val_F32_A").unwrap().type_tag(), TypeTag::Double);
    assert_eq!(dsm.field("Val_I32_C").unwrap().type_tag(), TypeTag::Int32);
}

#[test]
fn test_decode_minimal_document() {
    let text = r#"{
        "MessageId": "1",
        "MessageType": "ua-data",
        "PublisherId": 12,
        "Messages": [
            {
                "DataSetWriterId": 5,
                "SequenceNumber": 3,
                "Payload": { "on": { "Value": true } }
            }
        ]
    }"#;
    let decoded = JsonCodec::new().decode(text).unwrap();
    assert_eq!(decoded.publisher_id(), &PublisherId::Byte(12));
    let value = decoded.messages()[0].field("on").unwrap();
    assert_eq!(value.value(), &Variant::Boolean(true));
    assert_eq!(value.source_timestamp(), None);
    assert_eq!(value.status(), StatusCode::Good);
}

#[test]
fn test_decode_rejects_wrong_message_type() {
    let text = r#"{"MessageId":"1","MessageType":"ua-metadata","PublisherId":"p","Messages":[]}"#;
    let err = JsonCodec::new().decode(text).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_decode_rejects_malformed_json() {
    let err = JsonCodec::new().decode(r#"{"MessageId":"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_decode_schema_name_mismatch() {
    let text = JsonCodec::new()
        .encode(&bench_message())
        .unwrap()
        .replace("Val_I32_C", "Val_I32_D");
    let err = schema_codec().decode(&text).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
}

#[test]
fn test_decode_schema_shape_mismatch() {
    let text = JsonCodec::new()
        .encode(&bench_message())
        .unwrap()
        .replace(r#""Value":42"#, r#""Value":"42""#);
    let err = schema_codec().decode(&text).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
}

#[test]
fn test_decode_non_finite_with_schema() {
    let mut codec = JsonCodec::new();
    codec.register_schema(uapubsub::DataSetSchema::new(
        1,
        vec![("a".to_string(), TypeTag::Float)],
    ));
    let text = r#"{"MessageId":"1","MessageType":"ua-data","PublisherId":"p","Messages":[
        {"DataSetWriterId":1,"SequenceNumber":1,"Payload":{"a":{"Value":"-Infinity"}}}]}"#;
    let decoded = codec.decode(text).unwrap();
    assert_eq!(
        decoded.messages()[0].field("a").unwrap().value(),
        &Variant::Float(f32::NEG_INFINITY)
    );
}
