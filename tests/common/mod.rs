// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

use uapubsub::{
    DataSetClassId, DataSetMessage, DataSetSchema, Field, NetworkMessage, TypeTag, VariantValue,
};

// ============================================================================
// Benchmark message
// ============================================================================

pub const BENCH_PUBLISHER: &str = "ESP32-Bench";
pub const BENCH_WRITER: u32 = 1000;
pub const BENCH_CLASS_ID: &str = "eae79794-1af7-4f96-8401-4096cd1d8908";

/// Publisher configuration declaring the benchmark writer's schema.
pub const BENCH_CONFIG: &str = r#"
[publisher]
publisher_id = "ESP32-Bench"
encoding = "uadp"

[[writers]]
writer_id = 1000
class_id = "eae79794-1af7-4f96-8401-4096cd1d8908"
fields = [
    { name = "Val_F32_A", type = "Float" },
    { name = "Val_I32_C", type = "Int32" },
]
"#;

/// Class id bytes as written with the default mixed-endian GUID order.
pub const BENCH_CLASS_ID_WIRE: [u8; 16] = [
    0x94, 0x97, 0xE7, 0xEA, 0xF7, 0x1A, 0x96, 0x4F, 0x84, 0x01, 0x40, 0x96, 0xCD, 0x1D, 0x89, 0x08,
];

pub fn bench_class_id() -> DataSetClassId {
    BENCH_CLASS_ID.parse().unwrap()
}

pub fn bench_fields() -> Vec<Field> {
    vec![
        Field::new("Val_F32_A", VariantValue::new(25.5f32)),
        Field::new("Val_I32_C", VariantValue::new(42i32)),
    ]
}

/// The two-field benchmark message, with its DataSetClassId.
pub fn bench_message() -> NetworkMessage {
    let dsm = DataSetMessage::new(BENCH_WRITER, 1, bench_fields()).unwrap();
    NetworkMessage::new(BENCH_PUBLISHER, vec![dsm])
        .unwrap()
        .with_class_id(bench_class_id())
}

pub fn bench_schema() -> DataSetSchema {
    DataSetSchema::new(
        BENCH_WRITER,
        vec![
            ("Val_F32_A".to_string(), TypeTag::Float),
            ("Val_I32_C".to_string(), TypeTag::Int32),
        ],
    )
    .with_class_id(bench_class_id())
}

/// Expected UADP encoding of [`bench_message`] in Variant field mode.
pub fn bench_uadp_bytes() -> Vec<u8> {
    let mut bytes = vec![0xD1, 0x0C];
    bytes.extend_from_slice(&11i32.to_le_bytes());
    bytes.extend_from_slice(BENCH_PUBLISHER.as_bytes());
    bytes.extend_from_slice(&BENCH_CLASS_ID_WIRE);
    bytes.extend_from_slice(&[0x01, 0xE8, 0x03]);
    bytes.extend_from_slice(&[0x09, 0x01, 0x00, 0x02, 0x00]);
    bytes.push(0x0A);
    bytes.extend_from_slice(&25.5f32.to_le_bytes());
    bytes.push(0x06);
    bytes.extend_from_slice(&42i32.to_le_bytes());
    bytes
}

// ============================================================================
// Timestamps
// ============================================================================

/// A fixed instant with sub-second digits at tick resolution.
pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 15).unwrap()
        + chrono::Duration::nanoseconds(123_456_700)
}

/// One field per supported type, all with explicit timestamps.
pub fn every_type_fields(ts: DateTime<Utc>) -> Vec<Field> {
    vec![
        Field::new("flag", VariantValue::new(true).with_timestamp(ts)),
        Field::new("small", VariantValue::new(-1234i16).with_timestamp(ts)),
        Field::new("port", VariantValue::new(65000u16).with_timestamp(ts)),
        Field::new("count", VariantValue::new(-42i32).with_timestamp(ts)),
        Field::new("ratio", VariantValue::new(0.1f32).with_timestamp(ts)),
        Field::new("precise", VariantValue::new(1024.125f64).with_timestamp(ts)),
        Field::new("label", VariantValue::new("Grüße 🌡").with_timestamp(ts)),
        Field::new("when", VariantValue::new(ts).with_timestamp(ts)),
    ]
}

/// Schema matching [`every_type_fields`].
pub fn every_type_schema(writer_id: u32) -> DataSetSchema {
    DataSetSchema::new(
        writer_id,
        vec![
            ("flag".to_string(), TypeTag::Boolean),
            ("small".to_string(), TypeTag::Int16),
            ("port".to_string(), TypeTag::UInt16),
            ("count".to_string(), TypeTag::Int32),
            ("ratio".to_string(), TypeTag::Float),
            ("precise".to_string(), TypeTag::Double),
            ("label".to_string(), TypeTag::String),
            ("when".to_string(), TypeTag::DateTime),
        ],
    )
}
