// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Cross-format integration tests.
//!
//! A message encoded as UADP and as JSON must decode to the same value in
//! both formats when the receiver knows the writer's schema and the UADP
//! side carries DataValue fields.

mod common;

use common::*;

use uapubsub::encoding::uadp::FieldEncoding;
use uapubsub::{
    CodecFactory, DataSetMessage, Encoding, Field, NetworkMessage, StatusCode, UadpConfig,
    VariantValue,
};

fn factory(writer_id: u32) -> CodecFactory {
    CodecFactory::new()
        .with_uadp_config(UadpConfig {
            field_encoding: FieldEncoding::DataValue,
            ..UadpConfig::default()
        })
        .with_schema(every_type_schema(writer_id))
}

fn every_type_message(writer_id: u32) -> NetworkMessage {
    let dsm = DataSetMessage::new(writer_id, 12, every_type_fields(fixed_instant())).unwrap();
    NetworkMessage::new(BENCH_PUBLISHER, vec![dsm]).unwrap()
}

#[test]
fn test_every_type_survives_both_formats() {
    let factory = factory(40);
    let msg = every_type_message(40);

    let uadp = factory.create(Encoding::Uadp);
    let from_uadp = uadp.decode(&uadp.encode(&msg).unwrap()).unwrap();

    let json = factory.create(Encoding::Json);
    let from_json = json.decode(&json.encode(&msg).unwrap()).unwrap();

    assert_eq!(from_uadp, msg);
    assert_eq!(from_json.without_message_id(), msg);
    assert_eq!(from_uadp.messages(), from_json.messages());
}

#[test]
fn test_status_codes_survive_both_formats() {
    let fields = vec![
        Field::new(
            "flow",
            VariantValue::new(3.25f64)
                .with_status(StatusCode::BadOutOfRange)
                .with_timestamp(fixed_instant()),
        ),
        Field::new(
            "level",
            VariantValue::new(0.5f32)
                .with_status(StatusCode::Other(0x4092_0000))
                .with_timestamp(fixed_instant()),
        ),
    ];
    let dsm = DataSetMessage::new(8, 1, fields).unwrap();
    let msg = NetworkMessage::new(BENCH_PUBLISHER, vec![dsm]).unwrap();
    let schema = uapubsub::DataSetSchema::from_message(&msg.messages()[0], None);
    let factory = CodecFactory::new()
        .with_uadp_config(UadpConfig {
            field_encoding: FieldEncoding::DataValue,
            ..UadpConfig::default()
        })
        .with_schema(schema);

    for encoding in [Encoding::Uadp, Encoding::Json] {
        let codec = factory.create(encoding);
        let decoded = codec.decode(&codec.encode(&msg).unwrap()).unwrap();
        assert_eq!(decoded.messages(), msg.messages(), "{encoding}");
    }
}

#[test]
fn test_good_subcodes_are_transmitted() {
    // GoodClamped: Good severity, but not Good itself.
    let clamped = StatusCode::Other(0x0030_0000);
    assert!(clamped.is_good());

    let field = Field::new(
        "setpoint",
        VariantValue::new(1.5f64)
            .with_status(clamped)
            .with_timestamp(fixed_instant()),
    );
    let dsm = DataSetMessage::new(9, 1, vec![field]).unwrap();
    let msg = NetworkMessage::new(BENCH_PUBLISHER, vec![dsm]).unwrap();
    let schema = uapubsub::DataSetSchema::from_message(&msg.messages()[0], None);
    let factory = CodecFactory::new()
        .with_uadp_config(UadpConfig {
            field_encoding: FieldEncoding::DataValue,
            ..UadpConfig::default()
        })
        .with_schema(schema);

    let json = factory.create(Encoding::Json);
    let text = String::from_utf8(json.encode(&msg).unwrap()).unwrap();
    assert!(text.contains(r#""StatusCode":3145728"#), "{text}");

    for encoding in [Encoding::Uadp, Encoding::Json] {
        let codec = factory.create(encoding);
        let decoded = codec.decode(&codec.encode(&msg).unwrap()).unwrap();
        let value = decoded.messages()[0].field("setpoint").unwrap();
        assert_eq!(value.status(), clamped, "{encoding}");
    }
}

#[test]
fn test_unset_timestamps_share_the_encode_instant() {
    let dsm = DataSetMessage::new(1, 1, bench_fields()).unwrap();
    let msg = NetworkMessage::new(BENCH_PUBLISHER, vec![dsm]).unwrap();
    let factory = CodecFactory::new().with_uadp_config(UadpConfig {
        field_encoding: FieldEncoding::DataValue,
        ..UadpConfig::default()
    });

    for encoding in [Encoding::Uadp, Encoding::Json] {
        let codec = factory.create(encoding);
        let decoded = codec
            .decode(&codec.encode_at(&msg, fixed_instant()).unwrap())
            .unwrap();
        for field in decoded.messages()[0].fields() {
            assert_eq!(field.value.source_timestamp(), Some(fixed_instant()));
        }
    }
}

#[test]
fn test_uadp_to_json_transcode() {
    let uadp = {
        let mut codec = uapubsub::UadpCodec::new();
        codec.register_schema(bench_schema());
        codec
    };
    let decoded = uadp.decode(&bench_uadp_bytes()).unwrap();

    let text = uapubsub::JsonCodec::new()
        .encode_at(&decoded, fixed_instant())
        .unwrap();
    assert!(text.contains(r#""Val_F32_A":{"Value":25.5,"#));
    assert!(text.contains(r#""Val_I32_C":{"Value":42,"#));
    assert!(text.contains(BENCH_CLASS_ID));
}
