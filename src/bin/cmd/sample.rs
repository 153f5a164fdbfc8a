// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Sample command - encode the benchmark message in both encodings.

use clap::Args;

use crate::common::{format_bytes, Result};
use uapubsub::{
    DataSetClassId, DataSetMessage, Field, JsonCodec, NetworkMessage, UadpCodec, VariantValue,
};

const BENCH_CLASS_ID: &str = "eae79794-1af7-4f96-8401-4096cd1d8908";

/// Encode a two-field sample message as UADP and JSON.
#[derive(Args, Clone, Debug)]
pub struct SampleCmd {
    /// Attach the DataSetClassId to the message
    #[arg(long)]
    class_id: bool,

    /// Pretty-print the JSON
    #[arg(short, long)]
    pretty: bool,
}

impl SampleCmd {
    pub fn run(self) -> Result<()> {
        let dsm = DataSetMessage::new(
            1000,
            1,
            vec![
                Field::new("Val_F32_A", VariantValue::new(25.5f32)),
                Field::new("Val_I32_C", VariantValue::new(42i32)),
            ],
        )?;
        let mut message = NetworkMessage::new("ESP32-Bench", vec![dsm])?;
        if self.class_id {
            message = message.with_class_id(BENCH_CLASS_ID.parse::<DataSetClassId>()?);
        }

        let binary = UadpCodec::new().encode(&message)?;
        let text = JsonCodec::new().with_pretty(self.pretty).encode(&message)?;

        println!("UADP ({}):", format_bytes(binary.len()));
        println!("{}", hex::encode(&binary));
        println!();
        println!("JSON ({}):", format_bytes(text.len()));
        println!("{text}");
        Ok(())
    }
}
