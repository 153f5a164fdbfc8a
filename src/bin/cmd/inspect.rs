// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect command - break a UADP frame down into header and fields.

use std::path::PathBuf;

use clap::Args;

use crate::common::{codec_factory, format_bytes, parse_hex, Result};
use uapubsub::encoding::uadp::header::{ext_flags1, uadp_flags};
use uapubsub::encoding::uadp::{UadpCursor, UadpHeader};
use uapubsub::{Encoding, StatusCode};

/// Inspect a UADP frame.
#[derive(Args, Clone, Debug)]
pub struct InspectCmd {
    /// Frame as hex (whitespace allowed)
    #[arg(value_name = "HEX")]
    hex: String,

    /// Publisher configuration with writer schemas and UADP options
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl InspectCmd {
    pub fn run(self) -> Result<()> {
        let bytes = parse_hex(&self.hex)?;
        let factory = codec_factory(self.config.as_deref())?;
        let uadp_config = *factory.uadp_config();

        println!("=== UADP frame ({}) ===", format_bytes(bytes.len()));

        let header = UadpHeader::read(&mut UadpCursor::new(&bytes), &uadp_config)?;
        print_header(&header);

        let codec = factory.create(Encoding::Uadp);
        let message = codec.decode(&bytes)?;

        println!();
        for dsm in message.messages() {
            println!(
                "DataSetMessage writer={} seq={} fields={}",
                dsm.writer_id(),
                dsm.sequence_number(),
                dsm.fields().len()
            );
            for field in dsm.fields() {
                let value = &field.value;
                print!("  {} ({}) = {}", field.name, value.type_tag(), value.value());
                if value.status() != StatusCode::Good {
                    print!(" [{}]", value.status());
                }
                if let Some(ts) = value.source_timestamp() {
                    print!(" @ {}", ts.to_rfc3339());
                }
                println!();
            }
        }

        Ok(())
    }
}

fn print_header(header: &UadpHeader) {
    let flags = header.flags;
    println!("UADPFlags:       0x{flags:02X}");
    println!("  Version:       {}", header.version());
    println!(
        "  PublisherId:   {}",
        yes_no(flags & uadp_flags::PUBLISHER_ID != 0)
    );
    println!(
        "  PayloadHeader: {}",
        yes_no(flags & uadp_flags::PAYLOAD_HEADER != 0)
    );
    if header.has_extended_flags1() {
        let ext = header.extended_flags1;
        println!("ExtendedFlags1:  0x{ext:02X}");
        println!(
            "  PublisherIdType: {}",
            ext & ext_flags1::PUBLISHER_ID_TYPE_MASK
        );
        println!(
            "  DataSetClassId:  {}",
            yes_no(ext & ext_flags1::DATASET_CLASS_ID != 0)
        );
    }
    if let Some(id) = &header.publisher_id {
        println!("PublisherId:     {id} ({id:?})");
    }
    if let Some(class_id) = header.dataset_class_id {
        println!("DataSetClassId:  {class_id}");
    }
    println!("DataSetWriters:  {:?}", header.writer_ids);
    if !header.sizes.is_empty() {
        println!("Sizes:           {:?}", header.sizes);
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
