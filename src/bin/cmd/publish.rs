// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Publish command - dry-run a publisher against an in-memory transport.

use std::path::PathBuf;

use anyhow::{anyhow, bail};
use clap::Args;
use serde_json::Value;

use crate::common::{format_bytes, Result};
use uapubsub::config::{PublisherConfig, PublisherIdConfig};
use uapubsub::encoding::VariantRegistry;
use uapubsub::publisher::{MemoryTransport, Publisher};
use uapubsub::{DataSetSchema, Encoding, Field, VariantValue};

/// Publish messages for one writer and print the frames instead of sending them.
#[derive(Args, Clone, Debug)]
pub struct PublishCmd {
    /// Publisher configuration (defaults to publisher "ESP32-Bench")
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the configured encoding
    #[arg(short, long)]
    encoding: Option<Encoding>,

    /// DataSetWriterId to publish for
    #[arg(short, long, default_value_t = 1000)]
    writer: u32,

    /// Field as NAME=VALUE, VALUE being a JSON literal (repeatable)
    #[arg(short, long = "field", value_name = "NAME=VALUE", required = true)]
    fields: Vec<String>,

    /// Number of messages to publish
    #[arg(short = 'n', long, default_value_t = 1)]
    count: u32,

    /// Topic suffix appended to the configured topic
    #[arg(long, value_name = "SUFFIX", default_value = "")]
    suffix: String,
}

impl PublishCmd {
    pub fn run(self) -> Result<()> {
        let mut config = match &self.config {
            Some(path) => PublisherConfig::load(path)?,
            None => PublisherConfig::new(
                PublisherIdConfig::Text("ESP32-Bench".into()),
                Encoding::default(),
            ),
        };
        if let Some(encoding) = self.encoding {
            config.publisher.encoding = encoding;
        }

        let schemas = config.schemas()?;
        let schema = schemas.iter().find(|s| s.writer_id() == self.writer);
        let fields = self
            .fields
            .iter()
            .map(|arg| parse_field(arg, schema))
            .collect::<Result<Vec<_>>>()?;

        let mut publisher = Publisher::new(&config, MemoryTransport::new())?;
        for _ in 0..self.count {
            let receipt = publisher.publish_to(self.writer, fields.clone(), &self.suffix)?;
            println!(
                "seq={} topic={} ({})",
                receipt.sequence_number,
                receipt.topic,
                format_bytes(receipt.bytes)
            );
        }

        let encoding = publisher.encoding();
        for frame in publisher.transport_mut().take_frames() {
            match encoding {
                Encoding::Uadp => println!("{}", hex::encode(&frame.payload)),
                Encoding::Json => println!("{}", String::from_utf8_lossy(&frame.payload)),
            }
        }

        let stats = publisher.stats();
        println!(
            "{} messages, {}, average {:.1} bytes",
            stats.messages_sent,
            format_bytes(stats.bytes_sent as usize),
            stats.average_message_size()
        );
        Ok(())
    }
}

/// Parse `NAME=VALUE`, typing the value from the writer's schema when there is one.
fn parse_field(arg: &str, schema: Option<&DataSetSchema>) -> Result<Field> {
    let (name, raw) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("field '{arg}' is not NAME=VALUE"))?;
    if name.is_empty() {
        bail!("field '{arg}' has an empty name");
    }
    let literal =
        serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

    let tag = schema.and_then(|schema| {
        schema
            .fields()
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, tag)| *tag)
    });
    let value = match tag {
        Some(tag) => VariantRegistry::from_json(tag, &literal)
            .ok_or_else(|| anyhow!("field '{name}': '{raw}' is not a {tag}"))?,
        None => VariantRegistry::infer_json(&literal)?,
    };
    Ok(Field::new(name, VariantValue::new(value)))
}
