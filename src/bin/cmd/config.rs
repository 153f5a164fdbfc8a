// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Config command - validate and generate publisher configurations.

use std::path::PathBuf;

use clap::Subcommand;

use crate::common::Result;
use uapubsub::config::{FieldConfig, PublisherConfig, PublisherIdConfig, WriterConfig};
use uapubsub::Encoding;

/// Publisher configuration operations.
#[derive(Subcommand, Clone, Debug)]
pub enum ConfigCmd {
    /// Validate a configuration file and summarize it
    Validate {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print an example configuration
    Example {
        /// Encoding of the example publisher
        #[arg(short, long, default_value = "uadp")]
        encoding: Encoding,
    },
}

impl ConfigCmd {
    pub fn run(self) -> Result<()> {
        match self {
            Self::Validate { file } => cmd_validate(file),
            Self::Example { encoding } => cmd_example(encoding),
        }
    }
}

fn cmd_validate(file: PathBuf) -> Result<()> {
    let config = PublisherConfig::load(&file)?;

    println!("{}: OK", file.display());
    println!("  PublisherId:     {}", config.publisher_id());
    println!("  Encoding:        {}", config.encoding());
    println!("  Topic:           {}", config.topic());
    println!("  Sequence width:  {} bits", config.publisher.sequence_width);
    for schema in config.schemas()? {
        let fields: Vec<String> = schema
            .fields()
            .iter()
            .map(|(name, tag)| format!("{name}:{tag}"))
            .collect();
        print!("  Writer {}: {}", schema.writer_id(), fields.join(", "));
        if let Some(class_id) = schema.class_id() {
            print!(" (class {class_id})");
        }
        println!();
    }
    Ok(())
}

fn cmd_example(encoding: Encoding) -> Result<()> {
    let mut config = PublisherConfig::new(PublisherIdConfig::Text("ESP32-Bench".into()), encoding);
    config.writers.push(WriterConfig {
        writer_id: 1000,
        class_id: Some("eae79794-1af7-4f96-8401-4096cd1d8908".into()),
        fields: vec![
            FieldConfig {
                name: "Val_F32_A".into(),
                type_name: "Float".into(),
            },
            FieldConfig {
                name: "Val_I32_C".into(),
                type_name: "Int32".into(),
            },
        ],
    });
    config.validate()?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}
