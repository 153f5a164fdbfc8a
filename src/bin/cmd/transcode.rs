// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Transcode command - convert messages between UADP and JSON.

use std::path::PathBuf;

use clap::Subcommand;
use tracing::debug;

use crate::common::{codec_factory, parse_hex, read_input, Result};
use uapubsub::{Encoding, JsonCodec};

/// Convert between encodings.
#[derive(Subcommand, Clone, Debug)]
pub enum TranscodeCmd {
    /// Decode a UADP frame and print it as JSON
    ToJson {
        /// Frame as hex (whitespace allowed)
        #[arg(value_name = "HEX")]
        hex: String,

        /// Publisher configuration with writer schemas and UADP options
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Decode a JSON message and print the UADP frame as hex
    ToUadp {
        /// JSON file, or - for stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Publisher configuration with writer schemas and UADP options
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

impl TranscodeCmd {
    pub fn run(self) -> Result<()> {
        match self {
            Self::ToJson {
                hex,
                config,
                pretty,
            } => cmd_to_json(&hex, config, pretty),
            Self::ToUadp { input, config } => cmd_to_uadp(input, config),
        }
    }
}

fn cmd_to_json(hex: &str, config: Option<PathBuf>, pretty: bool) -> Result<()> {
    let bytes = parse_hex(hex)?;
    let factory = codec_factory(config.as_deref())?;

    let message = factory.create(Encoding::Uadp).decode(&bytes)?;
    let text = JsonCodec::new().with_pretty(pretty).encode(&message)?;
    debug!(uadp_bytes = bytes.len(), json_bytes = text.len(), "transcoded");

    println!("{text}");
    Ok(())
}

fn cmd_to_uadp(input: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let text = read_input(&input)?;
    let factory = codec_factory(config.as_deref())?;

    let message = factory.create(Encoding::Json).decode(text.trim().as_bytes())?;
    let bytes = factory.create(Encoding::Uadp).encode(&message)?;
    debug!(json_bytes = text.len(), uadp_bytes = bytes.len(), "transcoded");

    println!("{}", hex::encode(&bytes));
    Ok(())
}
