// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # uapubsub CLI
//!
//! Command-line tool for OPC UA PubSub messages.
//!
//! ## Usage
//!
//! ```sh
//! # Encode the benchmark message in both encodings
//! uapubsub sample
//!
//! # Break a UADP frame down
//! uapubsub inspect d10c0b000000455350...
//!
//! # Convert between encodings
//! uapubsub transcode to-json d10c0b... --pretty
//! uapubsub transcode to-uadp message.json --config publisher.toml
//!
//! # Check a publisher configuration
//! uapubsub config validate publisher.toml
//!
//! # Print the frames a publisher would send
//! uapubsub publish --config publisher.toml -f Val_F32_A=25.5 -f Val_I32_C=42 -n 3
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{ConfigCmd, InspectCmd, PublishCmd, SampleCmd, TranscodeCmd};
use common::Result;

/// uapubsub - OPC UA PubSub UADP/JSON toolkit
#[derive(Parser, Clone)]
#[command(name = "uapubsub")]
#[command(about = "OPC UA PubSub message toolkit for UADP and JSON", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Show the header and fields of a UADP frame
    Inspect(InspectCmd),

    /// Convert a message between UADP and JSON
    #[command(subcommand)]
    Transcode(TranscodeCmd),

    /// Publisher configuration operations (validate, example)
    #[command(subcommand)]
    Config(ConfigCmd),

    /// Encode the benchmark message in both encodings
    Sample(SampleCmd),

    /// Dry-run a publisher and print the frames it would send
    Publish(PublishCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    common::init_logging(cli.verbose);

    match cli.command {
        Commands::Inspect(cmd) => cmd.run(),
        Commands::Transcode(cmd) => cmd.run(),
        Commands::Config(cmd) => cmd.run(),
        Commands::Sample(cmd) => cmd.run(),
        Commands::Publish(cmd) => cmd.run(),
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
