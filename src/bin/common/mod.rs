// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::io::Read as _;
use std::path::Path;

use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

use uapubsub::config::PublisherConfig;
use uapubsub::CodecFactory;

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` selects debug and the default is warn.
pub fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parse a hex frame, ignoring whitespace and an optional `0x` prefix.
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let cleaned: String = input.split_whitespace().collect();
    let cleaned = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
        .unwrap_or(&cleaned);
    hex::decode(cleaned).with_context(|| format!("invalid hex input ({} chars)", cleaned.len()))
}

/// Read a file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

/// Codec factory for an optional configuration file.
pub fn codec_factory(config: Option<&Path>) -> Result<CodecFactory> {
    match config {
        Some(path) => Ok(PublisherConfig::load(path)?.codec_factory()?),
        None => Ok(CodecFactory::new()),
    }
}

/// Format a byte count with its unit.
pub fn format_bytes(n: usize) -> String {
    if n == 1 {
        "1 byte".to_string()
    } else {
        format!("{n} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("d1 0c").unwrap(), vec![0xD1, 0x0C]);
        assert_eq!(parse_hex("0xD10C\n").unwrap(), vec![0xD1, 0x0C]);
        assert!(parse_hex("zz").is_err());
        assert!(parse_hex("abc").is_err());
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(1), "1 byte");
        assert_eq!(format_bytes(51), "51 bytes");
    }
}
