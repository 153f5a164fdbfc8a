// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout uapubsub.
//!
//! This module provides the foundational types for the library:
//! - [`CodecError`] - Error taxonomy shared by both codecs
//! - [`VariantValue`] - A typed measurement with quality and timestamp
//! - [`NetworkMessage`] / [`DataSetMessage`] - PubSub message model
//! - [`SchemaRegistry`] - Receiver-side writer schemas
//! - [`Encoding`] - Wire encoding identifier

pub mod error;
pub mod message;
pub mod registry;
pub mod value;

pub use error::{CodecError, ErrorKind, Result};
pub use message::{
    DataSetClassId, DataSetMessage, Field, GuidByteOrder, NetworkMessage, PublisherId,
};
pub use registry::{DataSetSchema, SchemaRegistry};
pub use value::{StatusCode, TypeTag, Variant, VariantValue};

use serde::{Deserialize, Serialize};

/// Wire encoding identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// UADP binary encoding (Part 14 §7.2.2)
    #[default]
    Uadp,
    /// JSON encoding (Part 14 §7.2.3)
    Json,
}

/// Error returned when parsing an `Encoding` from string fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseEncodingError {
    _private: (),
}

impl std::fmt::Display for ParseEncodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid encoding name, expected 'uadp' or 'json'")
    }
}

impl std::error::Error for ParseEncodingError {}

impl std::str::FromStr for Encoding {
    type Err = ParseEncodingError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uadp" | "binary" => Ok(Encoding::Uadp),
            "json" => Ok(Encoding::Json),
            _ => Err(ParseEncodingError { _private: () }),
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Encoding {
    /// Check if this encoding is UADP.
    pub fn is_uadp(&self) -> bool {
        matches!(self, Encoding::Uadp)
    }

    /// Check if this encoding is JSON.
    pub fn is_json(&self) -> bool {
        matches!(self, Encoding::Json)
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Uadp => "uadp",
            Encoding::Json => "json",
        }
    }

    /// Default publish topic for this encoding.
    pub fn default_topic(&self) -> &'static str {
        match self {
            Encoding::Uadp => "opcua/uadp/data",
            Encoding::Json => "opcua/json/data",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("uadp".parse::<Encoding>(), Ok(Encoding::Uadp));
        assert_eq!("UADP".parse::<Encoding>(), Ok(Encoding::Uadp));
        assert_eq!("json".parse::<Encoding>(), Ok(Encoding::Json));
        assert!("xml".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_encoding_default_topics() {
        assert_eq!(Encoding::Uadp.default_topic(), "opcua/uadp/data");
        assert_eq!(Encoding::Json.default_topic(), "opcua/json/data");
        assert!(Encoding::Json.is_json());
        assert!(!Encoding::Json.is_uadp());
    }
}
