// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # uapubsub
//!
//! OPC UA PubSub (IEC 62541-14) data message codec for telemetry publishers.
//!
//! The library turns typed field values into PubSub NetworkMessages and back,
//! in either of two wire encodings:
//! - **UADP** binary encoding in [`encoding::uadp`](crate::encoding::uadp)
//! - **JSON** encoding in [`encoding::json`](crate::encoding::json)
//!
//! ## Architecture
//!
//! - `core/` - Error taxonomy, value model, message model, receiver schemas
//! - `encoding/` - Variant registry and the two codecs behind [`MessageCodec`]
//! - `publisher/` - Per-writer sequencing, transport contract, publish glue
//! - `config` - TOML publisher configuration
//!
//! ## Example: Encoding both formats
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use uapubsub::{DataSetMessage, Field, JsonCodec, NetworkMessage, UadpCodec, VariantValue};
//!
//! let dsm = DataSetMessage::new(
//!     1000,
//!     1,
//!     vec![
//!         Field::new("Val_F32_A", VariantValue::new(25.5f32)),
//!         Field::new("Val_I32_C", VariantValue::new(42i32)),
//!     ],
//! )?;
//! let msg = NetworkMessage::new("ESP32-Bench", vec![dsm])?;
//!
//! let binary = UadpCodec::new().encode(&msg)?;
//! let text = JsonCodec::new().encode(&msg)?;
//! assert_eq!(binary[0], 0xD1);
//! assert!(text.contains(r#""Value":25.5"#));
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Publishing
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use uapubsub::config::PublisherConfig;
//! use uapubsub::publisher::{MemoryTransport, Publisher};
//! use uapubsub::{Field, VariantValue};
//!
//! let config = PublisherConfig::from_toml_str(
//!     r#"
//!     [publisher]
//!     publisher_id = "ESP32-Bench"
//!     "#,
//! )?;
//! let mut publisher = Publisher::new(&config, MemoryTransport::new())?;
//! let receipt = publisher.publish(1000, vec![Field::new("t", VariantValue::new(21.0f32))])?;
//! assert_eq!(receipt.sequence_number, 1);
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{
    CodecError, DataSetClassId, DataSetMessage, DataSetSchema, Encoding, ErrorKind, Field,
    GuidByteOrder, NetworkMessage, PublisherId, Result, SchemaRegistry, StatusCode, TypeTag,
    Variant, VariantValue,
};

// Encoding/decoding
pub mod encoding;

pub use encoding::{CodecFactory, JsonCodec, MessageCodec, UadpCodec, UadpConfig};

// Publisher configuration
pub mod config;

// Publishing glue
pub mod publisher;
