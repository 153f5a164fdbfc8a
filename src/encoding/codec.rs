// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Unified codec interface for encoding-agnostic publishing.
//!
//! ## Architecture
//!
//! - **Core trait** ([`MessageCodec`]) - Define the interface
//! - **Encoding-specific implementations** ([`UadpCodec`], [`JsonCodec`])
//! - **Factory** ([`CodecFactory`]) - Creates the codec for an [`Encoding`]
//!
//! ## Example
//!
//! ```
//! use uapubsub::encoding::CodecFactory;
//! use uapubsub::Encoding;
//!
//! let codec = CodecFactory::new().create(Encoding::Json);
//! assert_eq!(codec.encoding_type(), Encoding::Json);
//! ```

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::core::{
    CodecError, DataSetSchema, Encoding, ErrorKind, NetworkMessage, Result, SchemaRegistry,
};

pub use super::json::JsonCodec;
pub use super::uadp::{UadpCodec, UadpConfig};

// =============================================================================
// Message Codec Trait
// =============================================================================

/// Unified codec interface for encoding and decoding NetworkMessages.
///
/// Calls run to completion on the caller's thread; implementations hold no
/// state shared between calls apart from their schema registry.
pub trait MessageCodec: Send + Sync {
    /// Encode a message, stamping unset source timestamps with `now`.
    fn encode_at(&self, message: &NetworkMessage, now: DateTime<Utc>) -> Result<Vec<u8>>;

    /// Encode a message, stamping unset source timestamps with the current instant.
    fn encode(&self, message: &NetworkMessage) -> Result<Vec<u8>> {
        self.encode_at(message, Utc::now())
    }

    /// Decode one complete encoded message.
    fn decode(&self, data: &[u8]) -> Result<NetworkMessage>;

    /// Get the encoding type this codec handles.
    fn encoding_type(&self) -> Encoding;

    fn schemas(&self) -> &SchemaRegistry;

    fn schemas_mut(&mut self) -> &mut SchemaRegistry;

    /// Register the field layout of a writer.
    fn register_schema(&mut self, schema: DataSetSchema) {
        self.schemas_mut().register(schema);
    }
}

impl MessageCodec for UadpCodec {
    fn encode_at(&self, message: &NetworkMessage, now: DateTime<Utc>) -> Result<Vec<u8>> {
        UadpCodec::encode_at(self, message, now)
    }

    fn decode(&self, data: &[u8]) -> Result<NetworkMessage> {
        UadpCodec::decode(self, data)
    }

    fn encoding_type(&self) -> Encoding {
        Encoding::Uadp
    }

    fn schemas(&self) -> &SchemaRegistry {
        UadpCodec::schemas(self)
    }

    fn schemas_mut(&mut self) -> &mut SchemaRegistry {
        UadpCodec::schemas_mut(self)
    }
}

impl MessageCodec for JsonCodec {
    fn encode_at(&self, message: &NetworkMessage, now: DateTime<Utc>) -> Result<Vec<u8>> {
        JsonCodec::encode_at(self, message, now).map(String::into_bytes)
    }

    fn decode(&self, data: &[u8]) -> Result<NetworkMessage> {
        JsonCodec::decode_bytes(self, data)
    }

    fn encoding_type(&self) -> Encoding {
        Encoding::Json
    }

    fn schemas(&self) -> &SchemaRegistry {
        JsonCodec::schemas(self)
    }

    fn schemas_mut(&mut self) -> &mut SchemaRegistry {
        JsonCodec::schemas_mut(self)
    }
}

/// Log a rejected input: schema mismatches at warn, everything else at debug.
pub(crate) fn log_decode_failure(encoding: Encoding, len: usize, err: &CodecError) {
    if err.kind() == ErrorKind::SchemaMismatch {
        warn!(%encoding, len, error = %err, "schema mismatch on decode");
    } else {
        debug!(
            %encoding,
            len,
            kind = ?err.kind(),
            details = ?err.log_fields(),
            "decode failed"
        );
    }
}

// =============================================================================
// Codec Factory
// =============================================================================

/// Factory for creating codec instances based on encoding type.
#[derive(Debug, Clone, Default)]
pub struct CodecFactory {
    uadp: UadpConfig,
    schemas: Vec<DataSetSchema>,
}

impl CodecFactory {
    /// Create a factory with default UADP options and no schemas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use these UADP wire options.
    #[must_use]
    pub fn with_uadp_config(mut self, config: UadpConfig) -> Self {
        self.uadp = config;
        self
    }

    /// Pre-register a schema in every codec created.
    #[must_use]
    pub fn with_schema(mut self, schema: DataSetSchema) -> Self {
        self.schemas.push(schema);
        self
    }

    pub fn uadp_config(&self) -> &UadpConfig {
        &self.uadp
    }

    /// Create a codec for the specified encoding.
    pub fn create(&self, encoding: Encoding) -> Box<dyn MessageCodec> {
        let mut codec: Box<dyn MessageCodec> = match encoding {
            Encoding::Uadp => Box::new(UadpCodec::with_config(self.uadp)),
            Encoding::Json => Box::new(JsonCodec::new()),
        };
        for schema in &self.schemas {
            codec.register_schema(schema.clone());
        }
        codec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataSetMessage, Field, TypeTag, VariantValue};
    use chrono::TimeZone;

    fn sample() -> NetworkMessage {
        let dsm = DataSetMessage::new(
            3,
            4,
            vec![Field::new(
                "level",
                VariantValue::new(0.75f64)
                    .with_timestamp(Utc.timestamp_opt(1_700_000_000, 0).unwrap()),
            )],
        )
        .unwrap();
        NetworkMessage::new("tank", vec![dsm]).unwrap()
    }

    #[test]
    fn test_factory_creates_both_codecs() {
        let factory = CodecFactory::new();
        assert_eq!(factory.create(Encoding::Uadp).encoding_type(), Encoding::Uadp);
        assert_eq!(factory.create(Encoding::Json).encoding_type(), Encoding::Json);
    }

    #[test]
    fn test_factory_registers_schemas() {
        let schema = DataSetSchema::new(3, vec![("level".into(), TypeTag::Double)]);
        let factory = CodecFactory::new().with_schema(schema);
        for encoding in [Encoding::Uadp, Encoding::Json] {
            let codec = factory.create(encoding);
            assert!(codec.schemas().contains(3));
        }
    }

    #[test]
    fn test_trait_object_round_trip() {
        let msg = sample();
        let factory = CodecFactory::new().with_schema(DataSetSchema::from_message(
            &msg.messages()[0],
            None,
        ));

        let json = factory.create(Encoding::Json);
        let decoded = json.decode(&json.encode(&msg).unwrap()).unwrap();
        assert_eq!(decoded.messages(), msg.messages());

        let uadp = factory.create(Encoding::Uadp);
        let decoded = uadp.decode(&uadp.encode(&msg).unwrap()).unwrap();
        assert_eq!(
            decoded.messages()[0].field("level").unwrap().value(),
            msg.messages()[0].field("level").unwrap().value()
        );
    }
}
