// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! JSON NetworkMessage codec (OPC UA Part 14 §7.2.5).
//!
//! ## Example
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use uapubsub::encoding::json::JsonCodec;
//! use uapubsub::{DataSetMessage, Field, NetworkMessage, VariantValue};
//!
//! let dsm = DataSetMessage::new(1000, 1, vec![Field::new("Val_F32_A", VariantValue::new(42.0f32))])?;
//! let msg = NetworkMessage::new("ESP32-Bench", vec![dsm])?;
//!
//! let text = JsonCodec::new().encode(&msg)?;
//! assert!(text.contains(r#""Value":42.0"#));
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde_json::{Map, Number, Value};
use tracing::debug;
use uuid::Uuid;

use crate::core::{
    CodecError, DataSetClassId, DataSetMessage, DataSetSchema, Encoding, Field, NetworkMessage,
    PublisherId, Result, SchemaRegistry, StatusCode, VariantValue,
};
use crate::encoding::codec::log_decode_failure;
use crate::encoding::registry::VariantRegistry;

/// `MessageType` of data NetworkMessages.
pub const UA_DATA: &str = "ua-data";

/// JSON codec with receiver-side schemas.
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    schemas: SchemaRegistry,
    pretty: bool,
}

impl JsonCodec {
    /// Create a new JSON codec producing compact output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce indented output.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    pub fn schemas_mut(&mut self) -> &mut SchemaRegistry {
        &mut self.schemas
    }

    /// Register the field layout of a writer.
    pub fn register_schema(&mut self, schema: DataSetSchema) {
        self.schemas.register(schema);
    }

    // ========================================================================
    // Encode
    // ========================================================================

    /// Encode, stamping unset source timestamps with the current instant.
    pub fn encode(&self, message: &NetworkMessage) -> Result<String> {
        self.encode_at(message, Utc::now())
    }

    /// Encode, stamping unset source timestamps with `now`.
    ///
    /// A message without a MessageId gets a fresh UUID.
    pub fn encode_at(&self, message: &NetworkMessage, now: DateTime<Utc>) -> Result<String> {
        let mut root = Map::new();
        let message_id = match message.message_id() {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        root.insert("MessageId".into(), Value::String(message_id));
        root.insert("MessageType".into(), Value::String(UA_DATA.into()));
        root.insert("PublisherId".into(), publisher_id_to_json(message.publisher_id()));
        if let Some(class_id) = message.dataset_class_id() {
            root.insert("DataSetClassId".into(), Value::String(class_id.to_string()));
        }

        let mut messages = Vec::with_capacity(message.messages().len());
        for dsm in message.messages() {
            messages.push(Value::Object(encode_dataset_message(dsm, now)?));
        }
        root.insert("Messages".into(), Value::Array(messages));

        let root = Value::Object(root);
        let text = if self.pretty {
            serde_json::to_string_pretty(&root)?
        } else {
            serde_json::to_string(&root)?
        };

        debug!(
            publisher_id = %message.publisher_id(),
            messages = message.messages().len(),
            bytes = text.len(),
            "JSON NetworkMessage encoded"
        );
        Ok(text)
    }

    // ========================================================================
    // Decode
    // ========================================================================

    /// Decode a JSON NetworkMessage.
    pub fn decode(&self, text: &str) -> Result<NetworkMessage> {
        let result = serde_json::from_str::<Value>(text)
            .map_err(CodecError::from)
            .and_then(|root| self.decode_value(&root));
        if let Err(err) = &result {
            log_decode_failure(Encoding::Json, text.len(), err);
        }
        result
    }

    /// Decode a JSON NetworkMessage from UTF-8 bytes.
    pub fn decode_bytes(&self, data: &[u8]) -> Result<NetworkMessage> {
        let text = std::str::from_utf8(data)
            .map_err(|e| CodecError::format("json", format!("invalid UTF-8: {e}")))?;
        self.decode(text)
    }

    fn decode_value(&self, root: &Value) -> Result<NetworkMessage> {
        let root = root
            .as_object()
            .ok_or_else(|| CodecError::format("NetworkMessage", "expected a JSON object"))?;

        let message_type = required(root, "MessageType", "NetworkMessage")?
            .as_str()
            .ok_or_else(|| CodecError::format("MessageType", "expected a string"))?;
        if message_type != UA_DATA {
            return Err(CodecError::format(
                "MessageType",
                format!("expected '{UA_DATA}', found '{message_type}'"),
            ));
        }

        let message_id = required(root, "MessageId", "NetworkMessage")?
            .as_str()
            .ok_or_else(|| CodecError::format("MessageId", "expected a string"))?
            .to_string();
        let publisher_id = publisher_id_from_json(required(root, "PublisherId", "NetworkMessage")?)?;
        let class_id = match root.get("DataSetClassId") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.parse::<DataSetClassId>()?),
            Some(_) => return Err(CodecError::format("DataSetClassId", "expected a string")),
        };

        let entries = required(root, "Messages", "NetworkMessage")?
            .as_array()
            .ok_or_else(|| CodecError::format("Messages", "expected an array"))?;
        let mut messages = Vec::with_capacity(entries.len());
        for entry in entries {
            messages.push(self.decode_dataset_message(entry, class_id)?);
        }

        let mut message = NetworkMessage::new(publisher_id, messages)?.with_message_id(message_id);
        if let Some(class_id) = class_id {
            message = message.with_class_id(class_id);
        }
        Ok(message)
    }

    fn decode_dataset_message(
        &self,
        entry: &Value,
        class_id: Option<DataSetClassId>,
    ) -> Result<DataSetMessage> {
        let entry = entry
            .as_object()
            .ok_or_else(|| CodecError::format("Messages", "entry is not an object"))?;
        let writer_id = unsigned_u32(required(entry, "DataSetWriterId", "DataSetMessage")?)
            .ok_or_else(|| CodecError::format("DataSetWriterId", "expected a UInt32"))?;
        let sequence_number = unsigned_u32(required(entry, "SequenceNumber", "DataSetMessage")?)
            .ok_or_else(|| CodecError::format("SequenceNumber", "expected a UInt32"))?;
        let payload = required(entry, "Payload", "DataSetMessage")?
            .as_object()
            .ok_or_else(|| CodecError::format("Payload", "expected an object"))?;

        let schema = self.schemas.get(writer_id);
        if let Some(schema) = schema {
            schema.check_class_id(class_id)?;
            schema.check_field_count(payload.len())?;
        }

        let mut fields = Vec::with_capacity(payload.len());
        for (index, (name, entry)) in payload.iter().enumerate() {
            let expected = match schema {
                Some(schema) => {
                    let (expected_name, tag) = &schema.fields()[index];
                    if expected_name != name {
                        return Err(CodecError::schema_mismatch(
                            writer_id,
                            format!("field {index} is '{name}', expected '{expected_name}'"),
                        ));
                    }
                    Some(*tag)
                }
                None => None,
            };
            let value = decode_field(writer_id, name, entry, expected)?;
            fields.push(Field::new(name.clone(), value));
        }

        DataSetMessage::new(writer_id, sequence_number, fields)
    }
}

fn encode_dataset_message(dsm: &DataSetMessage, now: DateTime<Utc>) -> Result<Map<String, Value>> {
    let mut payload = Map::new();
    for field in dsm.fields() {
        let value = &field.value;
        let mut entry = Map::new();
        entry.insert("Value".into(), VariantRegistry::to_json(value.value())?);
        entry.insert(
            "SourceTimestamp".into(),
            Value::String(VariantRegistry::to_iso8601(value.timestamp_or(now))),
        );
        if value.status() != StatusCode::Good {
            entry.insert(
                "StatusCode".into(),
                Value::Number(Number::from(value.status().code())),
            );
        }
        payload.insert(field.name.clone(), Value::Object(entry));
    }

    let mut object = Map::new();
    object.insert(
        "DataSetWriterId".into(),
        Value::Number(Number::from(dsm.writer_id())),
    );
    object.insert(
        "SequenceNumber".into(),
        Value::Number(Number::from(dsm.sequence_number())),
    );
    object.insert("Payload".into(), Value::Object(payload));
    Ok(object)
}

fn decode_field(
    writer_id: u32,
    name: &str,
    entry: &Value,
    expected: Option<crate::core::TypeTag>,
) -> Result<VariantValue> {
    let entry = entry
        .as_object()
        .ok_or_else(|| CodecError::format("Payload", format!("field '{name}' is not an object")))?;
    let literal = required(entry, "Value", name)?;

    let value = match expected {
        Some(tag) => VariantRegistry::from_json(tag, literal).ok_or_else(|| {
            CodecError::schema_mismatch(
                writer_id,
                format!("field '{name}' value {literal} is not a {tag}"),
            )
        })?,
        None => VariantRegistry::infer_json(literal)?,
    };

    let status = match entry.get("StatusCode") {
        None | Some(Value::Null) => StatusCode::Good,
        Some(code) => code
            .as_u64()
            .and_then(|c| u32::try_from(c).ok())
            .map(StatusCode::from_code)
            .ok_or_else(|| {
                CodecError::format("StatusCode", format!("field '{name}': expected a UInt32"))
            })?,
    };

    let source_timestamp = match entry.get("SourceTimestamp") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(VariantRegistry::parse_iso8601(s)?),
        Some(_) => {
            return Err(CodecError::format(
                "SourceTimestamp",
                format!("field '{name}': expected a string"),
            ))
        }
    };

    Ok(VariantValue::from_parts(value, status, source_timestamp))
}

fn required<'a>(object: &'a Map<String, Value>, key: &str, context: &str) -> Result<&'a Value> {
    object
        .get(key)
        .ok_or_else(|| CodecError::format(context, format!("missing '{key}'")))
}

fn unsigned_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|v| u32::try_from(v).ok())
}

fn publisher_id_to_json(id: &PublisherId) -> Value {
    match id {
        PublisherId::String(s) => Value::String(s.clone()),
        numeric => Value::Number(Number::from(numeric.as_u64().unwrap_or_default())),
    }
}

fn publisher_id_from_json(value: &Value) -> Result<PublisherId> {
    match value {
        Value::String(s) => Ok(PublisherId::String(s.clone())),
        Value::Number(n) => n
            .as_u64()
            .map(PublisherId::numeric)
            .ok_or_else(|| CodecError::format("PublisherId", format!("{n} is not a UInt64"))),
        _ => Err(CodecError::format(
            "PublisherId",
            "expected a string or number",
        )),
    }
}
