// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! PubSub message model.
//!
//! A [`NetworkMessage`] is the transient envelope handed to exactly one codec
//! call. It carries the publisher identity, an optional schema identifier and
//! one or more [`DataSetMessage`]s, each an ordered list of named fields.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{CodecError, Result};
use super::value::VariantValue;

// =============================================================================
// PublisherId
// =============================================================================

/// Identifier of the message originator.
///
/// The representation selects the UADP PublisherIdType sub-encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PublisherId {
    Byte(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    String(String),
}

impl PublisherId {
    /// Smallest numeric representation that holds `id`.
    pub fn numeric(id: u64) -> Self {
        if let Ok(v) = u8::try_from(id) {
            PublisherId::Byte(v)
        } else if let Ok(v) = u16::try_from(id) {
            PublisherId::UInt16(v)
        } else if let Ok(v) = u32::try_from(id) {
            PublisherId::UInt32(v)
        } else {
            PublisherId::UInt64(id)
        }
    }

    /// Numeric value, if this is a numeric identifier.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            PublisherId::Byte(v) => Some(u64::from(*v)),
            PublisherId::UInt16(v) => Some(u64::from(*v)),
            PublisherId::UInt32(v) => Some(u64::from(*v)),
            PublisherId::UInt64(v) => Some(*v),
            PublisherId::String(_) => None,
        }
    }
}

impl fmt::Display for PublisherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublisherId::String(s) => write!(f, "{s}"),
            numeric => write!(f, "{}", numeric.as_u64().unwrap_or_default()),
        }
    }
}

impl From<&str> for PublisherId {
    fn from(s: &str) -> Self {
        PublisherId::String(s.to_string())
    }
}

impl From<String> for PublisherId {
    fn from(s: String) -> Self {
        PublisherId::String(s)
    }
}

// =============================================================================
// DataSetClassId
// =============================================================================

/// Byte order of a GUID on the UADP wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GuidByteOrder {
    /// Data1..Data3 little-endian, Data4 as-is (OPC UA Part 6 binary GUID).
    #[default]
    MixedEndian,
    /// The 16 bytes in textual (RFC 4122) order.
    Raw,
}

/// 128-bit identifier naming a writer's field schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataSetClassId(Uuid);

impl DataSetClassId {
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn uuid(&self) -> Uuid {
        self.0
    }

    /// Wire bytes in the given order.
    pub fn to_wire(&self, order: GuidByteOrder) -> [u8; 16] {
        match order {
            GuidByteOrder::MixedEndian => self.0.to_bytes_le(),
            GuidByteOrder::Raw => *self.0.as_bytes(),
        }
    }

    /// Parse wire bytes in the given order.
    pub fn from_wire(bytes: [u8; 16], order: GuidByteOrder) -> Self {
        match order {
            GuidByteOrder::MixedEndian => Self(Uuid::from_bytes_le(bytes)),
            GuidByteOrder::Raw => Self(Uuid::from_bytes(bytes)),
        }
    }
}

impl fmt::Display for DataSetClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl std::str::FromStr for DataSetClassId {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| CodecError::format("DataSetClassId", e.to_string()))
    }
}

// =============================================================================
// DataSetMessage
// =============================================================================

/// A named field of a DataSetMessage.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: VariantValue,
}

impl Field {
    pub fn new(name: impl Into<String>, value: VariantValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One writer's ordered set of field values plus a sequence number.
///
/// Field order is the cross-format correlation key: UADP carries fields
/// positionally, JSON by name.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSetMessage {
    writer_id: u32,
    sequence_number: u32,
    fields: Vec<Field>,
}

impl DataSetMessage {
    /// Create a message; field names must be unique.
    pub fn new(writer_id: u32, sequence_number: u32, fields: Vec<Field>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(CodecError::format(
                    "DataSetMessage",
                    format!("duplicate field name '{}'", field.name),
                ));
            }
        }
        Ok(Self {
            writer_id,
            sequence_number,
            fields,
        })
    }

    pub fn writer_id(&self) -> u32 {
        self.writer_id
    }

    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&VariantValue> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }
}

// =============================================================================
// NetworkMessage
// =============================================================================

/// Outer PubSub envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkMessage {
    message_id: Option<String>,
    publisher_id: PublisherId,
    dataset_class_id: Option<DataSetClassId>,
    messages: Vec<DataSetMessage>,
}

impl NetworkMessage {
    /// Create an envelope; at least one DataSetMessage is required.
    pub fn new(publisher_id: impl Into<PublisherId>, messages: Vec<DataSetMessage>) -> Result<Self> {
        if messages.is_empty() {
            return Err(CodecError::format(
                "NetworkMessage",
                "at least one DataSetMessage is required",
            ));
        }
        Ok(Self {
            message_id: None,
            publisher_id: publisher_id.into(),
            dataset_class_id: None,
            messages,
        })
    }

    #[must_use]
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    #[must_use]
    pub fn with_class_id(mut self, class_id: DataSetClassId) -> Self {
        self.dataset_class_id = Some(class_id);
        self
    }

    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    pub fn publisher_id(&self) -> &PublisherId {
        &self.publisher_id
    }

    pub fn dataset_class_id(&self) -> Option<DataSetClassId> {
        self.dataset_class_id
    }

    pub fn messages(&self) -> &[DataSetMessage] {
        &self.messages
    }

    /// Copy without the MessageId (UADP does not transmit one).
    #[must_use]
    pub fn without_message_id(&self) -> Self {
        Self {
            message_id: None,
            ..self.clone()
        }
    }
}
