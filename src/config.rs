// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Publisher configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! [publisher]
//! publisher_id = "ESP32-Bench"   # or an integer
//! encoding = "uadp"              # or "json"
//! topic = "opcua/uadp/data"      # defaults per encoding
//! sequence_width = 16
//!
//! [uadp]
//! writer_id_width = 16           # or 32
//! field_encoding = "variant"     # or "data-value"
//! guid_byte_order = "mixed-endian"
//!
//! [[writers]]
//! writer_id = 1000
//! class_id = "eae79794-1af7-4f96-8401-4096cd1d8908"
//! fields = [
//!     { name = "Val_F32_A", type = "Float" },
//!     { name = "Val_I32_C", type = "Int32" },
//! ]
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{DataSetClassId, DataSetSchema, Encoding, PublisherId, TypeTag};
use crate::encoding::uadp::SEQUENCE_NUMBER_WIDTH;
use crate::encoding::{CodecFactory, UadpConfig};
use crate::publisher::sequence::{SequenceTracker, MAX_SEQUENCE_WIDTH};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("publisher_id must not be empty")]
    EmptyPublisherId,

    #[error("sequence_width must be between 1 and 32, got {0}")]
    SequenceWidth(u8),

    #[error("sequence_width {width} exceeds the {max}-bit UADP SequenceNumber")]
    SequenceWidthExceedsWire { width: u8, max: u8 },

    #[error("writer {0} is configured more than once")]
    DuplicateWriter(u32),

    #[error("writer {writer_id} does not fit a {width}-bit writer id")]
    WriterIdTooWide { writer_id: u32, width: u8 },

    #[error("writer {writer_id}: field '{name}' is listed more than once")]
    DuplicateField { writer_id: u32, name: String },

    #[error("writer {writer_id}: field '{field}' has unknown type '{type_name}'")]
    UnknownType {
        writer_id: u32,
        field: String,
        type_name: String,
    },

    #[error("writer {writer_id}: invalid class_id '{value}'")]
    InvalidClassId { writer_id: u32, value: String },
}

/// PublisherId as written in TOML: a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublisherIdConfig {
    Number(u64),
    Text(String),
}

impl PublisherIdConfig {
    pub fn to_publisher_id(&self) -> PublisherId {
        match self {
            PublisherIdConfig::Number(n) => PublisherId::numeric(*n),
            PublisherIdConfig::Text(s) => PublisherId::String(s.clone()),
        }
    }
}

/// `[publisher]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublisherSection {
    pub publisher_id: PublisherIdConfig,
    #[serde(default)]
    pub encoding: Encoding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default = "default_sequence_width")]
    pub sequence_width: u8,
}

fn default_sequence_width() -> u8 {
    16
}

/// One `{ name, type }` entry of a writer's field list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// `[[writers]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriterConfig {
    pub writer_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

/// Complete publisher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublisherConfig {
    pub publisher: PublisherSection,
    #[serde(default)]
    pub uadp: UadpConfig,
    #[serde(default)]
    pub writers: Vec<WriterConfig>,
}

impl PublisherConfig {
    /// Minimal configuration with defaults for everything but the identity.
    pub fn new(publisher_id: PublisherIdConfig, encoding: Encoding) -> Self {
        Self {
            publisher: PublisherSection {
                publisher_id,
                encoding,
                topic: None,
                sequence_width: default_sequence_width(),
            },
            uadp: UadpConfig::default(),
            writers: Vec::new(),
        }
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: PublisherConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let PublisherIdConfig::Text(s) = &self.publisher.publisher_id {
            if s.is_empty() {
                return Err(ConfigError::EmptyPublisherId);
            }
        }
        let width = self.publisher.sequence_width;
        if !(1..=MAX_SEQUENCE_WIDTH).contains(&width) {
            return Err(ConfigError::SequenceWidth(width));
        }
        if self.publisher.encoding == Encoding::Uadp && width > SEQUENCE_NUMBER_WIDTH {
            return Err(ConfigError::SequenceWidthExceedsWire {
                width,
                max: SEQUENCE_NUMBER_WIDTH,
            });
        }

        let mut writer_ids = HashSet::new();
        for writer in &self.writers {
            if !writer_ids.insert(writer.writer_id) {
                return Err(ConfigError::DuplicateWriter(writer.writer_id));
            }
            if u64::from(writer.writer_id) > self.uadp.writer_id_width.max() {
                return Err(ConfigError::WriterIdTooWide {
                    writer_id: writer.writer_id,
                    width: self.uadp.writer_id_width.into(),
                });
            }
            writer_class_id(writer)?;
            writer_fields(writer)?;
        }
        Ok(())
    }

    pub fn publisher_id(&self) -> PublisherId {
        self.publisher.publisher_id.to_publisher_id()
    }

    pub fn encoding(&self) -> Encoding {
        self.publisher.encoding
    }

    /// Configured topic, or the encoding's default.
    pub fn topic(&self) -> &str {
        self.publisher
            .topic
            .as_deref()
            .unwrap_or_else(|| self.publisher.encoding.default_topic())
    }

    /// DataSetClassId of a writer, if configured.
    pub fn class_id(&self, writer_id: u32) -> Result<Option<DataSetClassId>, ConfigError> {
        match self.writers.iter().find(|w| w.writer_id == writer_id) {
            Some(writer) => writer_class_id(writer),
            None => Ok(None),
        }
    }

    /// Schemas of every writer with a field list.
    pub fn schemas(&self) -> Result<Vec<DataSetSchema>, ConfigError> {
        let mut schemas = Vec::new();
        for writer in &self.writers {
            if writer.fields.is_empty() {
                continue;
            }
            let mut schema = DataSetSchema::new(writer.writer_id, writer_fields(writer)?);
            if let Some(class_id) = writer_class_id(writer)? {
                schema = schema.with_class_id(class_id);
            }
            schemas.push(schema);
        }
        Ok(schemas)
    }

    /// Codec factory with this configuration's UADP options and schemas.
    pub fn codec_factory(&self) -> Result<CodecFactory, ConfigError> {
        let mut factory = CodecFactory::new().with_uadp_config(self.uadp);
        for schema in self.schemas()? {
            factory = factory.with_schema(schema);
        }
        Ok(factory)
    }

    pub fn sequence_tracker(&self) -> Result<SequenceTracker, ConfigError> {
        SequenceTracker::new(self.publisher.sequence_width)
            .ok_or(ConfigError::SequenceWidth(self.publisher.sequence_width))
    }
}

fn writer_class_id(writer: &WriterConfig) -> Result<Option<DataSetClassId>, ConfigError> {
    writer
        .class_id
        .as_deref()
        .map(|value| {
            value
                .parse::<DataSetClassId>()
                .map_err(|_| ConfigError::InvalidClassId {
                    writer_id: writer.writer_id,
                    value: value.to_string(),
                })
        })
        .transpose()
}

fn writer_fields(writer: &WriterConfig) -> Result<Vec<(String, TypeTag)>, ConfigError> {
    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(writer.fields.len());
    for field in &writer.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(ConfigError::DuplicateField {
                writer_id: writer.writer_id,
                name: field.name.clone(),
            });
        }
        let tag = field
            .type_name
            .parse::<TypeTag>()
            .map_err(|_| ConfigError::UnknownType {
                writer_id: writer.writer_id,
                field: field.name.clone(),
                type_name: field.type_name.clone(),
            })?;
        fields.push((field.name.clone(), tag));
    }
    Ok(fields)
}
