// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! UADP NetworkMessage codec.
//!
//! Encoding runs in two passes over the same message: a size pass through
//! [`UadpCalculator`] and a write pass into a [`UadpWriter`] allocated at
//! exactly that size. Decoding never yields a partially populated message;
//! any failure discards everything read so far.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::calculator::UadpCalculator;
use super::cursor::UadpCursor;
use super::header::UadpHeader;
use super::writer::UadpWriter;
use super::{FieldEncoding, UadpConfig};
use crate::core::{
    CodecError, DataSetClassId, DataSetMessage, DataSetSchema, Encoding, Field, NetworkMessage,
    Result, SchemaRegistry, StatusCode, Variant, VariantValue,
};
use crate::encoding::codec::log_decode_failure;
use crate::encoding::registry::VariantRegistry;

/// DataSetFlags1 bits.
mod dataset_flags1 {
    pub const VALID: u8 = 0x01;
    pub const FIELD_ENCODING_MASK: u8 = 0x06;
    pub const SEQUENCE_NUMBER: u8 = 0x08;
    pub const STATUS: u8 = 0x10;
    pub const CONFIG_MAJOR_VERSION: u8 = 0x20;
    pub const CONFIG_MINOR_VERSION: u8 = 0x40;
    pub const FLAGS2: u8 = 0x80;
}

/// DataSetFlags2 bits.
mod dataset_flags2 {
    pub const MESSAGE_TYPE_MASK: u8 = 0x0F;
    pub const TIMESTAMP: u8 = 0x10;
    pub const PICOSECONDS: u8 = 0x20;
}

/// DataValue EncodingMask bits.
mod data_value_mask {
    pub const VALUE: u8 = 0x01;
    pub const STATUS: u8 = 0x02;
    pub const SOURCE_TIMESTAMP: u8 = 0x04;
    pub const SERVER_TIMESTAMP: u8 = 0x08;
    pub const SOURCE_PICOSECONDS: u8 = 0x10;
    pub const SERVER_PICOSECONDS: u8 = 0x20;
}

/// Variant EncodingMask bits that mark arrays.
const VARIANT_ARRAY_MASK: u8 = 0xC0;

const RAW_DATA_ENCODING: u8 = 0x02;

/// UADP codec with its wire options and receiver-side schemas.
///
/// # Example
///
/// ```
/// use uapubsub::{DataSetMessage, Field, NetworkMessage, VariantValue};
/// use uapubsub::encoding::uadp::UadpCodec;
///
/// let dsm = DataSetMessage::new(
///     1000,
///     1,
///     vec![Field::new("Val_I32_C", VariantValue::new(42i32))],
/// )
/// .unwrap();
/// let msg = NetworkMessage::new("ESP32-Bench", vec![dsm]).unwrap();
///
/// let codec = UadpCodec::new();
/// let bytes = codec.encode(&msg).unwrap();
/// let decoded = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded.messages()[0].fields()[0].name, "Field0");
/// ```
#[derive(Debug, Clone, Default)]
pub struct UadpCodec {
    config: UadpConfig,
    schemas: SchemaRegistry,
}

impl UadpCodec {
    /// Create a codec with default wire options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: UadpConfig) -> Self {
        Self {
            config,
            schemas: SchemaRegistry::new(),
        }
    }

    pub fn config(&self) -> &UadpConfig {
        &self.config
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
    pub fn encode(&self, message: &NetworkMessage) -> Result<Vec<u8>> {
        self.encode_at(message, Utc::now())
    }

    /// Encode, stamping unset source timestamps with `now`.
    pub fn encode_at(&self, message: &NetworkMessage, now: DateTime<Utc>) -> Result<Vec<u8>> {
        let (header, total) = self.layout(message)?;

        let mut writer = UadpWriter::with_exact_size(total);
        header.write(&mut writer, &self.config)?;
        for dsm in message.messages() {
            self.write_body(dsm, now, &mut writer)?;
        }
        let bytes = writer.finish()?;

        debug!(
            publisher_id = %message.publisher_id(),
            messages = message.messages().len(),
            bytes = bytes.len(),
            "UADP NetworkMessage encoded"
        );
        Ok(bytes)
    }

    /// Exact encoded size of `message`.
    pub fn encoded_size(&self, message: &NetworkMessage) -> Result<usize> {
        self.layout(message).map(|(_, total)| total)
    }

    /// Size pass: the header to write and the total frame length.
    fn layout(&self, message: &NetworkMessage) -> Result<(UadpHeader, usize)> {
        let body_sizes = message
            .messages()
            .iter()
            .map(|dsm| self.body_size(dsm))
            .collect::<Result<Vec<_>>>()?;
        let header = UadpHeader::for_message(message, &body_sizes, &self.config)?;

        let mut calc = UadpCalculator::new();
        header.size(&mut calc, &self.config)?;
        Ok((header, calc.size() + body_sizes.iter().sum::<usize>()))
    }

    fn body_size(&self, dsm: &DataSetMessage) -> Result<usize> {
        check_body_limits(dsm)?;
        let mut calc = UadpCalculator::new();
        calc.uint8(); // DataSetFlags1
        calc.uint16(); // SequenceNumber
        calc.uint16(); // FieldCount
        for field in dsm.fields() {
            let value = &field.value;
            match self.config.field_encoding {
                FieldEncoding::Variant => {
                    calc.uint8();
                    VariantRegistry::size_uadp(value.value(), &mut calc)?;
                }
                FieldEncoding::DataValue => {
                    calc.uint8(); // EncodingMask
                    calc.uint8(); // TypeId
                    VariantRegistry::size_uadp(value.value(), &mut calc)?;
                    if value.status() != StatusCode::Good {
                        calc.uint32();
                    }
                    calc.uint64();
                }
            }
        }
        Ok(calc.size())
    }

    fn write_body(
        &self,
        dsm: &DataSetMessage,
        now: DateTime<Utc>,
        writer: &mut UadpWriter,
    ) -> Result<()> {
        writer.uint8(
            dataset_flags1::VALID
                | self.config.field_encoding.flag_bits()
                | dataset_flags1::SEQUENCE_NUMBER,
        )?;
        // Both fit: check_body_limits ran in the size pass.
        writer.uint16(dsm.sequence_number() as u16)?;
        writer.uint16(dsm.fields().len() as u16)?;

        for field in dsm.fields() {
            let value = &field.value;
            let row = VariantRegistry::lookup(value.type_tag())?;
            match self.config.field_encoding {
                FieldEncoding::Variant => {
                    writer.uint8(row.type_id)?;
                    VariantRegistry::write_uadp(value.value(), writer)?;
                }
                FieldEncoding::DataValue => {
                    let mut mask = data_value_mask::VALUE | data_value_mask::SOURCE_TIMESTAMP;
                    if value.status() != StatusCode::Good {
                        mask |= data_value_mask::STATUS;
                    }
                    writer.uint8(mask)?;
                    writer.uint8(row.type_id)?;
                    VariantRegistry::write_uadp(value.value(), writer)?;
                    if value.status() != StatusCode::Good {
                        writer.uint32(value.status().code())?;
                    }
                    writer.int64(VariantRegistry::to_ticks(value.timestamp_or(now)))?;
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Decode
    // ========================================================================

    /// Decode a complete UADP NetworkMessage.
    pub fn decode(&self, data: &[u8]) -> Result<NetworkMessage> {
        let result = self.decode_message(data);
        if let Err(err) = &result {
            log_decode_failure(Encoding::Uadp, data.len(), err);
        }
        result
    }

    fn decode_message(&self, data: &[u8]) -> Result<NetworkMessage> {
        let mut cursor = UadpCursor::new(data);
        let header = UadpHeader::read(&mut cursor, &self.config)?;
        let publisher_id = header
            .publisher_id
            .ok_or_else(|| CodecError::format("UADPFlags", "PublisherId is required"))?;
        let class_id = header.dataset_class_id;

        let mut messages = Vec::with_capacity(header.writer_ids.len());
        if header.sizes.is_empty() {
            let writer_id = *header
                .writer_ids
                .first()
                .ok_or_else(|| CodecError::format("PayloadHeader", "no DataSetMessages"))?;
            messages.push(self.read_body(writer_id, class_id, &mut cursor)?);
        } else {
            for (&writer_id, &size) in header.writer_ids.iter().zip(&header.sizes) {
                let mut body = cursor.take(usize::from(size))?;
                messages.push(self.read_body(writer_id, class_id, &mut body)?);
                if !body.is_at_end() {
                    return Err(CodecError::format(
                        "DataSetMessage",
                        format!(
                            "writer {writer_id}: {} bytes beyond its fields",
                            body.remaining()
                        ),
                    ));
                }
            }
        }

        if !cursor.is_at_end() {
            return Err(CodecError::format(
                "NetworkMessage",
                format!("{} trailing bytes at {}", cursor.remaining(), cursor.position()),
            ));
        }

        let mut message = NetworkMessage::new(publisher_id, messages)?;
        if let Some(class_id) = class_id {
            message = message.with_class_id(class_id);
        }
        Ok(message)
    }

    fn read_body(
        &self,
        writer_id: u32,
        class_id: Option<DataSetClassId>,
        cursor: &mut UadpCursor<'_>,
    ) -> Result<DataSetMessage> {
        let flags1 = cursor.read_u8()?;
        if flags1 & dataset_flags1::VALID == 0 {
            return Err(CodecError::format(
                "DataSetFlags1",
                format!("writer {writer_id}: DataSetMessage not marked valid"),
            ));
        }
        let encoding = match flags1 & dataset_flags1::FIELD_ENCODING_MASK {
            0x00 => FieldEncoding::Variant,
            0x04 => FieldEncoding::DataValue,
            RAW_DATA_ENCODING => {
                return Err(CodecError::format(
                    "DataSetFlags1",
                    "RawData field encoding is not supported",
                ))
            }
            _ => {
                return Err(CodecError::format(
                    "DataSetFlags1",
                    "reserved field encoding",
                ))
            }
        };

        let flags2 = if flags1 & dataset_flags1::FLAGS2 != 0 {
            cursor.read_u8()?
        } else {
            0
        };
        let message_type = flags2 & dataset_flags2::MESSAGE_TYPE_MASK;
        if message_type != 0 {
            return Err(CodecError::format(
                "DataSetFlags2",
                format!("only key frames are supported, got message type {message_type}"),
            ));
        }

        let sequence_number = if flags1 & dataset_flags1::SEQUENCE_NUMBER != 0 {
            u32::from(cursor.read_u16()?)
        } else {
            0
        };

        // DataSetMessage header fields decoded messages do not keep.
        if flags2 & dataset_flags2::TIMESTAMP != 0 {
            cursor.skip(8)?;
        }
        if flags2 & dataset_flags2::PICOSECONDS != 0 {
            cursor.skip(2)?;
        }
        if flags1 & dataset_flags1::STATUS != 0 {
            cursor.skip(2)?;
        }
        if flags1 & dataset_flags1::CONFIG_MAJOR_VERSION != 0 {
            cursor.skip(4)?;
        }
        if flags1 & dataset_flags1::CONFIG_MINOR_VERSION != 0 {
            cursor.skip(4)?;
        }

        let count = usize::from(cursor.read_u16()?);
        let schema = self.schemas.get(writer_id);
        if let Some(schema) = schema {
            schema.check_class_id(class_id)?;
            schema.check_field_count(count)?;
        }

        let mut fields = Vec::with_capacity(count.min(cursor.remaining()));
        for index in 0..count {
            let value = match encoding {
                FieldEncoding::Variant => read_variant_field(cursor)?,
                FieldEncoding::DataValue => read_data_value_field(cursor)?,
            };
            let name = match schema {
                Some(schema) => {
                    schema.check_field_type(index, value.type_tag())?;
                    schema.fields()[index].0.clone()
                }
                None => format!("Field{index}"),
            };
            fields.push(Field::new(name, value));
        }

        DataSetMessage::new(writer_id, sequence_number, fields)
    }
}

fn check_body_limits(dsm: &DataSetMessage) -> Result<()> {
    if dsm.sequence_number() > u32::from(u16::MAX) {
        return Err(CodecError::overflow(
            "SequenceNumber",
            u64::from(dsm.sequence_number()),
            u64::from(u16::MAX),
        ));
    }
    if dsm.fields().len() > usize::from(u16::MAX) {
        return Err(CodecError::overflow(
            "FieldCount",
            dsm.fields().len() as u64,
            u64::from(u16::MAX),
        ));
    }
    Ok(())
}

fn read_variant(cursor: &mut UadpCursor<'_>) -> Result<Variant> {
    let type_byte = cursor.read_u8()?;
    if type_byte & VARIANT_ARRAY_MASK != 0 {
        return Err(CodecError::unsupported_type(format!(
            "array Variant (mask 0x{type_byte:02X})"
        )));
    }
    let row = VariantRegistry::by_type_id(type_byte)?;
    VariantRegistry::read_uadp(row.tag, cursor)
}

fn read_variant_field(cursor: &mut UadpCursor<'_>) -> Result<VariantValue> {
    Ok(VariantValue::from_parts(
        read_variant(cursor)?,
        StatusCode::Good,
        None,
    ))
}

fn read_data_value_field(cursor: &mut UadpCursor<'_>) -> Result<VariantValue> {
    let mask = cursor.read_u8()?;
    if mask & data_value_mask::VALUE == 0 {
        return Err(CodecError::format("DataValue", "field without a value"));
    }
    let value = read_variant(cursor)?;
    let status = if mask & data_value_mask::STATUS != 0 {
        StatusCode::from_code(cursor.read_u32()?)
    } else {
        StatusCode::Good
    };
    let source_timestamp = if mask & data_value_mask::SOURCE_TIMESTAMP != 0 {
        Some(VariantRegistry::from_ticks(cursor.read_i64()?)?)
    } else {
        None
    };
    if mask & data_value_mask::SERVER_TIMESTAMP != 0 {
        cursor.skip(8)?;
    }
    if mask & data_value_mask::SOURCE_PICOSECONDS != 0 {
        cursor.skip(2)?;
    }
    if mask & data_value_mask::SERVER_PICOSECONDS != 0 {
        cursor.skip(2)?;
    }
    Ok(VariantValue::from_parts(value, status, source_timestamp))
}
