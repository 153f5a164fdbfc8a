// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! UADP NetworkMessage header: flag bytes, PublisherId, DataSetClassId and
//! payload header.

use super::calculator::UadpCalculator;
use super::cursor::UadpCursor;
use super::writer::UadpWriter;
use super::{UadpConfig, WriterIdWidth};
use crate::core::{CodecError, DataSetClassId, NetworkMessage, PublisherId, Result};

/// UADP protocol version carried in the low nibble of UADPFlags.
pub const UADP_VERSION: u8 = 1;

/// Largest number of DataSetMessages one payload header can announce.
pub const MAX_DATASET_MESSAGES: usize = u8::MAX as usize;

/// UADPFlags bits.
pub mod uadp_flags {
    pub const VERSION_MASK: u8 = 0x0F;
    pub const PUBLISHER_ID: u8 = 0x10;
    pub const GROUP_HEADER: u8 = 0x20;
    pub const PAYLOAD_HEADER: u8 = 0x40;
    pub const EXTENDED_FLAGS1: u8 = 0x80;
}

/// ExtendedFlags1 bits.
pub mod ext_flags1 {
    pub const PUBLISHER_ID_TYPE_MASK: u8 = 0x07;
    pub const DATASET_CLASS_ID: u8 = 0x08;
    pub const SECURITY: u8 = 0x10;
    pub const TIMESTAMP: u8 = 0x20;
    pub const PICOSECONDS: u8 = 0x40;
    pub const EXTENDED_FLAGS2: u8 = 0x80;
}

/// PublisherIdType values of ExtendedFlags1.
pub mod publisher_id_type {
    pub const BYTE: u8 = 0;
    pub const UINT16: u8 = 1;
    pub const UINT32: u8 = 2;
    pub const UINT64: u8 = 3;
    pub const STRING: u8 = 4;
}

/// Decoded or to-be-encoded NetworkMessage header.
#[derive(Debug, Clone, PartialEq)]
pub struct UadpHeader {
    pub flags: u8,
    pub extended_flags1: u8,
    pub publisher_id: Option<PublisherId>,
    pub dataset_class_id: Option<DataSetClassId>,
    pub writer_ids: Vec<u32>,
    /// Per-DataSetMessage sizes; empty for a single DataSetMessage.
    pub sizes: Vec<u16>,
}

impl UadpHeader {
    /// Build the header for `message` given the encoded DataSetMessage sizes.
    ///
    /// Fails with an overflow when a writer id exceeds the configured width,
    /// there are too many DataSetMessages, or a body exceeds UInt16.
    pub fn for_message(
        message: &NetworkMessage,
        body_sizes: &[usize],
        config: &UadpConfig,
    ) -> Result<Self> {
        let count = message.messages().len();
        if count > MAX_DATASET_MESSAGES {
            return Err(CodecError::overflow(
                "DataSetMessage count",
                count as u64,
                MAX_DATASET_MESSAGES as u64,
            ));
        }

        let mut writer_ids = Vec::with_capacity(count);
        for dsm in message.messages() {
            let id = dsm.writer_id();
            if u64::from(id) > config.writer_id_width.max() {
                return Err(CodecError::overflow(
                    "DataSetWriterId",
                    u64::from(id),
                    config.writer_id_width.max(),
                ));
            }
            writer_ids.push(id);
        }

        let sizes = if count > 1 {
            body_sizes
                .iter()
                .map(|&size| {
                    u16::try_from(size).map_err(|_| {
                        CodecError::overflow("DataSetMessage size", size as u64, u16::MAX as u64)
                    })
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            Vec::new()
        };

        let publisher_id = message.publisher_id().clone();
        let mut extended_flags1 = publisher_id_type_of(&publisher_id);
        if message.dataset_class_id().is_some() {
            extended_flags1 |= ext_flags1::DATASET_CLASS_ID;
        }

        let mut flags = UADP_VERSION | uadp_flags::PUBLISHER_ID | uadp_flags::PAYLOAD_HEADER;
        if extended_flags1 != 0 {
            flags |= uadp_flags::EXTENDED_FLAGS1;
        }

        Ok(Self {
            flags,
            extended_flags1,
            publisher_id: Some(publisher_id),
            dataset_class_id: message.dataset_class_id(),
            writer_ids,
            sizes,
        })
    }

    /// Account for the header bytes.
    pub fn size(&self, calc: &mut UadpCalculator, config: &UadpConfig) -> Result<()> {
        calc.uint8();
        if self.has_extended_flags1() {
            calc.uint8();
        }
        match &self.publisher_id {
            Some(PublisherId::Byte(_)) => calc.uint8(),
            Some(PublisherId::UInt16(_)) => calc.uint16(),
            Some(PublisherId::UInt32(_)) => calc.uint32(),
            Some(PublisherId::UInt64(_)) => calc.uint64(),
            Some(PublisherId::String(s)) => calc.string(s.len())?,
            None => calc.size(),
        };
        if self.dataset_class_id.is_some() {
            calc.bytes(16);
        }
        calc.uint8();
        calc.bytes(self.writer_ids.len() * config.writer_id_width.bytes());
        calc.bytes(self.sizes.len() * 2);
        Ok(())
    }

    pub fn write(&self, writer: &mut UadpWriter, config: &UadpConfig) -> Result<()> {
        writer.uint8(self.flags)?;
        if self.has_extended_flags1() {
            writer.uint8(self.extended_flags1)?;
        }
        match &self.publisher_id {
            Some(PublisherId::Byte(v)) => writer.uint8(*v)?,
            Some(PublisherId::UInt16(v)) => writer.uint16(*v)?,
            Some(PublisherId::UInt32(v)) => writer.uint32(*v)?,
            Some(PublisherId::UInt64(v)) => writer.uint64(*v)?,
            Some(PublisherId::String(s)) => writer.string(s)?,
            None => {}
        }
        if let Some(class_id) = self.dataset_class_id {
            writer.bytes(&class_id.to_wire(config.guid_byte_order))?;
        }

        // Count fits: for_message caps it at MAX_DATASET_MESSAGES.
        writer.uint8(self.writer_ids.len() as u8)?;
        for &id in &self.writer_ids {
            match config.writer_id_width {
                WriterIdWidth::U16 => writer.uint16(id as u16)?,
                WriterIdWidth::U32 => writer.uint32(id)?,
            }
        }
        for &size in &self.sizes {
            writer.uint16(size)?;
        }
        Ok(())
    }

    /// Read and validate a header.
    pub fn read(cursor: &mut UadpCursor<'_>, config: &UadpConfig) -> Result<Self> {
        let flags = cursor.read_u8()?;
        let version = flags & uadp_flags::VERSION_MASK;
        if version != UADP_VERSION {
            return Err(CodecError::format(
                "UADPFlags",
                format!("unsupported UADP version {version}"),
            ));
        }
        if flags & uadp_flags::GROUP_HEADER != 0 {
            return Err(CodecError::format("UADPFlags", "group header is not supported"));
        }
        if flags & uadp_flags::PAYLOAD_HEADER == 0 {
            return Err(CodecError::format("UADPFlags", "payload header is required"));
        }

        let extended_flags1 = if flags & uadp_flags::EXTENDED_FLAGS1 != 0 {
            cursor.read_u8()?
        } else {
            0
        };
        if extended_flags1 & ext_flags1::SECURITY != 0 {
            return Err(CodecError::format("ExtendedFlags1", "secured messages are not supported"));
        }
        if extended_flags1 & ext_flags1::EXTENDED_FLAGS2 != 0 {
            return Err(CodecError::format("ExtendedFlags1", "ExtendedFlags2 is not supported"));
        }

        let publisher_id = if flags & uadp_flags::PUBLISHER_ID != 0 {
            Some(read_publisher_id(
                cursor,
                extended_flags1 & ext_flags1::PUBLISHER_ID_TYPE_MASK,
            )?)
        } else {
            None
        };

        let dataset_class_id = if extended_flags1 & ext_flags1::DATASET_CLASS_ID != 0 {
            Some(DataSetClassId::from_wire(
                cursor.read_guid()?,
                config.guid_byte_order,
            ))
        } else {
            None
        };

        let count = usize::from(cursor.read_u8()?);
        if count == 0 {
            return Err(CodecError::format("PayloadHeader", "no DataSetMessages"));
        }
        let mut writer_ids = Vec::with_capacity(count);
        for _ in 0..count {
            writer_ids.push(match config.writer_id_width {
                WriterIdWidth::U16 => u32::from(cursor.read_u16()?),
                WriterIdWidth::U32 => cursor.read_u32()?,
            });
        }
        // Extended NetworkMessage header sits between the payload header and
        // the Sizes array; decoded messages do not keep it.
        if extended_flags1 & ext_flags1::TIMESTAMP != 0 {
            cursor.skip(8)?;
        }
        if extended_flags1 & ext_flags1::PICOSECONDS != 0 {
            cursor.skip(2)?;
        }

        let mut sizes = Vec::new();
        if count > 1 {
            sizes.reserve(count);
            for _ in 0..count {
                sizes.push(cursor.read_u16()?);
            }
        }

        Ok(Self {
            flags,
            extended_flags1,
            publisher_id,
            dataset_class_id,
            writer_ids,
            sizes,
        })
    }

    pub fn has_extended_flags1(&self) -> bool {
        self.flags & uadp_flags::EXTENDED_FLAGS1 != 0
    }

    pub fn version(&self) -> u8 {
        self.flags & uadp_flags::VERSION_MASK
    }
}

fn publisher_id_type_of(id: &PublisherId) -> u8 {
    match id {
        PublisherId::Byte(_) => publisher_id_type::BYTE,
        PublisherId::UInt16(_) => publisher_id_type::UINT16,
        PublisherId::UInt32(_) => publisher_id_type::UINT32,
        PublisherId::UInt64(_) => publisher_id_type::UINT64,
        PublisherId::String(_) => publisher_id_type::STRING,
    }
}

fn read_publisher_id(cursor: &mut UadpCursor<'_>, id_type: u8) -> Result<PublisherId> {
    Ok(match id_type {
        publisher_id_type::BYTE => PublisherId::Byte(cursor.read_u8()?),
        publisher_id_type::UINT16 => PublisherId::UInt16(cursor.read_u16()?),
        publisher_id_type::UINT32 => PublisherId::UInt32(cursor.read_u32()?),
        publisher_id_type::UINT64 => PublisherId::UInt64(cursor.read_u64()?),
        publisher_id_type::STRING => PublisherId::String(cursor.read_string()?),
        other => {
            return Err(CodecError::format(
                "ExtendedFlags1",
                format!("reserved PublisherIdType {other}"),
            ))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataSetMessage, Field, VariantValue};

    fn network_message(publisher: PublisherId, writers: &[u32]) -> NetworkMessage {
        let messages = writers
            .iter()
            .map(|&w| {
                DataSetMessage::new(w, 0, vec![Field::new("x", VariantValue::new(1i32))]).unwrap()
            })
            .collect();
        NetworkMessage::new(publisher, messages).unwrap()
    }

    fn round_trip(header: &UadpHeader, config: &UadpConfig) -> (Vec<u8>, UadpHeader) {
        let mut calc = UadpCalculator::new();
        header.size(&mut calc, config).unwrap();
        let mut writer = UadpWriter::with_exact_size(calc.size());
        header.write(&mut writer, config).unwrap();
        let bytes = writer.finish().unwrap();
        let decoded = UadpHeader::read(&mut UadpCursor::new(&bytes), config).unwrap();
        (bytes, decoded)
    }

    #[test]
    fn test_byte_publisher_omits_extended_flags() {
        let config = UadpConfig::default();
        let msg = network_message(PublisherId::Byte(7), &[1]);
        let header = UadpHeader::for_message(&msg, &[5], &config).unwrap();
        let (bytes, decoded) = round_trip(&header, &config);
        assert_eq!(bytes, vec![0x51, 0x07, 0x01, 0x01, 0x00]);
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_string_publisher_sets_type() {
        let config = UadpConfig::default();
        let msg = network_message(PublisherId::from("AB"), &[1000]);
        let header = UadpHeader::for_message(&msg, &[5], &config).unwrap();
        let (bytes, _) = round_trip(&header, &config);
        assert_eq!(&bytes[..2], &[0xD1, 0x04]);
        assert_eq!(&bytes[2..8], &[2, 0, 0, 0, b'A', b'B']);
    }

    #[test]
    fn test_sizes_only_for_multiple_messages() {
        let config = UadpConfig::default();
        let msg = network_message(PublisherId::UInt16(300), &[1, 2]);
        let header = UadpHeader::for_message(&msg, &[10, 12], &config).unwrap();
        assert_eq!(header.sizes, vec![10, 12]);
        let (_, decoded) = round_trip(&header, &config);
        assert_eq!(decoded.writer_ids, vec![1, 2]);
        assert_eq!(decoded.sizes, vec![10, 12]);
    }

    #[test]
    fn test_writer_id_width() {
        let msg = network_message(PublisherId::Byte(1), &[70_000]);
        let err = UadpHeader::for_message(&msg, &[5], &UadpConfig::default()).unwrap_err();
        assert!(matches!(err, CodecError::Overflow { value: 70_000, .. }));

        let wide = UadpConfig {
            writer_id_width: WriterIdWidth::U32,
            ..UadpConfig::default()
        };
        let header = UadpHeader::for_message(&msg, &[5], &wide).unwrap();
        let (_, decoded) = round_trip(&header, &wide);
        assert_eq!(decoded.writer_ids, vec![70_000]);
    }

    #[test]
    fn test_read_rejects_unsupported_headers() {
        let config = UadpConfig::default();
        let cases: [&[u8]; 5] = [
            &[0x52, 0x01, 0x01, 0x01, 0x00],       // version 2
            &[0x71, 0x01, 0x01, 0x01, 0x00],       // group header
            &[0x11, 0x01],                         // no payload header
            &[0xD1, 0x10, 0x01, 0x01, 0x01, 0x00], // security
            &[0xD1, 0x05, 0x01],                   // reserved PublisherIdType
        ];
        for bytes in cases {
            let err = UadpHeader::read(&mut UadpCursor::new(bytes), &config).unwrap_err();
            assert!(err.is_format(), "{bytes:02x?}");
        }
    }
}
