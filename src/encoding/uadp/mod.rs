// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! UADP binary encoding (OPC UA Part 14 §7.2.2).
//!
//! All multi-byte values are little-endian and there is no alignment padding.
//! The encoder computes the exact output size with [`UadpCalculator`] before
//! writing into a [`UadpWriter`] allocated once at that size; the decoder
//! reads through a bounds-checked [`UadpCursor`].

pub mod calculator;
pub mod codec;
pub mod cursor;
pub mod header;
pub mod writer;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::GuidByteOrder;

pub use calculator::UadpCalculator;
pub use codec::UadpCodec;
pub use cursor::UadpCursor;
pub use header::UadpHeader;
pub use writer::UadpWriter;

/// Bit width of the DataSetMessage SequenceNumber field.
pub const SEQUENCE_NUMBER_WIDTH: u8 = 16;

/// Width of DataSetWriterIds in the payload header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WriterIdWidth {
    /// UInt16, as in Part 14.
    #[default]
    U16,
    /// UInt32, for deployments that agreed on wider writer ids.
    U32,
}

impl WriterIdWidth {
    pub const fn bytes(self) -> usize {
        match self {
            WriterIdWidth::U16 => 2,
            WriterIdWidth::U32 => 4,
        }
    }

    pub const fn max(self) -> u64 {
        match self {
            WriterIdWidth::U16 => u16::MAX as u64,
            WriterIdWidth::U32 => u32::MAX as u64,
        }
    }
}

/// Error for a writer id width other than 16 or 32 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidWidth(pub u8);

impl fmt::Display for InvalidWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "writer id width must be 16 or 32 bits, got {}", self.0)
    }
}

impl std::error::Error for InvalidWidth {}

impl TryFrom<u8> for WriterIdWidth {
    type Error = InvalidWidth;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            16 => Ok(WriterIdWidth::U16),
            32 => Ok(WriterIdWidth::U32),
            other => Err(InvalidWidth(other)),
        }
    }
}

impl From<WriterIdWidth> for u8 {
    fn from(width: WriterIdWidth) -> u8 {
        (width.bytes() * 8) as u8
    }
}

/// How DataSetMessage fields are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldEncoding {
    /// TypeId byte and value; status and timestamp are not transmitted.
    #[default]
    Variant,
    /// DataValue with value, non-Good status and source timestamp.
    DataValue,
}

impl FieldEncoding {
    /// FieldEncoding bits (1-2) of DataSetFlags1.
    pub const fn flag_bits(self) -> u8 {
        match self {
            FieldEncoding::Variant => 0x00,
            FieldEncoding::DataValue => 0x04,
        }
    }
}

/// Wire options both ends of a UADP link must agree on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UadpConfig {
    pub writer_id_width: WriterIdWidth,
    pub field_encoding: FieldEncoding,
    pub guid_byte_order: GuidByteOrder,
}
