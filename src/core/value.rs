// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Value type system.
//!
//! A [`VariantValue`] is one typed measurement: a [`Variant`] payload, a
//! [`StatusCode`] quality indicator and an optional source timestamp. The
//! payload enum is closed, so the type tag of a value is always the one its
//! representation implies and can never be changed after construction.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::error::CodecError;

/// OPC UA DateTime resolution in nanoseconds (one tick).
pub const NANOS_PER_TICK: u32 = 100;

/// Truncate a timestamp to whole 100-nanosecond ticks.
///
/// Both wire formats carry timestamps at this granularity, so values are
/// normalised on construction and compare equal after a round trip.
pub fn truncate_to_tick(ts: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = ts.nanosecond();
    ts.with_nanosecond(nanos - nanos % NANOS_PER_TICK)
        .unwrap_or(ts)
}

// =============================================================================
// Type tags
// =============================================================================

/// Semantic type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    /// Boolean
    Boolean,
    /// 16-bit signed integer
    Int16,
    /// 16-bit unsigned integer
    UInt16,
    /// 32-bit signed integer
    Int32,
    /// 32-bit IEEE 754 float
    Float,
    /// 64-bit IEEE 754 double
    Double,
    /// UTF-8 string
    String,
    /// Point in time
    DateTime,
}

impl TypeTag {
    /// All supported tags, in registry order.
    pub const ALL: [TypeTag; 8] = [
        TypeTag::Boolean,
        TypeTag::Int16,
        TypeTag::UInt16,
        TypeTag::Int32,
        TypeTag::Float,
        TypeTag::Double,
        TypeTag::String,
        TypeTag::DateTime,
    ];

    /// OPC UA built-in type name.
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Boolean => "Boolean",
            TypeTag::Int16 => "Int16",
            TypeTag::UInt16 => "UInt16",
            TypeTag::Int32 => "Int32",
            TypeTag::Float => "Float",
            TypeTag::Double => "Double",
            TypeTag::String => "String",
            TypeTag::DateTime => "DateTime",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TypeTag {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bool" | "boolean" => Ok(TypeTag::Boolean),
            "int16" | "i16" => Ok(TypeTag::Int16),
            "uint16" | "u16" => Ok(TypeTag::UInt16),
            "int32" | "i32" => Ok(TypeTag::Int32),
            "float" | "f32" => Ok(TypeTag::Float),
            "double" | "f64" => Ok(TypeTag::Double),
            "string" | "str" => Ok(TypeTag::String),
            "datetime" => Ok(TypeTag::DateTime),
            _ => Err(CodecError::unsupported_type(s)),
        }
    }
}

// =============================================================================
// Variant payload
// =============================================================================

/// A typed value payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Boolean(bool),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    Float(f32),
    Double(f64),
    String(String),
    DateTime(DateTime<Utc>),
}

impl Variant {
    /// Type tag implied by this payload.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Variant::Boolean(_) => TypeTag::Boolean,
            Variant::Int16(_) => TypeTag::Int16,
            Variant::UInt16(_) => TypeTag::UInt16,
            Variant::Int32(_) => TypeTag::Int32,
            Variant::Float(_) => TypeTag::Float,
            Variant::Double(_) => TypeTag::Double,
            Variant::String(_) => TypeTag::String,
            Variant::DateTime(_) => TypeTag::DateTime,
        }
    }

    /// Build a DateTime payload, truncated to tick resolution.
    pub fn date_time(ts: DateTime<Utc>) -> Self {
        Variant::DateTime(truncate_to_tick(ts))
    }

    /// Try to convert this value to f64 (numeric payloads only).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Variant::Int16(v) => Some(*v as f64),
            Variant::UInt16(v) => Some(*v as f64),
            Variant::Int32(v) => Some(*v as f64),
            Variant::Float(v) => Some(*v as f64),
            Variant::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get the inner string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Boolean(v) => write!(f, "{v}"),
            Variant::Int16(v) => write!(f, "{v}"),
            Variant::UInt16(v) => write!(f, "{v}"),
            Variant::Int32(v) => write!(f, "{v}"),
            Variant::Float(v) => write!(f, "{v}"),
            Variant::Double(v) => write!(f, "{v}"),
            Variant::String(v) => write!(f, "\"{v}\""),
            Variant::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Variant::Boolean(v)
    }
}

impl From<i16> for Variant {
    fn from(v: i16) -> Self {
        Variant::Int16(v)
    }
}

impl From<u16> for Variant {
    fn from(v: u16) -> Self {
        Variant::UInt16(v)
    }
}

impl From<i32> for Variant {
    fn from(v: i32) -> Self {
        Variant::Int32(v)
    }
}

impl From<f32> for Variant {
    fn from(v: f32) -> Self {
        Variant::Float(v)
    }
}

impl From<f64> for Variant {
    fn from(v: f64) -> Self {
        Variant::Double(v)
    }
}

impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Variant::String(v.to_string())
    }
}

impl From<String> for Variant {
    fn from(v: String) -> Self {
        Variant::String(v)
    }
}

impl From<DateTime<Utc>> for Variant {
    fn from(v: DateTime<Utc>) -> Self {
        Variant::date_time(v)
    }
}

// =============================================================================
// Status codes
// =============================================================================

/// OPC UA quality indicator (Part 4 StatusCode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusCode {
    #[default]
    Good,
    Uncertain,
    Bad,
    BadOutOfRange,
    BadCommunicationError,
    BadDeviceFailure,
    BadSensorFailure,
    /// Any other code received on the wire.
    Other(u32),
}

impl StatusCode {
    const SEVERITY_MASK: u32 = 0xC000_0000;

    /// Numeric wire value.
    pub const fn code(self) -> u32 {
        match self {
            StatusCode::Good => 0x0000_0000,
            StatusCode::Uncertain => 0x4000_0000,
            StatusCode::Bad => 0x8000_0000,
            StatusCode::BadOutOfRange => 0x803C_0000,
            StatusCode::BadCommunicationError => 0x8005_0000,
            StatusCode::BadDeviceFailure => 0x808B_0000,
            StatusCode::BadSensorFailure => 0x808C_0000,
            StatusCode::Other(code) => code,
        }
    }

    /// Map a wire value back to a named code where one exists.
    pub const fn from_code(code: u32) -> Self {
        match code {
            0x0000_0000 => StatusCode::Good,
            0x4000_0000 => StatusCode::Uncertain,
            0x8000_0000 => StatusCode::Bad,
            0x803C_0000 => StatusCode::BadOutOfRange,
            0x8005_0000 => StatusCode::BadCommunicationError,
            0x808B_0000 => StatusCode::BadDeviceFailure,
            0x808C_0000 => StatusCode::BadSensorFailure,
            other => StatusCode::Other(other),
        }
    }

    /// Severity bits are Good.
    pub const fn is_good(self) -> bool {
        self.code() & Self::SEVERITY_MASK == 0
    }

    /// Severity bits are Uncertain.
    pub const fn is_uncertain(self) -> bool {
        self.code() & Self::SEVERITY_MASK == 0x4000_0000
    }

    /// Severity bits are Bad.
    pub const fn is_bad(self) -> bool {
        self.code() & 0x8000_0000 != 0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCode::Other(code) => write!(f, "0x{code:08X}"),
            named => write!(f, "{named:?}"),
        }
    }
}

// =============================================================================
// VariantValue
// =============================================================================

/// A single typed measurement with quality and timestamp.
///
/// `source_timestamp == None` means "stamp at encode": codecs substitute the
/// instant of the encode call.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantValue {
    value: Variant,
    status: StatusCode,
    source_timestamp: Option<DateTime<Utc>>,
}

impl VariantValue {
    /// Create a Good value stamped at encode time.
    pub fn new(value: impl Into<Variant>) -> Self {
        Self {
            value: value.into(),
            status: StatusCode::Good,
            source_timestamp: None,
        }
    }

    /// Replace the status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Set the source timestamp (truncated to tick resolution).
    #[must_use]
    pub fn with_timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.source_timestamp = Some(truncate_to_tick(ts));
        self
    }

    /// Assemble from decoded parts.
    pub(crate) fn from_parts(
        value: Variant,
        status: StatusCode,
        source_timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            value,
            status,
            source_timestamp: source_timestamp.map(truncate_to_tick),
        }
    }

    pub fn value(&self) -> &Variant {
        &self.value
    }

    pub fn type_tag(&self) -> TypeTag {
        self.value.type_tag()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn source_timestamp(&self) -> Option<DateTime<Utc>> {
        self.source_timestamp
    }

    /// Timestamp to transmit, falling back to the encode instant.
    pub fn timestamp_or(&self, encode_instant: DateTime<Utc>) -> DateTime<Utc> {
        self.source_timestamp
            .unwrap_or_else(|| truncate_to_tick(encode_instant))
    }
}
