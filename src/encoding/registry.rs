// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Variant registry: the fixed table of supported value types.
//!
//! One row per [`TypeTag`] gives the UADP built-in TypeId, the wire width and
//! the JSON literal shape. Every type-specific encode and decode rule of both
//! codecs lives here, so a value's encoded form differs between formats only
//! by the table lookup.
//!
//! # Example
//!
//! ```
//! use uapubsub::encoding::registry::{JsonShape, VariantRegistry, WireWidth};
//! use uapubsub::TypeTag;
//!
//! let row = VariantRegistry::lookup(TypeTag::Float).unwrap();
//! assert_eq!(row.type_id, 10);
//! assert_eq!(row.width, WireWidth::Fixed(4));
//! assert_eq!(row.json_shape, JsonShape::Decimal);
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::{Number, Value};

use super::uadp::{UadpCalculator, UadpCursor, UadpWriter};
use crate::core::value::truncate_to_tick;
use crate::core::{CodecError, Result, TypeTag, Variant};

/// 100-ns ticks between 1601-01-01 and 1970-01-01.
pub const UNIX_EPOCH_TICKS: i64 = 116_444_736_000_000_000;

const TICKS_PER_SECOND: i64 = 10_000_000;

/// Byte width of a value on the UADP wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireWidth {
    /// Always this many bytes.
    Fixed(usize),
    /// Int32 length prefix followed by that many bytes.
    LengthPrefixed,
}

/// Literal shape of a value in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    /// `true` / `false`
    Boolean,
    /// Number without a decimal point.
    Integer,
    /// Number that always carries a decimal point.
    Decimal,
    /// Quoted string.
    QuotedString,
    /// Quoted ISO-8601 UTC timestamp.
    Timestamp,
}

/// One registry row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    pub tag: TypeTag,
    /// OPC UA built-in type id (Part 6), the UADP Variant TypeId byte.
    pub type_id: u8,
    pub width: WireWidth,
    pub json_shape: JsonShape,
}

const TABLE: [TypeInfo; 8] = [
    TypeInfo {
        tag: TypeTag::Boolean,
        type_id: 1,
        width: WireWidth::Fixed(1),
        json_shape: JsonShape::Boolean,
    },
    TypeInfo {
        tag: TypeTag::Int16,
        type_id: 4,
        width: WireWidth::Fixed(2),
        json_shape: JsonShape::Integer,
    },
    TypeInfo {
        tag: TypeTag::UInt16,
        type_id: 5,
        width: WireWidth::Fixed(2),
        json_shape: JsonShape::Integer,
    },
    TypeInfo {
        tag: TypeTag::Int32,
        type_id: 6,
        width: WireWidth::Fixed(4),
        json_shape: JsonShape::Integer,
    },
    TypeInfo {
        tag: TypeTag::Float,
        type_id: 10,
        width: WireWidth::Fixed(4),
        json_shape: JsonShape::Decimal,
    },
    TypeInfo {
        tag: TypeTag::Double,
        type_id: 11,
        width: WireWidth::Fixed(8),
        json_shape: JsonShape::Decimal,
    },
    TypeInfo {
        tag: TypeTag::String,
        type_id: 12,
        width: WireWidth::LengthPrefixed,
        json_shape: JsonShape::QuotedString,
    },
    TypeInfo {
        tag: TypeTag::DateTime,
        type_id: 13,
        width: WireWidth::Fixed(8),
        json_shape: JsonShape::Timestamp,
    },
];

/// The fixed type table and its encode/decode rules.
pub struct VariantRegistry;

impl VariantRegistry {
    /// All rows.
    pub fn rows() -> &'static [TypeInfo] {
        &TABLE
    }

    /// Row for a type tag.
    pub fn lookup(tag: TypeTag) -> Result<&'static TypeInfo> {
        TABLE
            .iter()
            .find(|row| row.tag == tag)
            .ok_or_else(|| CodecError::unsupported_type(tag.name()))
    }

    /// Row for a UADP TypeId byte.
    pub fn by_type_id(type_id: u8) -> Result<&'static TypeInfo> {
        TABLE
            .iter()
            .find(|row| row.type_id == type_id)
            .ok_or_else(|| CodecError::unsupported_type(format!("TypeId {type_id}")))
    }

    // ========================================================================
    // UADP
    // ========================================================================

    /// Account for the value bytes (without TypeId) in a size calculation.
    pub fn size_uadp(value: &Variant, calc: &mut UadpCalculator) -> Result<()> {
        match Self::lookup(value.type_tag())?.width {
            WireWidth::Fixed(n) => calc.bytes(n),
            WireWidth::LengthPrefixed => {
                let len = value.as_str().map(str::len).unwrap_or_default();
                calc.string(len)?
            }
        };
        Ok(())
    }

    /// Write the value bytes (without TypeId).
    pub fn write_uadp(value: &Variant, writer: &mut UadpWriter) -> Result<()> {
        Self::lookup(value.type_tag())?;
        match value {
            Variant::Boolean(v) => writer.uint8(u8::from(*v)),
            Variant::Int16(v) => writer.int16(*v),
            Variant::UInt16(v) => writer.uint16(*v),
            Variant::Int32(v) => writer.int32(*v),
            Variant::Float(v) => writer.float32(*v),
            Variant::Double(v) => writer.float64(*v),
            Variant::String(v) => writer.string(v),
            Variant::DateTime(v) => writer.int64(Self::to_ticks(*v)),
        }
    }

    /// Read the value bytes of a `tag`-typed value.
    pub fn read_uadp(tag: TypeTag, cursor: &mut UadpCursor<'_>) -> Result<Variant> {
        Self::lookup(tag)?;
        Ok(match tag {
            TypeTag::Boolean => Variant::Boolean(cursor.read_u8()? != 0),
            TypeTag::Int16 => Variant::Int16(cursor.read_i16()?),
            TypeTag::UInt16 => Variant::UInt16(cursor.read_u16()?),
            TypeTag::Int32 => Variant::Int32(cursor.read_i32()?),
            TypeTag::Float => Variant::Float(cursor.read_f32()?),
            TypeTag::Double => Variant::Double(cursor.read_f64()?),
            TypeTag::String => Variant::String(cursor.read_string()?),
            TypeTag::DateTime => Variant::DateTime(Self::from_ticks(cursor.read_i64()?)?),
        })
    }

    /// Convert a timestamp to OPC UA DateTime ticks (100 ns since 1601).
    ///
    /// Instants before 1601 clamp to 0.
    pub fn to_ticks(ts: DateTime<Utc>) -> i64 {
        let secs = ts.timestamp();
        let sub_ticks = i64::from(ts.timestamp_subsec_nanos() / 100);
        secs.checked_mul(TICKS_PER_SECOND)
            .and_then(|t| t.checked_add(sub_ticks))
            .and_then(|t| t.checked_add(UNIX_EPOCH_TICKS))
            .map(|t| t.max(0))
            .unwrap_or(if secs < 0 { 0 } else { i64::MAX })
    }

    /// Convert OPC UA DateTime ticks to a timestamp.
    pub fn from_ticks(ticks: i64) -> Result<DateTime<Utc>> {
        let out_of_range =
            || CodecError::format("DateTime", format!("{ticks} ticks out of range"));
        let unix_ticks = ticks.checked_sub(UNIX_EPOCH_TICKS).ok_or_else(out_of_range)?;
        let secs = unix_ticks.div_euclid(TICKS_PER_SECOND);
        let nanos = (unix_ticks.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
        DateTime::from_timestamp(secs, nanos).ok_or_else(out_of_range)
    }

    // ========================================================================
    // JSON
    // ========================================================================

    /// Render a value as a JSON literal of its registry shape.
    pub fn to_json(value: &Variant) -> Result<Value> {
        let row = Self::lookup(value.type_tag())?;
        Ok(match (row.json_shape, value) {
            (JsonShape::Boolean, Variant::Boolean(v)) => Value::Bool(*v),
            (JsonShape::Integer, Variant::Int16(v)) => Value::Number(Number::from(*v)),
            (JsonShape::Integer, Variant::UInt16(v)) => Value::Number(Number::from(*v)),
            (JsonShape::Integer, Variant::Int32(v)) => Value::Number(Number::from(*v)),
            (JsonShape::Decimal, Variant::Float(v)) => decimal(*v)?,
            (JsonShape::Decimal, Variant::Double(v)) => decimal(*v)?,
            (JsonShape::QuotedString, Variant::String(v)) => Value::String(v.clone()),
            (JsonShape::Timestamp, Variant::DateTime(v)) => Value::String(Self::to_iso8601(*v)),
            (shape, other) => {
                return Err(CodecError::invariant_violation(format!(
                    "registry shape {shape:?} does not match {}",
                    other.type_tag()
                )))
            }
        })
    }

    /// Coerce a JSON literal to `tag`; `None` if the literal has the wrong shape.
    pub fn from_json(tag: TypeTag, literal: &Value) -> Option<Variant> {
        match Self::lookup(tag).ok()?.json_shape {
            JsonShape::Boolean => literal.as_bool().map(Variant::Boolean),
            JsonShape::Integer => {
                let n = integer_literal(literal)?;
                match tag {
                    TypeTag::Int16 => i16::try_from(n).ok().map(Variant::Int16),
                    TypeTag::UInt16 => u16::try_from(n).ok().map(Variant::UInt16),
                    TypeTag::Int32 => i32::try_from(n).ok().map(Variant::Int32),
                    _ => None,
                }
            }
            JsonShape::Decimal => {
                let v = decimal_literal(literal)?;
                match tag {
                    TypeTag::Float => Some(Variant::Float(v as f32)),
                    TypeTag::Double => Some(Variant::Double(v)),
                    _ => None,
                }
            }
            JsonShape::QuotedString => literal.as_str().map(|s| Variant::String(s.to_string())),
            JsonShape::Timestamp => literal
                .as_str()
                .and_then(|s| Self::parse_iso8601(s).ok())
                .map(Variant::DateTime),
        }
    }

    /// Infer a value from its literal shape alone.
    pub fn infer_json(literal: &Value) -> Result<Variant> {
        match literal {
            Value::Bool(v) => Ok(Variant::Boolean(*v)),
            Value::Number(n) if n.is_f64() => n
                .as_f64()
                .map(Variant::Double)
                .ok_or_else(|| CodecError::unsupported_type(format!("number {n}"))),
            Value::Number(n) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(Variant::Int32)
                .ok_or_else(|| CodecError::unsupported_type(format!("integer {n}"))),
            Value::String(s) => Ok(match Self::parse_iso8601(s) {
                Ok(ts) => Variant::DateTime(ts),
                Err(_) => Variant::String(s.clone()),
            }),
            Value::Null => Err(CodecError::unsupported_type("null")),
            Value::Array(_) => Err(CodecError::unsupported_type("array")),
            Value::Object(_) => Err(CodecError::unsupported_type("object")),
        }
    }

    /// ISO-8601 UTC rendering used for timestamps.
    pub fn to_iso8601(ts: DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
    }

    /// Parse an ISO-8601 (RFC 3339) timestamp, truncated to tick resolution.
    pub fn parse_iso8601(s: &str) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|ts| truncate_to_tick(ts.with_timezone(&Utc)))
            .map_err(|e| CodecError::format("timestamp", format!("'{s}': {e}")))
    }
}

/// Finite values become JSON numbers whose mantissa always carries a decimal
/// point; the rest use the Part 6 JSON spellings.
///
/// Formatting the value at its own width keeps an f32 at its shortest decimal
/// instead of the widened f64 expansion.
fn decimal<T>(v: T) -> Result<Value>
where
    T: Copy + Into<f64> + fmt::Display + fmt::LowerExp,
{
    let wide: f64 = v.into();
    if wide.is_nan() {
        return Ok(Value::String("NaN".to_string()));
    }
    if wide.is_infinite() {
        let s = if wide > 0.0 { "Infinity" } else { "-Infinity" };
        return Ok(Value::String(s.to_string()));
    }

    let magnitude = wide.abs();
    let text = if magnitude != 0.0 && !(1e-5..1e16).contains(&magnitude) {
        format!("{v:e}")
    } else {
        v.to_string()
    };
    with_decimal_point(text)
        .parse::<Number>()
        .map(Value::Number)
        .map_err(|e| CodecError::invariant_violation(format!("decimal rendering: {e}")))
}

/// `1e20` becomes `1.0e20`, `42` becomes `42.0`.
fn with_decimal_point(mut text: String) -> String {
    let mantissa_end = text.find(['e', 'E']).unwrap_or(text.len());
    if !text[..mantissa_end].contains('.') {
        text.insert_str(mantissa_end, ".0");
    }
    text
}

fn integer_literal(literal: &Value) -> Option<i64> {
    match literal {
        Value::Number(n) if !n.is_f64() => n.as_i64(),
        _ => None,
    }
}

fn decimal_literal(literal: &Value) -> Option<f64> {
    match literal {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => match s.as_str() {
            "NaN" => Some(f64::NAN),
            "Infinity" => Some(f64::INFINITY),
            "-Infinity" => Some(f64::NEG_INFINITY),
            _ => None,
        },
        _ => None,
    }
}
