// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for uapubsub.
//!
//! Every codec failure falls into one of four kinds:
//! - malformed or truncated wire data ([`ErrorKind::Format`])
//! - a value outside the supported type set ([`ErrorKind::UnsupportedType`])
//! - a decoded message that disagrees with an agreed schema ([`ErrorKind::SchemaMismatch`])
//! - a length or counter that does not fit its wire width ([`ErrorKind::Overflow`])

use std::fmt;

/// Coarse classification of a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or truncated input (caller's data problem).
    Format,
    /// Type tag or literal with no registry entry (caller's schema problem).
    UnsupportedType,
    /// Decoded layout disagrees with a registered schema.
    SchemaMismatch,
    /// A value exceeds the width of its wire field.
    Overflow,
    /// Internal invariant broken by the codec itself.
    Internal,
}

/// Errors that can occur while encoding or decoding PubSub messages.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Malformed wire data
    Format {
        /// What was being decoded
        context: String,
        /// Error message
        message: String,
    },

    /// Buffer too short for requested read
    Truncated {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Cursor position when error occurred
        position: usize,
    },

    /// Type tag, TypeId or literal shape with no registry entry
    UnsupportedType {
        /// Offending type description
        type_name: String,
    },

    /// Decoded data disagrees with the schema registered for its writer
    SchemaMismatch {
        /// DataSetWriterId the schema belongs to
        writer_id: u32,
        /// What disagreed
        reason: String,
    },

    /// Value does not fit its wire field
    Overflow {
        /// Wire field name
        field: String,
        /// Value that was rejected
        value: u64,
        /// Largest representable value
        max: u64,
    },

    /// Invariant violation inside the codec
    InvariantViolation {
        /// Description of the invariant that was violated
        invariant: String,
    },
}

impl CodecError {
    /// Create a format error.
    pub fn format(context: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::Format {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a truncation error.
    pub fn truncated(requested: usize, available: usize, position: usize) -> Self {
        CodecError::Truncated {
            requested,
            available,
            position,
        }
    }

    /// Create an unsupported type error.
    pub fn unsupported_type(type_name: impl Into<String>) -> Self {
        CodecError::UnsupportedType {
            type_name: type_name.into(),
        }
    }

    /// Create a schema mismatch error.
    pub fn schema_mismatch(writer_id: u32, reason: impl Into<String>) -> Self {
        CodecError::SchemaMismatch {
            writer_id,
            reason: reason.into(),
        }
    }

    /// Create an overflow error.
    pub fn overflow(field: impl Into<String>, value: u64, max: u64) -> Self {
        CodecError::Overflow {
            field: field.into(),
            value,
            max,
        }
    }

    /// Create an invariant violation error.
    pub fn invariant_violation(invariant: impl Into<String>) -> Self {
        CodecError::InvariantViolation {
            invariant: invariant.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::Format { .. } | CodecError::Truncated { .. } => ErrorKind::Format,
            CodecError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            CodecError::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
            CodecError::Overflow { .. } => ErrorKind::Overflow,
            CodecError::InvariantViolation { .. } => ErrorKind::Internal,
        }
    }

    /// True for malformed or truncated input.
    pub fn is_format(&self) -> bool {
        self.kind() == ErrorKind::Format
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CodecError::Format { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            CodecError::Truncated {
                requested,
                available,
                position,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("position", position.to_string()),
            ],
            CodecError::UnsupportedType { type_name } => vec![("type", type_name.clone())],
            CodecError::SchemaMismatch { writer_id, reason } => vec![
                ("writer_id", writer_id.to_string()),
                ("reason", reason.clone()),
            ],
            CodecError::Overflow { field, value, max } => vec![
                ("field", field.clone()),
                ("value", value.to_string()),
                ("max", max.to_string()),
            ],
            CodecError::InvariantViolation { invariant } => {
                vec![("invariant", invariant.clone())]
            }
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Format { context, message } => {
                write!(f, "Format error in {context}: {message}")
            }
            CodecError::Truncated {
                requested,
                available,
                position,
            } => write!(
                f,
                "Buffer too short: requested {requested} bytes at position {position}, but only {available} bytes available"
            ),
            CodecError::UnsupportedType { type_name } => {
                write!(f, "Unsupported type: '{type_name}'")
            }
            CodecError::SchemaMismatch { writer_id, reason } => {
                write!(f, "Schema mismatch for writer {writer_id}: {reason}")
            }
            CodecError::Overflow { field, value, max } => {
                write!(f, "Overflow in {field}: {value} exceeds maximum {max}")
            }
            CodecError::InvariantViolation { invariant } => {
                write!(f, "Invariant violation: {invariant}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::format("json", err.to_string())
    }
}

/// Result type for uapubsub codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error() {
        let err = CodecError::format("uadp header", "unsupported version 3");
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(
            err.to_string(),
            "Format error in uadp header: unsupported version 3"
        );
    }

    #[test]
    fn test_truncated_is_format() {
        let err = CodecError::truncated(4, 2, 10);
        assert!(err.is_format());
        assert_eq!(
            err.to_string(),
            "Buffer too short: requested 4 bytes at position 10, but only 2 bytes available"
        );
    }

    #[test]
    fn test_unsupported_type_error() {
        let err = CodecError::unsupported_type("TypeId 17");
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
        assert_eq!(err.to_string(), "Unsupported type: 'TypeId 17'");
    }

    #[test]
    fn test_schema_mismatch_error() {
        let err = CodecError::schema_mismatch(1000, "expected 2 fields, found 3");
        assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
        assert_eq!(
            err.to_string(),
            "Schema mismatch for writer 1000: expected 2 fields, found 3"
        );
    }

    #[test]
    fn test_overflow_error() {
        let err = CodecError::overflow("SequenceNumber", 70_000, 65_535);
        assert_eq!(err.kind(), ErrorKind::Overflow);
        assert_eq!(
            err.to_string(),
            "Overflow in SequenceNumber: 70000 exceeds maximum 65535"
        );
    }

    #[test]
    fn test_invariant_violation_is_internal() {
        let err = CodecError::invariant_violation("size mismatch");
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(!err.is_format());
    }

    #[test]
    fn test_log_fields_truncated() {
        let err = CodecError::truncated(8, 3, 21);
        let fields = err.log_fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], ("requested", "8".to_string()));
        assert_eq!(fields[1], ("available", "3".to_string()));
        assert_eq!(fields[2], ("position", "21".to_string()));
    }

    #[test]
    fn test_log_fields_overflow() {
        let err = CodecError::overflow("FieldCount", 70_000, 65_535);
        let fields = err.log_fields();
        assert_eq!(fields[0], ("field", "FieldCount".to_string()));
        assert_eq!(fields[2], ("max", "65535".to_string()));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CodecError = json_err.into();
        assert!(err.is_format());
    }
}
