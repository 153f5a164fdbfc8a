// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Fixed-capacity UADP byte writer.
//!
//! The buffer is allocated once at the size the calculator reported. A write
//! past that size, or a finish short of it, means the size pass and the write
//! pass disagree and is reported as an internal error rather than grown.

use crate::core::{CodecError, Result};

/// UADP writer over an exactly-sized buffer. All multi-byte values are
/// little-endian.
pub struct UadpWriter {
    buffer: Vec<u8>,
    limit: usize,
}

impl UadpWriter {
    /// Create a writer for exactly `size` bytes.
    pub fn with_exact_size(size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(size),
            limit: size,
        }
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    fn put(&mut self, bytes: &[u8]) -> Result<()> {
        if self.buffer.len() + bytes.len() > self.limit {
            return Err(CodecError::invariant_violation(format!(
                "write of {} bytes at {} exceeds computed size {}",
                bytes.len(),
                self.buffer.len(),
                self.limit
            )));
        }
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    pub fn uint8(&mut self, value: u8) -> Result<()> {
        self.put(&[value])
    }

    pub fn int16(&mut self, value: i16) -> Result<()> {
        self.put(&value.to_le_bytes())
    }

    pub fn uint16(&mut self, value: u16) -> Result<()> {
        self.put(&value.to_le_bytes())
    }

    pub fn int32(&mut self, value: i32) -> Result<()> {
        self.put(&value.to_le_bytes())
    }

    pub fn uint32(&mut self, value: u32) -> Result<()> {
        self.put(&value.to_le_bytes())
    }

    pub fn int64(&mut self, value: i64) -> Result<()> {
        self.put(&value.to_le_bytes())
    }

    pub fn uint64(&mut self, value: u64) -> Result<()> {
        self.put(&value.to_le_bytes())
    }

    pub fn float32(&mut self, value: f32) -> Result<()> {
        self.put(&value.to_le_bytes())
    }

    pub fn float64(&mut self, value: f64) -> Result<()> {
        self.put(&value.to_le_bytes())
    }

    /// Write an Int32 length prefix followed by the UTF-8 bytes.
    pub fn string(&mut self, value: &str) -> Result<()> {
        let len = i32::try_from(value.len()).map_err(|_| {
            CodecError::overflow("String length", value.len() as u64, i32::MAX as u64)
        })?;
        self.int32(len)?;
        self.put(value.as_bytes())
    }

    /// Write raw bytes.
    pub fn bytes(&mut self, value: &[u8]) -> Result<()> {
        self.put(value)
    }

    /// Return the buffer, which must be filled exactly.
    pub fn finish(self) -> Result<Vec<u8>> {
        if self.buffer.len() != self.limit {
            return Err(CodecError::invariant_violation(format!(
                "wrote {} bytes, computed size was {}",
                self.buffer.len(),
                self.limit
            )));
        }
        Ok(self.buffer)
    }
}
