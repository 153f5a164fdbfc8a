// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bounds-checked UADP reader.
//!
//! Every read checks the remaining length first, so a truncated or hostile
//! buffer surfaces as a format error and never as a panic.

use byteorder::{ByteOrder, LittleEndian};

use crate::core::{CodecError, Result};

/// UADP cursor over a borrowed buffer.
///
/// # Example
///
/// ```
/// use uapubsub::encoding::uadp::UadpCursor;
///
/// let data = [0xE8, 0x03, 0x2A];
/// let mut cursor = UadpCursor::new(&data);
/// assert_eq!(cursor.read_u16().unwrap(), 1000);
/// assert_eq!(cursor.read_u8().unwrap(), 42);
/// assert!(cursor.is_at_end());
/// ```
pub struct UadpCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> UadpCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Read a byte slice.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(CodecError::truncated(count, self.remaining(), self.offset));
        }
        let start = self.offset;
        self.offset += count;
        Ok(&self.data[start..self.offset])
    }

    /// Skip bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.read_bytes(8)?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.read_bytes(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.read_bytes(8)?))
    }

    /// Read a 16-byte GUID.
    pub fn read_guid(&mut self) -> Result<[u8; 16]> {
        let mut guid = [0u8; 16];
        guid.copy_from_slice(self.read_bytes(16)?);
        Ok(guid)
    }

    /// Read an Int32 length-prefixed UTF-8 string.
    ///
    /// A length of -1 is the null string and reads as empty.
    pub fn read_string(&mut self) -> Result<String> {
        let at = self.offset;
        let len = self.read_i32()?;
        if len == -1 {
            return Ok(String::new());
        }
        let len = usize::try_from(len)
            .map_err(|_| CodecError::format("String", format!("negative length {len} at {at}")))?;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| CodecError::format("String", format!("invalid UTF-8 at {at}: {e}")))
    }

    /// Split off a sub-cursor over the next `count` bytes.
    pub fn take(&mut self, count: usize) -> Result<UadpCursor<'a>> {
        Ok(UadpCursor::new(self.read_bytes(count)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_little_endian() {
        let data = [0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0xCC, 0x41];
        let mut cursor = UadpCursor::new(&data);
        assert_eq!(cursor.read_u32().unwrap(), 1);
        assert_eq!(cursor.read_f32().unwrap(), 25.5);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_truncated_read() {
        let data = [0x01];
        let mut cursor = UadpCursor::new(&data);
        let err = cursor.read_u16().unwrap_err();
        assert!(matches!(
            err,
            CodecError::Truncated {
                requested: 2,
                available: 1,
                position: 0
            }
        ));
        assert!(err.is_format());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_read_string() {
        let data = [3, 0, 0, 0, b'a', b'b', b'c'];
        assert_eq!(UadpCursor::new(&data).read_string().unwrap(), "abc");
    }

    #[test]
    fn test_read_null_string() {
        let data = (-1i32).to_le_bytes();
        assert_eq!(UadpCursor::new(&data).read_string().unwrap(), "");
    }

    #[test]
    fn test_read_string_rejects_bad_input() {
        let negative = (-2i32).to_le_bytes();
        assert!(UadpCursor::new(&negative).read_string().unwrap_err().is_format());

        let bad_utf8 = [2, 0, 0, 0, 0xFF, 0xFE];
        assert!(UadpCursor::new(&bad_utf8).read_string().unwrap_err().is_format());

        let huge = [0xFF, 0xFF, 0xFF, 0x7F];
        assert!(UadpCursor::new(&huge).read_string().unwrap_err().is_format());
    }

    #[test]
    fn test_take_sub_cursor() {
        let data = [1, 2, 3, 4];
        let mut cursor = UadpCursor::new(&data);
        let mut sub = cursor.take(2).unwrap();
        assert_eq!(sub.read_u8().unwrap(), 1);
        assert_eq!(sub.remaining(), 1);
        assert_eq!(cursor.read_u8().unwrap(), 3);
        assert!(cursor.take(5).is_err());
    }
}
