// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! UADP size calculator.
//!
//! UADP has no alignment padding, so sizes are plain sums. The encoder runs a
//! full pass through the calculator first and allocates the output buffer
//! exactly once.

use crate::core::{CodecError, Result};

/// UADP size calculator.
///
/// # Example
///
/// ```
/// use uapubsub::encoding::uadp::UadpCalculator;
///
/// let mut calc = UadpCalculator::new();
/// calc.uint8();
/// calc.uint16();
/// calc.string(5).unwrap(); // 4 (length) + 5
/// assert_eq!(calc.size(), 12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct UadpCalculator {
    offset: usize,
}

impl UadpCalculator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current calculated size.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.offset
    }

    pub fn uint8(&mut self) -> usize {
        self.bytes(1)
    }

    pub fn uint16(&mut self) -> usize {
        self.bytes(2)
    }

    pub fn uint32(&mut self) -> usize {
        self.bytes(4)
    }

    pub fn uint64(&mut self) -> usize {
        self.bytes(8)
    }

    /// Calculate size for an Int32 length-prefixed string.
    ///
    /// Fails with an overflow when `length` does not fit the prefix.
    pub fn string(&mut self, length: usize) -> Result<usize> {
        if i32::try_from(length).is_err() {
            return Err(CodecError::overflow(
                "String length",
                length as u64,
                i32::MAX as u64,
            ));
        }
        self.uint32();
        Ok(self.bytes(length))
    }

    /// Calculate size for raw bytes.
    pub fn bytes(&mut self, count: usize) -> usize {
        self.offset += count;
        self.offset
    }

    /// Reset to zero.
    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculator_new() {
        assert_eq!(UadpCalculator::new().size(), 0);
    }

    #[test]
    fn test_calculator_no_padding() {
        let mut calc = UadpCalculator::new();
        calc.uint8();
        calc.uint64();
        calc.uint16();
        calc.uint32();
        assert_eq!(calc.size(), 15);
    }

    #[test]
    fn test_calculator_string() {
        let mut calc = UadpCalculator::new();
        assert_eq!(calc.string(0).unwrap(), 4);
        assert_eq!(calc.string(11).unwrap(), 19);
    }

    #[test]
    fn test_calculator_reset() {
        let mut calc = UadpCalculator::new();
        calc.bytes(16);
        calc.reset();
        assert_eq!(calc.size(), 0);
    }
}
