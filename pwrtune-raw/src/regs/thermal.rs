//! Temperature target register definitions
//!
//! ## References
//!
//! - Intel® 64 and IA-32 Architectures Software Developer's Manual, Volume 4
//! - MSR_TEMPERATURE_TARGET (0x1A2)

use crate::register::RegisterLayout;

/// MSR addresses for thermal control
pub mod msr {
    /// Temperature Target - TCC activation temperature and offset
    pub const MSR_TEMPERATURE_TARGET: u64 = 0x1A2;
}

pub const TARGET_SHIFT: u32 = 16;
pub const TARGET_MASK: u64 = 0xFF;

pub const OFFSET_SHIFT: u32 = 24;

/// The offset field is 6 bits wide (29:24). Some parts document 4 bits
/// (27:24); bits 29:28 read as zero there, so the wider mask is safe.
pub const OFFSET_MASK: u64 = 0x3F;

/// Temperature Target Register layout
///
/// ## Register Format
///
/// | Bits   | Field       | Description                                 |
/// |--------|-------------|---------------------------------------------|
/// | 0-15   | reserved    |                                             |
/// | 16-23  | target      | TCC activation temperature (°C), read-only  |
/// | 24-29  | offset      | Degrees below target where throttling starts |
/// | 30-63  | reserved    |                                             |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemperatureTargetLayout {
    /// Default throttle activation temperature in °C
    pub target: u8,

    /// TCC activation offset in °C
    pub offset: u8,
}

impl RegisterLayout for TemperatureTargetLayout {
    fn to_msr_value(&self) -> u64 {
        ((self.target as u64 & TARGET_MASK) << TARGET_SHIFT)
            | ((self.offset as u64 & OFFSET_MASK) << OFFSET_SHIFT)
    }

    fn from_msr_value(value: u64) -> Self {
        Self {
            target: ((value >> TARGET_SHIFT) & TARGET_MASK) as u8,
            offset: ((value >> OFFSET_SHIFT) & OFFSET_MASK) as u8,
        }
    }

    fn validate(&self) -> Result<(), &'static str> {
        if self.offset as u64 > OFFSET_MASK {
            return Err("Offset must be <= 63 (6 bits)");
        }
        Ok(())
    }
}

impl TemperatureTargetLayout {
    /// Temperature at which throttling begins
    pub fn throttle_temp(&self) -> i32 {
        self.target as i32 - self.offset as i32
    }
}

/// Replace the offset field of `current`, keeping every other bit
pub fn with_offset(current: u64, offset: u8) -> u64 {
    let field = OFFSET_MASK << OFFSET_SHIFT;
    (current & !field) | ((offset as u64 & OFFSET_MASK) << OFFSET_SHIFT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_target_and_offset() {
        // target 100 °C, offset 10 °C
        let layout = TemperatureTargetLayout::from_msr_value(0x0A64_0000);
        assert_eq!(layout.target, 100);
        assert_eq!(layout.offset, 10);
        assert_eq!(layout.throttle_temp(), 90);
    }

    #[test]
    fn test_offset_mask_ignores_reserved_bits() {
        let value = 0xC000_0000 | (0x3F << 24) | (95 << 16) | 0xFFFF;
        let layout = TemperatureTargetLayout::from_msr_value(value);
        assert_eq!(layout.offset, 63);
        assert_eq!(layout.target, 95);
    }

    #[test]
    fn test_encode_layout() {
        let layout = TemperatureTargetLayout {
            target: 100,
            offset: 15,
        };
        assert_eq!(layout.to_msr_value(), 0x0F64_0000);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_with_offset_preserves_other_fields() {
        let current = 0x8000_0000_C564_1234;
        let updated = with_offset(current, 20);

        let field = OFFSET_MASK << OFFSET_SHIFT;
        assert_eq!(updated & !field, current & !field);
        assert_eq!(TemperatureTargetLayout::from_msr_value(updated).offset, 20);
        assert_eq!(TemperatureTargetLayout::from_msr_value(updated).target, 0x64);
    }
}
