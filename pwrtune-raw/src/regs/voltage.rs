//! Voltage offset (undervolt) mailbox register
//!
//! MSR 0x150 is not described in the SDM. The layout below was worked out
//! from Intel's own tuning utilities and is what every known undervolting
//! tool writes. A request names a voltage plane and either carries a new
//! offset (write bit set) or asks the firmware to latch the current offset of
//! that plane into the register so it can be read back.
//!
//! ## Register Format
//!
//! | Bits   | Field     | Description                                   |
//! |--------|-----------|-----------------------------------------------|
//! | 21-31  | offset    | 11-bit two's complement, 1/1.024 mV per LSB   |
//! | 32     | write     | 1 = apply offset, 0 = read request            |
//! | 36     | fixed     | Undocumented, must be 1                       |
//! | 40-43  | plane     | Voltage plane selector                        |
//! | 63     | valid     | Request valid                                 |

use crate::register::RegisterLayout;

/// MSR addresses for voltage control
pub mod msr {
    /// Overclocking mailbox carrying voltage offset requests
    pub const MSR_UNDERVOLT_OFFSET: u64 = 0x150;
}

/// Bit 63: the firmware ignores requests without it
pub const REQUEST_VALID_BIT: u64 = 1 << 63;

/// Bit 36 has no known meaning, but requests are rejected unless it is set.
/// Keep it on every request, reads included.
pub const FIXED_BIT_36: u64 = 1 << 36;

/// Bit 32: set to apply the offset, clear to request a read-back
pub const WRITE_BIT: u64 = 1 << 32;

pub const PLANE_SHIFT: u32 = 40;
pub const PLANE_MASK: u64 = 0xF;

pub const OFFSET_SHIFT: u32 = 21;

/// Width of the offset field once shifted down
pub const OFFSET_MASK: u64 = 0x7FF;

/// Bits kept by the encoder after shifting: 31:21
const OFFSET_FIELD_MASK: u32 = 0xFFE0_0000;

/// Register units per millivolt
pub const UNITS_PER_MV: f64 = 1.024;

/// Raw offsets above this value are negative (11-bit two's complement)
const OFFSET_SIGN_THRESHOLD: u16 = 1024;

/// Voltage offset request layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UndervoltRequest {
    /// Voltage plane selector (bits 40-43)
    pub plane: u8,

    /// Apply the offset instead of requesting a read-back
    pub write: bool,

    /// Raw 11-bit offset (bits 21-31)
    pub offset: u16,
}

impl RegisterLayout for UndervoltRequest {
    fn to_msr_value(&self) -> u64 {
        REQUEST_VALID_BIT
            | ((self.plane as u64 & PLANE_MASK) << PLANE_SHIFT)
            | FIXED_BIT_36
            | (if self.write { WRITE_BIT } else { 0 })
            | ((self.offset as u64 & OFFSET_MASK) << OFFSET_SHIFT)
    }

    fn from_msr_value(value: u64) -> Self {
        Self {
            plane: ((value >> PLANE_SHIFT) & PLANE_MASK) as u8,
            write: (value & WRITE_BIT) != 0,
            offset: ((value >> OFFSET_SHIFT) & OFFSET_MASK) as u16,
        }
    }

    fn validate(&self) -> Result<(), &'static str> {
        if self.plane as u64 > PLANE_MASK {
            return Err("Plane must be <= 15 (4 bits)");
        }
        if self.offset as u64 > OFFSET_MASK {
            return Err("Offset must be <= 0x7FF (11 bits)");
        }
        Ok(())
    }
}

impl UndervoltRequest {
    /// Request that applies `offset_mv` to `plane`
    pub fn write(plane: u8, offset_mv: i32) -> Self {
        Self {
            plane,
            write: true,
            offset: offset_units(offset_mv),
        }
    }

    /// Request that latches the current offset of `plane` for read-back
    pub fn read(plane: u8) -> Self {
        Self {
            plane,
            write: false,
            offset: 0,
        }
    }

    /// Offset in millivolts, rounded to the nearest integer
    pub fn offset_mv(&self) -> i32 {
        let raw = self.offset & OFFSET_MASK as u16;
        let signed = if raw > OFFSET_SIGN_THRESHOLD {
            raw as i32 - 2048
        } else {
            raw as i32
        };
        (signed as f64 / UNITS_PER_MV).round() as i32
    }
}

/// Convert millivolts to the raw 11-bit offset field
///
/// The magnitude is taken as a 32-bit two's complement value, masked to
/// 12 bits and shifted into 31:21. The shift drops bit 11, so only the low
/// 11 bits survive and the sign lives in bit 10 of the field.
pub fn offset_units(offset_mv: i32) -> u16 {
    let magnitude = (offset_mv as f64 * UNITS_PER_MV).round() as i32 as u32;
    let field = ((magnitude & 0xFFF) << OFFSET_SHIFT) & OFFSET_FIELD_MASK;
    (field >> OFFSET_SHIFT) as u16
}

/// Register value that applies `offset_mv` millivolts to `plane`
pub fn encode_write(plane: u8, offset_mv: i32) -> u64 {
    UndervoltRequest::write(plane, offset_mv).to_msr_value()
}

/// Register value that asks for the current offset of `plane`
pub fn encode_read_request(plane: u8) -> u64 {
    UndervoltRequest::read(plane).to_msr_value()
}

/// Split a register value into its plane selector and offset in millivolts
pub fn decode(value: u64) -> (u8, i32) {
    let request = UndervoltRequest::from_msr_value(value);
    (request.plane, request.offset_mv())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_values() {
        assert_eq!(decode(0x400_0000_0000), (4, 0));
        assert_eq!(decode(0x100_f340_0000), (1, -100));
    }

    #[test]
    fn test_encode_core_minus_100mv() {
        assert_eq!(encode_write(0, -100), 0x8000_0011_F340_0000);
    }

    #[test]
    fn test_encode_read_request() {
        assert_eq!(encode_read_request(0), 0x8000_0010_0000_0000);
        assert_eq!(encode_read_request(2), 0x8000_0210_0000_0000);

        let request = UndervoltRequest::from_msr_value(encode_read_request(3));
        assert!(!request.write);
        assert_eq!(request.offset, 0);
        assert_eq!(request.plane, 3);
    }

    #[test]
    fn test_offset_stays_in_bits_21_to_31() {
        for mv in [-999, -500, -1, 0, 1, 500, 999] {
            let value = encode_write(1, mv);
            let known = REQUEST_VALID_BIT
                | FIXED_BIT_36
                | WRITE_BIT
                | (PLANE_MASK << PLANE_SHIFT)
                | (OFFSET_MASK << OFFSET_SHIFT);
            assert_eq!(value & !known, 0, "stray bits for {mv} mV");
        }
    }

    #[test]
    fn test_negative_offsets_use_high_half() {
        assert_eq!(offset_units(-100), 2048 - 102);
        assert_eq!(offset_units(100), 102);
        assert_eq!(offset_units(0), 0);
    }

    #[test]
    fn test_sign_threshold() {
        let at_threshold = UndervoltRequest {
            offset: 1024,
            ..Default::default()
        };
        assert_eq!(at_threshold.offset_mv(), 1000);

        let above = UndervoltRequest {
            offset: 1025,
            ..Default::default()
        };
        assert_eq!(above.offset_mv(), -999);
    }

    #[test]
    fn test_round_trip_full_range() {
        for plane in 0..=4u8 {
            for mv in -999..=999 {
                assert_eq!(decode(encode_write(plane, mv)), (plane, mv));
            }
        }
    }

    #[test]
    fn test_validate_rejects_wide_fields() {
        let request = UndervoltRequest {
            plane: 16,
            ..Default::default()
        };
        assert!(request.validate().is_err());
        assert!(UndervoltRequest::write(4, -50).validate().is_ok());
    }
}
