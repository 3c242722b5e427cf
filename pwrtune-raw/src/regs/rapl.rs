//! RAPL (Running Average Power Limit) package power limit definitions
//!
//! The limit register only holds raw counts. The unit register says what one
//! count is worth, so a limit can only be interpreted together with the unit
//! register of the same package.
//!
//! ## References
//!
//! - Intel® 64 and IA-32 Architectures Software Developer's Manual, Volume 3B
//! - Section 14.10: Platform Specific Power Management Support

use crate::register::RegisterLayout;

/// MSR addresses for RAPL
pub mod msr {
    /// RAPL Power Unit MSR - Defines power, energy and time units
    pub const MSR_RAPL_POWER_UNIT: u64 = 0x606;

    /// Package RAPL Power Limit Control
    pub const MSR_PKG_POWER_LIMIT: u64 = 0x610;
}

/// RAPL Power Unit Register layout
///
/// ## Register Format
///
/// | Bits   | Field        | Description                    |
/// |--------|--------------|--------------------------------|
/// | 0-3    | power_units  | Power unit is 1/2^PU watts     |
/// | 8-12   | energy_units | Energy unit is 1/2^ESU joules  |
/// | 16-19  | time_units   | Time unit is 1/2^TU seconds    |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerUnitLayout {
    pub power_units: u8,
    pub energy_units: u8,
    pub time_units: u8,
}

impl RegisterLayout for PowerUnitLayout {
    fn to_msr_value(&self) -> u64 {
        (self.power_units as u64 & 0x0F)
            | ((self.energy_units as u64 & 0x1F) << 8)
            | ((self.time_units as u64 & 0x0F) << 16)
    }

    fn from_msr_value(value: u64) -> Self {
        Self {
            power_units: (value & 0x0F) as u8,
            energy_units: ((value >> 8) & 0x1F) as u8,
            time_units: ((value >> 16) & 0x0F) as u8,
        }
    }

    fn validate(&self) -> Result<(), &'static str> {
        if self.power_units > 15 {
            return Err("Power units must be <= 15 (4 bits)");
        }
        if self.energy_units > 31 {
            return Err("Energy units must be <= 31 (5 bits)");
        }
        if self.time_units > 15 {
            return Err("Time units must be <= 15 (4 bits)");
        }
        Ok(())
    }
}

impl PowerUnitLayout {
    /// Watts per LSB of a power field
    pub fn watts_per_unit(&self) -> f64 {
        1.0 / (1u64 << self.power_units) as f64
    }

    /// Joules per LSB of an energy counter
    pub fn joules_per_unit(&self) -> f64 {
        1.0 / (1u64 << self.energy_units) as f64
    }

    /// Seconds per LSB of a time window field
    pub fn seconds_per_unit(&self) -> f64 {
        1.0 / (1u64 << self.time_units) as f64
    }
}

/// One limit/window pair of the package power limit register
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LimitWindow {
    /// Power limit in power units (15 bits)
    pub power_limit: u16,

    pub enabled: bool,

    /// Allow going below the OS-requested P/T state to honour the limit
    pub clamping: bool,

    /// Averaging window in time units (7 bits)
    pub time_window: u8,
}

impl LimitWindow {
    fn encode(&self) -> u64 {
        (self.power_limit as u64 & 0x7FFF)
            | (if self.enabled { 1 << 15 } else { 0 })
            | (if self.clamping { 1 << 16 } else { 0 })
            | ((self.time_window as u64 & 0x7F) << 17)
    }

    fn decode(bits: u64) -> Self {
        Self {
            power_limit: (bits & 0x7FFF) as u16,
            enabled: (bits & (1 << 15)) != 0,
            clamping: (bits & (1 << 16)) != 0,
            time_window: ((bits >> 17) & 0x7F) as u8,
        }
    }
}

/// Package Power Limit Register layout
///
/// ## Register Format
///
/// | Bits   | Field      | Description                        |
/// |--------|------------|------------------------------------|
/// | 0-14   | limit 1    | Long-term power limit              |
/// | 15     | enable 1   |                                    |
/// | 16     | clamp 1    |                                    |
/// | 17-23  | window 1   | Long-term time window              |
/// | 32-46  | limit 2    | Short-term power limit             |
/// | 47     | enable 2   |                                    |
/// | 48     | clamp 2    |                                    |
/// | 49-55  | window 2   | Short-term time window             |
/// | 63     | lock       | Register locked until reset        |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PkgPowerLimitLayout {
    pub long_term: LimitWindow,
    pub short_term: LimitWindow,
    pub lock: bool,
}

impl RegisterLayout for PkgPowerLimitLayout {
    fn to_msr_value(&self) -> u64 {
        self.long_term.encode()
            | (self.short_term.encode() << 32)
            | (if self.lock { 1 << 63 } else { 0 })
    }

    fn from_msr_value(value: u64) -> Self {
        Self {
            long_term: LimitWindow::decode(value & 0xFF_FFFF),
            short_term: LimitWindow::decode((value >> 32) & 0xFF_FFFF),
            lock: (value & (1 << 63)) != 0,
        }
    }

    fn validate(&self) -> Result<(), &'static str> {
        for window in [&self.long_term, &self.short_term] {
            if window.power_limit > 0x7FFF {
                return Err("Power limit must be <= 0x7FFF (15 bits)");
            }
            if window.time_window > 127 {
                return Err("Time window must be <= 127 (7 bits)");
            }
        }
        Ok(())
    }
}
