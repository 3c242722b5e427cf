use pwrtune_raw::regs::thermal::{self, msr::MSR_TEMPERATURE_TARGET, TemperatureTargetLayout};
use pwrtune_raw::RegisterLayout;

use crate::common::RegisterStore;
use crate::controls::encode_checked;
use crate::error::{PwrtuneError, Result};

/// Snapshot of a CPU's TEMPERATURE_TARGET register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureTarget {
    pub cpu: u32,
    /// Default throttle activation temperature in °C
    pub target: u8,
    /// Degrees below `target` at which throttling begins
    pub offset: u8,
}

impl TemperatureTarget {
    pub fn new(cpu: u32, target: u8, offset: u8) -> Self {
        Self {
            cpu,
            target,
            offset,
        }
    }

    pub fn from_register(cpu: u32, value: u64) -> Self {
        let layout = TemperatureTargetLayout::from_msr_value(value);
        Self::new(cpu, layout.target, layout.offset)
    }

    pub fn read(store: &dyn RegisterStore, cpu: u32) -> Result<Self> {
        let value = store.read(cpu, MSR_TEMPERATURE_TARGET)?;
        Ok(Self::from_register(cpu, value))
    }

    /// Temperature in °C at which the CPU starts throttling
    pub fn throttle_temp(&self) -> i32 {
        self.target as i32 - self.offset as i32
    }

    /// Move the throttle point to `throttle_temp` °C
    ///
    /// Returns `Ok(false)` without touching the register when the requested
    /// temperature is already in effect. The offset field is replaced in a
    /// fresh read of the register so the remaining bits are written back
    /// unchanged.
    pub fn set_throttle_temp(
        &mut self,
        store: &dyn RegisterStore,
        throttle_temp: i32,
    ) -> Result<bool> {
        if throttle_temp > self.target as i32 {
            return Err(PwrtuneError::Validation(format!(
                "CPU {} throttling temperature cannot be higher than {} °C (requested {} °C)",
                self.cpu, self.target, throttle_temp
            )));
        }

        let new_offset = self.target as i64 - throttle_temp as i64;
        if new_offset > thermal::OFFSET_MASK as i64 {
            return Err(PwrtuneError::Validation(format!(
                "CPU {} throttling temperature cannot be lower than {} °C (requested {} °C)",
                self.cpu,
                self.target as i32 - thermal::OFFSET_MASK as i32,
                throttle_temp
            )));
        }

        let new_offset = new_offset as u8;
        if new_offset == self.offset {
            tracing::debug!(
                "CPU {} already throttles at {} °C, nothing to do",
                self.cpu,
                throttle_temp
            );
            return Ok(false);
        }

        encode_checked(&TemperatureTargetLayout {
            target: self.target,
            offset: new_offset,
        })?;

        let current = store.read(self.cpu, MSR_TEMPERATURE_TARGET)?;
        store.write(
            self.cpu,
            MSR_TEMPERATURE_TARGET,
            thermal::with_offset(current, new_offset),
        )?;

        tracing::info!(
            "CPU {}: throttle temperature {} °C -> {} °C (offset {})",
            self.cpu,
            self.throttle_temp(),
            throttle_temp,
            new_offset
        );
        self.offset = new_offset;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::{Access, MemoryStore};

    // target 100 °C, offset 10 °C, plus reserved bits that must survive writes
    const REGISTER: u64 = 0x4000_0000_0A64_0000;

    #[test]
    fn test_throttle_temp_is_target_minus_offset() {
        assert_eq!(TemperatureTarget::new(0, 100, 10).throttle_temp(), 90);
        assert_eq!(TemperatureTarget::new(3, 95, 0).throttle_temp(), 95);
    }

    #[test]
    fn test_read_decodes_fields() {
        let store = MemoryStore::new().with_register(1, MSR_TEMPERATURE_TARGET, REGISTER);

        let tt = TemperatureTarget::read(&store, 1).unwrap();
        assert_eq!(tt, TemperatureTarget::new(1, 100, 10));
    }

    #[test]
    fn test_set_above_target_is_rejected_without_writes() {
        let store = MemoryStore::new().with_register(0, MSR_TEMPERATURE_TARGET, REGISTER);
        let mut tt = TemperatureTarget::read(&store, 0).unwrap();

        let err = tt.set_throttle_temp(&store, 101).unwrap_err();
        assert!(matches!(err, PwrtuneError::Validation(_)));
        assert!(store.writes().is_empty());
        assert_eq!(tt.offset, 10);
    }

    #[test]
    fn test_set_current_temp_is_a_no_op() {
        let store = MemoryStore::new().with_register(0, MSR_TEMPERATURE_TARGET, REGISTER);
        let mut tt = TemperatureTarget::read(&store, 0).unwrap();

        assert!(!tt.set_throttle_temp(&store, 90).unwrap());
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_set_writes_offset_and_keeps_other_bits() {
        let store = MemoryStore::new().with_register(0, MSR_TEMPERATURE_TARGET, REGISTER);
        let mut tt = TemperatureTarget::read(&store, 0).unwrap();

        assert!(tt.set_throttle_temp(&store, 80).unwrap());
        assert_eq!(tt.offset, 20);
        assert_eq!(tt.throttle_temp(), 80);
        assert_eq!(
            store.writes(),
            vec![Access::Write {
                cpu: 0,
                addr: MSR_TEMPERATURE_TARGET,
                value: 0x4000_0000_1464_0000,
            }]
        );
    }

    #[test]
    fn test_set_below_offset_range_is_rejected() {
        let store = MemoryStore::new().with_register(0, MSR_TEMPERATURE_TARGET, REGISTER);
        let mut tt = TemperatureTarget::read(&store, 0).unwrap();

        assert!(tt.set_throttle_temp(&store, 37).is_ok());
        let err = tt.set_throttle_temp(&store, 36).unwrap_err();
        assert!(matches!(err, PwrtuneError::Validation(_)));
        assert_eq!(tt.offset, 63);
    }

    #[test]
    fn test_set_far_below_target_is_rejected_without_panicking() {
        let store = MemoryStore::new().with_register(0, MSR_TEMPERATURE_TARGET, REGISTER);
        let mut tt = TemperatureTarget::read(&store, 0).unwrap();

        for temp in [i32::MIN, i32::MIN + 50, -1000] {
            let err = tt.set_throttle_temp(&store, temp).unwrap_err();
            assert!(matches!(err, PwrtuneError::Validation(_)), "{temp}");
        }
        assert!(store.writes().is_empty());
        assert_eq!(tt.offset, 10);
    }
}
