use pwrtune_raw::regs::rapl::{
    msr::{MSR_PKG_POWER_LIMIT, MSR_RAPL_POWER_UNIT},
    LimitWindow, PkgPowerLimitLayout, PowerUnitLayout,
};
use pwrtune_raw::RegisterLayout;

use crate::common::RegisterStore;
use crate::error::Result;

/// Scale factors from MSR_RAPL_POWER_UNIT
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUnits {
    pub power_unit_watts: f64,
    pub energy_unit_joules: f64,
    pub time_unit_seconds: f64,
}

impl PowerUnits {
    pub fn from_register(value: u64) -> Self {
        let layout = PowerUnitLayout::from_msr_value(value);
        Self {
            power_unit_watts: layout.watts_per_unit(),
            energy_unit_joules: layout.joules_per_unit(),
            time_unit_seconds: layout.seconds_per_unit(),
        }
    }
}

/// One limit/window pair in physical units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PowerLimitWindow {
    pub power_limit_watts: f64,
    pub time_window_seconds: f64,
    pub enabled: bool,
    pub clamping: bool,
}

impl PowerLimitWindow {
    fn scale(raw: &LimitWindow, units: &PowerUnits) -> Self {
        Self {
            power_limit_watts: raw.power_limit as f64 * units.power_unit_watts,
            time_window_seconds: raw.time_window as f64 * units.time_unit_seconds,
            enabled: raw.enabled,
            clamping: raw.clamping,
        }
    }
}

/// Package power limit of a CPU
///
/// The top-level fields describe the long-term limit (PL1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaplPowerLimit {
    pub cpu: u32,
    pub power_limit_watts: f64,
    pub time_window_seconds: f64,
    pub enabled: bool,
    pub clamping: bool,
    /// Short-term limit (PL2)
    pub short_term: PowerLimitWindow,
    /// Set when the register is locked until the next reset
    pub locked: bool,
    /// Units the limits were scaled with
    pub units: PowerUnits,
}

impl RaplPowerLimit {
    /// Interpret a raw MSR_PKG_POWER_LIMIT value with the units of the same package
    pub fn decode(cpu: u32, units: &PowerUnits, value: u64) -> Self {
        let layout = PkgPowerLimitLayout::from_msr_value(value);
        let long_term = PowerLimitWindow::scale(&layout.long_term, units);

        Self {
            cpu,
            power_limit_watts: long_term.power_limit_watts,
            time_window_seconds: long_term.time_window_seconds,
            enabled: long_term.enabled,
            clamping: long_term.clamping,
            short_term: PowerLimitWindow::scale(&layout.short_term, units),
            locked: layout.lock,
            units: *units,
        }
    }
}

pub fn read_units(store: &dyn RegisterStore, cpu: u32) -> Result<PowerUnits> {
    let value = store.read(cpu, MSR_RAPL_POWER_UNIT)?;
    Ok(PowerUnits::from_register(value))
}

/// Read the package power limit of `cpu`, fetching its units first
pub fn read_power_limit(store: &dyn RegisterStore, cpu: u32) -> Result<RaplPowerLimit> {
    let units = read_units(store, cpu)?;
    let value = store.read(cpu, MSR_PKG_POWER_LIMIT)?;
    Ok(RaplPowerLimit::decode(cpu, &units, value))
}
