// Operations behind each CLI subcommand: resolve CPUs, run one control per CPU

use crate::common::RegisterStore;
use crate::config::Config;
use crate::controls::{rapl, voltage, RaplPowerLimit, TemperatureTarget, VoltagePlane};
use crate::error::Result;
use crate::orchestrator::batch::{apply_to_all, read_all, resolve_cpus, BatchOutcome};

pub fn list_voltage(
    config: &Config,
    store: &dyn RegisterStore,
    planes: &[VoltagePlane],
) -> Result<BatchOutcome<Vec<(VoltagePlane, i32)>>> {
    let cpus = resolve_cpus(config)?;
    read_all(&cpus, |cpu| {
        planes
            .iter()
            .map(|&plane| voltage::read_offset(store, cpu, plane).map(|mv| (plane, mv)))
            .collect()
    })
}

pub fn set_voltage(
    config: &Config,
    store: &dyn RegisterStore,
    plane: VoltagePlane,
    offset_mv: i32,
) -> Result<BatchOutcome<()>> {
    let cpus = resolve_cpus(config)?;
    apply_to_all(&cpus, |cpu| voltage::write_offset(store, cpu, plane, offset_mv))
}

pub fn list_temperature(
    config: &Config,
    store: &dyn RegisterStore,
) -> Result<BatchOutcome<TemperatureTarget>> {
    let cpus = resolve_cpus(config)?;
    read_all(&cpus, |cpu| TemperatureTarget::read(store, cpu))
}

/// Set the throttle temperature everywhere; each result says whether that
/// CPU's register was written
pub fn set_temperature(
    config: &Config,
    store: &dyn RegisterStore,
    throttle_temp: i32,
) -> Result<BatchOutcome<bool>> {
    let cpus = resolve_cpus(config)?;
    apply_to_all(&cpus, |cpu| {
        TemperatureTarget::read(store, cpu)?.set_throttle_temp(store, throttle_temp)
    })
}

pub fn list_power_limit(
    config: &Config,
    store: &dyn RegisterStore,
) -> Result<BatchOutcome<RaplPowerLimit>> {
    let cpus = resolve_cpus(config)?;
    read_all(&cpus, |cpu| rapl::read_power_limit(store, cpu))
}
