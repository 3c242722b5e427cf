use std::str::FromStr;

use pwrtune_raw::regs::voltage::{self, msr::MSR_UNDERVOLT_OFFSET, UndervoltRequest};

use crate::coded_enum;
use crate::common::RegisterStore;
use crate::controls::encode_checked;
use crate::error::{PwrtuneError, Result};

/// Offsets outside this range do not survive the 11-bit register field
pub const MAX_OFFSET_MV: i32 = 999;

coded_enum! {
    /// Independently adjustable voltage domains of the undervolt mailbox
    pub enum VoltagePlane: u8 {
        Core => ("cpu", 0),
        Gpu => ("gpu", 1),
        Cache => ("cache", 2),
        Uncore => ("uncore", 3),
        AnalogIo => ("analogio", 4),
    }
}

impl FromStr for VoltagePlane {
    type Err = PwrtuneError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "core" => Ok(VoltagePlane::Core),
            "analog-io" | "analog_io" => Ok(VoltagePlane::AnalogIo),
            _ => VoltagePlane::from_name(&name).ok_or_else(|| {
                PwrtuneError::ConfigError(format!(
                    "Invalid plane '{s}', expected one of: cpu, gpu, cache, uncore, analogio"
                ))
            }),
        }
    }
}

/// Register value that applies `offset_mv` to `plane`
pub fn encode_write(plane: VoltagePlane, offset_mv: i32) -> u64 {
    voltage::encode_write(plane.code(), offset_mv)
}

/// Plane and offset carried by a register value
///
/// The plane is `None` when the firmware answers with a selector outside
/// the known planes; some CPUs do not echo the plane at all.
pub fn decode(value: u64) -> (Option<VoltagePlane>, i32) {
    let (code, offset_mv) = voltage::decode(value);
    (VoltagePlane::from_code(code), offset_mv)
}

/// Current offset of `plane` on `cpu`, in millivolts
///
/// The mailbox only returns a plane's offset after a read request for that
/// plane has been written to it, so this performs a write followed by a
/// read of the same register.
pub fn read_offset(store: &dyn RegisterStore, cpu: u32, plane: VoltagePlane) -> Result<i32> {
    store.write(
        cpu,
        MSR_UNDERVOLT_OFFSET,
        voltage::encode_read_request(plane.code()),
    )?;
    let value = store.read(cpu, MSR_UNDERVOLT_OFFSET)?;

    let (answered, offset_mv) = decode(value);
    if answered.is_some_and(|p| p != plane) {
        tracing::debug!(
            "CPU {} answered read of plane {} with plane code {}",
            cpu,
            plane,
            (value >> voltage::PLANE_SHIFT) & voltage::PLANE_MASK
        );
    }

    Ok(offset_mv)
}

/// Apply an offset of `offset_mv` millivolts to `plane` on `cpu`
pub fn write_offset(
    store: &dyn RegisterStore,
    cpu: u32,
    plane: VoltagePlane,
    offset_mv: i32,
) -> Result<()> {
    if !(-MAX_OFFSET_MV..=MAX_OFFSET_MV).contains(&offset_mv) {
        return Err(PwrtuneError::Validation(format!(
            "Voltage offset {offset_mv} mV is outside -{MAX_OFFSET_MV}..={MAX_OFFSET_MV} mV"
        )));
    }

    let value = encode_checked(&UndervoltRequest::write(plane.code(), offset_mv))?;
    store.write(cpu, MSR_UNDERVOLT_OFFSET, value)?;
    tracing::info!(
        "CPU {}: set {} plane offset to {} mV (0x{:016x})",
        cpu,
        plane,
        offset_mv,
        value
    );
    Ok(())
}
