pub mod rapl;
pub mod thermal;
pub mod voltage;

pub use rapl::{PowerLimitWindow, PowerUnits, RaplPowerLimit};
pub use thermal::TemperatureTarget;
pub use voltage::VoltagePlane;

use pwrtune_raw::RegisterLayout;

use crate::error::{PwrtuneError, Result};

/// Raw value of `layout`, refused unless every field fits its bit width
pub(crate) fn encode_checked<L: RegisterLayout>(layout: &L) -> Result<u64> {
    layout
        .validate()
        .map_err(|e| PwrtuneError::Validation(e.to_string()))?;
    Ok(layout.to_msr_value())
}
