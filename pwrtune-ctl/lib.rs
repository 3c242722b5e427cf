// Macros (must be first for visibility)
#[macro_use]
pub mod macros;

pub mod common;
pub mod config;
pub mod controls;
pub mod error;
pub mod orchestrator;
pub mod report;

pub use common::{MsrStore, RegisterStore};
pub use config::{Config, CpuSelector};
pub use controls::{PowerUnits, RaplPowerLimit, TemperatureTarget, VoltagePlane};
pub use error::{PwrtuneError, Result};
pub use orchestrator::{apply_to_all, read_all, BatchOutcome};
