//! # pwrtune-raw
//!
//! Register definitions and raw MSR access for the power-management
//! controls of Intel client CPUs: voltage plane offsets, the thermal
//! throttle target and the package RAPL power limit.
//!
//! This crate only knows about bits. Unit conversion against a live CPU,
//! CPU discovery and batch application live in the `pwrtune` crate.
//!
//! ## Usage
//!
//! ```ignore
//! use std::path::Path;
//! use pwrtune_raw::regs::voltage;
//! use pwrtune_raw::{write_msr_at, DEFAULT_MSR_ROOT};
//!
//! // -80 mV on the core plane of CPU 0
//! let value = voltage::encode_write(0, -80);
//! write_msr_at(Path::new(DEFAULT_MSR_ROOT), 0, voltage::msr::MSR_UNDERVOLT_OFFSET, value)?;
//! ```

pub mod msr;
pub mod register;
pub mod regs;

// Re-export for convenience
pub use msr::{msr_path, read_msr_at, write_msr_at, MsrError, Result, DEFAULT_MSR_ROOT};
pub use register::RegisterLayout;
