//! Register definitions for client Intel power management
//!
//! - **voltage** - Voltage offset mailbox (undervolting), MSR 0x150
//! - **thermal** - TCC activation target and offset, MSR 0x1A2
//! - **rapl** - Package power limit and its unit register, MSR 0x610/0x606
//!
//! ## References
//!
//! - Intel® 64 and IA-32 Architectures Software Developer's Manual, Volume 4

pub mod rapl;
pub mod thermal;
pub mod voltage;
