use std::path::{Path, PathBuf};

use crate::common::cpus;
use crate::config::Config;
use crate::error::Result;

/// Byte-addressed access to the 64-bit registers of one CPU
///
/// Every call is a fresh access; implementations must not cache values.
pub trait RegisterStore {
    fn read(&self, cpu: u32, addr: u64) -> Result<u64>;

    fn write(&self, cpu: u32, addr: u64, value: u64) -> Result<()>;
}

/// Register store backed by the msr driver's device nodes
///
/// Each access validates the CPU, then opens, seeks and transfers through
/// `pwrtune_raw`, which drops the handle before returning.
#[derive(Debug, Clone)]
pub struct MsrStore {
    root: PathBuf,
}

impl MsrStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.msr_root.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RegisterStore for MsrStore {
    fn read(&self, cpu: u32, addr: u64) -> Result<u64> {
        cpus::validate_cpu(&self.root, cpu as i64)?;
        let value = pwrtune_raw::read_msr_at(&self.root, cpu, addr)?;
        tracing::debug!(
            "MSR read: CPU {} MSR 0x{:08x} = 0x{:016x}",
            cpu,
            addr,
            value
        );
        Ok(value)
    }

    fn write(&self, cpu: u32, addr: u64, value: u64) -> Result<()> {
        cpus::validate_cpu(&self.root, cpu as i64)?;
        tracing::debug!(
            "MSR write: CPU {} MSR 0x{:08x} <- 0x{:016x}",
            cpu,
            addr,
            value
        );
        pwrtune_raw::write_msr_at(&self.root, cpu, addr, value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::ScratchDir;
    use crate::error::PwrtuneError;

    #[test]
    fn test_store_round_trip_through_files() {
        let dir = ScratchDir::with_cpus("store-rw", &[0, 1]);
        let store = MsrStore::new(dir.path());

        store.write(1, 0x1A2, 0x0A64_0000).unwrap();
        assert_eq!(store.read(1, 0x1A2).unwrap(), 0x0A64_0000);

        // CPU 0 is a separate file
        assert!(matches!(
            store.read(0, 0x1A2),
            Err(PwrtuneError::DeviceAccess(_))
        ));
    }

    #[test]
    fn test_store_rejects_unknown_cpu() {
        let dir = ScratchDir::with_cpus("store-invalid", &[0]);
        let store = MsrStore::new(dir.path());

        assert!(matches!(
            store.write(3, 0x150, 0),
            Err(PwrtuneError::InvalidCpu(3))
        ));
        assert!(!dir.path().join("3").exists());
    }
}
