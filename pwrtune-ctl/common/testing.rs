//! Test doubles: an in-memory register store and throwaway device trees

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::common::msr::RegisterStore;
use crate::error::{PwrtuneError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read { cpu: u32, addr: u64 },
    Write { cpu: u32, addr: u64, value: u64 },
}

/// Register store keeping values in a map and logging every access
#[derive(Default)]
pub struct MemoryStore {
    registers: RefCell<HashMap<(u32, u64), u64>>,
    /// Value latched into a register after any write to it, like a mailbox
    replies: HashMap<(u32, u64), u64>,
    failing_cpus: HashSet<u32>,
    log: RefCell<Vec<Access>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_register(self, cpu: u32, addr: u64, value: u64) -> Self {
        self.registers.borrow_mut().insert((cpu, addr), value);
        self
    }

    pub fn with_reply(mut self, cpu: u32, addr: u64, value: u64) -> Self {
        self.replies.insert((cpu, addr), value);
        self
    }

    /// Every access to `cpu` fails as if its device had gone away
    pub fn with_failing_cpu(mut self, cpu: u32) -> Self {
        self.failing_cpus.insert(cpu);
        self
    }

    pub fn register(&self, cpu: u32, addr: u64) -> Option<u64> {
        self.registers.borrow().get(&(cpu, addr)).copied()
    }

    pub fn log(&self) -> Vec<Access> {
        self.log.borrow().clone()
    }

    pub fn writes(&self) -> Vec<Access> {
        self.log()
            .into_iter()
            .filter(|a| matches!(a, Access::Write { .. }))
            .collect()
    }

    fn check(&self, cpu: u32) -> Result<()> {
        if self.failing_cpus.contains(&cpu) {
            return Err(PwrtuneError::InvalidCpu(cpu as i64));
        }
        Ok(())
    }
}

impl RegisterStore for MemoryStore {
    fn read(&self, cpu: u32, addr: u64) -> Result<u64> {
        self.check(cpu)?;
        self.log.borrow_mut().push(Access::Read { cpu, addr });
        Ok(self.register(cpu, addr).unwrap_or(0))
    }

    fn write(&self, cpu: u32, addr: u64, value: u64) -> Result<()> {
        self.check(cpu)?;
        self.log.borrow_mut().push(Access::Write { cpu, addr, value });
        let stored = self.replies.get(&(cpu, addr)).copied().unwrap_or(value);
        self.registers.borrow_mut().insert((cpu, addr), stored);
        Ok(())
    }
}

/// Directory shaped like `/dev/cpu`, removed on drop
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn with_cpus(name: &str, cpus: &[u32]) -> Self {
        let path = std::env::temp_dir().join(format!("pwrtune-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).unwrap();
        for cpu in cpus {
            let dir = path.join(cpu.to_string());
            std::fs::create_dir(&dir).unwrap();
            std::fs::write(dir.join("msr"), b"").unwrap();
        }
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
