// Sequential per-CPU execution with partial-failure accounting

use crate::common::cpus;
use crate::config::{Config, CpuSelector};
use crate::error::{PwrtuneError, Result};

/// Per-CPU results of a batch, in the order the CPUs were processed
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<T> {
    results: Vec<(u32, T)>,
}

impl<T> Default for BatchOutcome<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
        }
    }
}

impl<T> BatchOutcome<T> {
    /// Number of CPUs the operation completed on
    pub fn applied(&self) -> usize {
        self.results.len()
    }

    pub fn results(&self) -> &[(u32, T)] {
        &self.results
    }

    fn push(mut self, cpu: u32, value: T) -> Self {
        self.results.push((cpu, value));
        self
    }
}

impl BatchOutcome<bool> {
    /// Number of CPUs whose register was actually written
    pub fn written(&self) -> usize {
        self.results.iter().filter(|(_, wrote)| *wrote).count()
    }
}

/// Run a mutating `op` on each CPU in turn
///
/// Stops at the first failure. If `op` had already succeeded on earlier CPUs
/// the failure comes back as [`PwrtuneError::PartialApplication`] carrying
/// how many; nothing is retried or rolled back. An `op` that may succeed
/// without writing should say so in `T`.
pub fn apply_to_all<T, F>(cpus: &[u32], mut op: F) -> Result<BatchOutcome<T>>
where
    F: FnMut(u32) -> Result<T>,
{
    cpus.iter()
        .try_fold(BatchOutcome::default(), |outcome, &cpu| match op(cpu) {
            Ok(value) => Ok(outcome.push(cpu, value)),
            Err(e) if outcome.applied() > 0 => {
                tracing::warn!(
                    "Inconsistent state: operation succeeded on {} CPU(s) before CPU {} failed",
                    outcome.applied(),
                    cpu
                );
                Err(PwrtuneError::PartialApplication {
                    applied: outcome.applied(),
                    cpu,
                    source: Box::new(e),
                })
            }
            Err(e) => Err(e),
        })
}

/// Run a read-only `op` on each CPU in turn, stopping at the first failure
pub fn read_all<T, F>(cpus: &[u32], mut op: F) -> Result<BatchOutcome<T>>
where
    F: FnMut(u32) -> Result<T>,
{
    cpus.iter()
        .try_fold(BatchOutcome::default(), |outcome, &cpu| {
            Ok(outcome.push(cpu, op(cpu)?))
        })
}

/// CPUs selected by `config`, validated against its device tree
pub fn resolve_cpus(config: &Config) -> Result<Vec<u32>> {
    match &config.cpus {
        CpuSelector::All => cpus::enumerate_cpus(&config.msr_root),
        CpuSelector::List(ids) => ids
            .iter()
            .map(|&id| cpus::validate_cpu(&config.msr_root, id))
            .collect(),
    }
}
