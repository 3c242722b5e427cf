use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{PwrtuneError, Result};

/// Widest range a single `a-b` selector may expand to
pub const MAX_RANGE_SPAN: i64 = 65_536;

/// Which CPUs an operation targets
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CpuSelector {
    /// Every CPU that exposes a register device
    #[default]
    All,
    /// Explicit ids, in the order given; validated before use
    List(Vec<i64>),
}

impl CpuSelector {
    /// Parse a CPU list like "0-3,8-11" or the keyword "all"
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(CpuSelector::All);
        }

        let mut cpus = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            // A plain number, possibly negative so it can be reported as an invalid CPU
            if let Ok(cpu) = part.parse::<i64>() {
                cpus.push(cpu);
                continue;
            }

            let (start, end) = part
                .split_once('-')
                .ok_or_else(|| PwrtuneError::ConfigError(format!("Invalid CPU id: {part}")))?;
            let start: i64 = start.trim().parse().map_err(|_| {
                PwrtuneError::ConfigError(format!("Invalid CPU range start: {part}"))
            })?;
            let end: i64 = end.trim().parse().map_err(|_| {
                PwrtuneError::ConfigError(format!("Invalid CPU range end: {part}"))
            })?;
            if start > end {
                return Err(PwrtuneError::ConfigError(format!(
                    "Empty CPU range: {part}"
                )));
            }
            if end > u32::MAX as i64 || end - start >= MAX_RANGE_SPAN {
                return Err(PwrtuneError::ConfigError(format!(
                    "CPU range too large: {part} (at most {MAX_RANGE_SPAN} CPUs)"
                )));
            }
            cpus.extend(start..=end);
        }

        // Keep first occurrence order, drop repeats
        let mut seen = std::collections::HashSet::new();
        cpus.retain(|cpu| seen.insert(*cpu));

        if cpus.is_empty() {
            return Err(PwrtuneError::ConfigError(format!(
                "No CPU ids in selector: {s:?}"
            )));
        }

        Ok(CpuSelector::List(cpus))
    }
}

impl FromStr for CpuSelector {
    type Err = PwrtuneError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Everything an operation needs to know about where and what to touch
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one `<cpu>/msr` device per CPU
    pub msr_root: PathBuf,
    pub cpus: CpuSelector,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            msr_root: PathBuf::from(pwrtune_raw::DEFAULT_MSR_ROOT),
            cpus: CpuSelector::All,
        }
    }
}

impl Config {
    pub fn new(msr_root: impl Into<PathBuf>, cpus: CpuSelector) -> Self {
        Self {
            msr_root: msr_root.into(),
            cpus,
        }
    }
}
