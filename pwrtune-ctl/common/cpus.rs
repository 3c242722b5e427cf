use std::fs;
use std::io;
use std::path::Path;

use crate::error::{PwrtuneError, Result};

/// List the CPUs that expose a register device under `root`
///
/// Ids come back in directory order, which is not necessarily numeric.
/// Entries whose names are not nonnegative integers are skipped.
pub fn enumerate_cpus(root: &Path) -> Result<Vec<u32>> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PwrtuneError::NoCpusFound(root.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut cpus = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        match name.to_str().and_then(|n| n.parse::<u32>().ok()) {
            Some(cpu) => cpus.push(cpu),
            None => tracing::debug!("Skipping non-CPU entry {:?} in {}", name, root.display()),
        }
    }

    if cpus.is_empty() {
        return Err(PwrtuneError::NoCpusFound(root.display().to_string()));
    }

    tracing::debug!("Found {} CPUs under {}: {:?}", cpus.len(), root.display(), cpus);
    Ok(cpus)
}

/// Check that `cpu` is nonnegative and has a register device under `root`
pub fn validate_cpu(root: &Path, cpu: i64) -> Result<u32> {
    let id = u32::try_from(cpu).map_err(|_| PwrtuneError::InvalidCpu(cpu))?;
    if !root.join(id.to_string()).exists() {
        return Err(PwrtuneError::InvalidCpu(cpu));
    }
    Ok(id)
}
