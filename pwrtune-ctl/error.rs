use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PwrtuneError {
    #[error("Invalid CPU: {0} (no such register device)")]
    InvalidCpu(i64),

    #[error("MSR operation failed: {0}")]
    DeviceAccess(#[from] pwrtune_raw::MsrError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No CPUs found under {0}")]
    NoCpusFound(String),

    #[error(
        "Inconsistent state: operation succeeded on {applied} CPU(s) before CPU {cpu} failed: {source}"
    )]
    PartialApplication {
        applied: usize,
        cpu: u32,
        #[source]
        source: Box<PwrtuneError>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl PwrtuneError {
    /// Number of CPUs the failed batch had succeeded on, zero for every other error
    pub fn applied_count(&self) -> usize {
        match self {
            PwrtuneError::PartialApplication { applied, .. } => *applied,
            _ => 0,
        }
    }
}

pub type Result<T> = std::result::Result<T, PwrtuneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_application_message_names_count() {
        let err = PwrtuneError::PartialApplication {
            applied: 3,
            cpu: 4,
            source: Box::new(PwrtuneError::InvalidCpu(4)),
        };
        let message = err.to_string();
        assert!(message.contains("succeeded on 3 CPU(s)"));
        assert!(message.contains("CPU 4 failed"));
        assert_eq!(err.applied_count(), 3);
    }

    #[test]
    fn test_clean_failure_has_no_applied_count() {
        assert_eq!(PwrtuneError::Validation("too hot".into()).applied_count(), 0);
    }
}
