//! MSR (Model-Specific Register) read/write primitives
//!
//! Every access goes through the msr driver's per-CPU device node,
//! `<root>/<cpu>/msr` (normally `/dev/cpu/<cpu>/msr`). The file offset is the
//! register address and each transfer is exactly 8 little-endian bytes.
//!
//! The handle is opened for a single access and dropped before returning, so
//! no file descriptor outlives a call, including on error paths.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, MsrError>;

/// Directory holding one subdirectory per CPU exposed by the msr driver
pub const DEFAULT_MSR_ROOT: &str = "/dev/cpu";

/// Errors that can occur during MSR operations
#[derive(Debug, thiserror::Error)]
pub enum MsrError {
    #[error("Failed to open MSR device {} for CPU {cpu}: {source}", .path.display())]
    OpenFailed {
        cpu: u32,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read MSR 0x{msr:X} on CPU {cpu}: {source}")]
    ReadFailed {
        cpu: u32,
        msr: u64,
        source: std::io::Error,
    },

    #[error("Failed to write MSR 0x{msr:X} on CPU {cpu}: {source}")]
    WriteFailed {
        cpu: u32,
        msr: u64,
        source: std::io::Error,
    },

    #[error("Failed to seek to MSR 0x{msr:X} on CPU {cpu}: {source}")]
    SeekFailed {
        cpu: u32,
        msr: u64,
        source: std::io::Error,
    },
}

/// Path of the register file for `cpu` below `root`
pub fn msr_path(root: &Path, cpu: u32) -> PathBuf {
    root.join(cpu.to_string()).join("msr")
}

/// Read a 64-bit value from an MSR of `cpu`, using the device tree at `root`
///
/// The device is opened read-only.
///
/// # Errors
///
/// Returns an error if:
/// - The MSR device cannot be opened (requires root/CAP_SYS_RAWIO, and the
///   msr kernel module)
/// - The seek fails or fewer than 8 bytes can be read, which is how the
///   driver reports an unsupported register
pub fn read_msr_at(root: &Path, cpu: u32, msr: u64) -> Result<u64> {
    let path = msr_path(root, cpu);
    let mut file = File::open(&path).map_err(|e| MsrError::OpenFailed {
        cpu,
        path: path.clone(),
        source: e,
    })?;

    file.seek(SeekFrom::Start(msr))
        .map_err(|e| MsrError::SeekFailed {
            cpu,
            msr,
            source: e,
        })?;

    let mut buffer = [0u8; 8];
    file.read_exact(&mut buffer)
        .map_err(|e| MsrError::ReadFailed {
            cpu,
            msr,
            source: e,
        })?;

    Ok(u64::from_le_bytes(buffer))
}

/// Write a 64-bit value to an MSR of `cpu`, using the device tree at `root`
///
/// The device is opened write-only with `O_SYNC`.
///
/// # Safety
///
/// Writing incorrect values to MSRs can cause system instability or crashes.
/// Build values through a [`RegisterLayout`](crate::RegisterLayout) or the
/// encoders in [`regs`](crate::regs), never by hand.
pub fn write_msr_at(root: &Path, cpu: u32, msr: u64, value: u64) -> Result<()> {
    let path = msr_path(root, cpu);
    let mut file = OpenOptions::new()
        .write(true)
        .custom_flags(libc::O_SYNC)
        .open(&path)
        .map_err(|e| MsrError::OpenFailed {
            cpu,
            path: path.clone(),
            source: e,
        })?;

    file.seek(SeekFrom::Start(msr))
        .map_err(|e| MsrError::SeekFailed {
            cpu,
            msr,
            source: e,
        })?;

    file.write_all(&value.to_le_bytes())
        .map_err(|e| MsrError::WriteFailed {
            cpu,
            msr,
            source: e,
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("pwrtune-raw-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("0")).unwrap();
        std::fs::write(root.join("0").join("msr"), b"").unwrap();
        root
    }

    #[test]
    fn test_msr_error_display() {
        let err = MsrError::OpenFailed {
            cpu: 0,
            path: PathBuf::from("/dev/cpu/0/msr"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("Failed to open MSR device /dev/cpu/0/msr"));
    }

    #[test]
    fn test_msr_path_layout() {
        assert_eq!(
            msr_path(Path::new("/dev/cpu"), 12),
            PathBuf::from("/dev/cpu/12/msr")
        );
    }

    #[test]
    fn test_write_then_read_at_offset() {
        let root = scratch_root("rw");

        write_msr_at(&root, 0, 0x1A2, 0x0A64_0000).unwrap();
        write_msr_at(&root, 0, 0x150, 0x8000_0111_0000_0000).unwrap();

        assert_eq!(read_msr_at(&root, 0, 0x1A2).unwrap(), 0x0A64_0000);
        assert_eq!(read_msr_at(&root, 0, 0x150).unwrap(), 0x8000_0111_0000_0000);

        let bytes = std::fs::read(msr_path(&root, 0)).unwrap();
        assert_eq!(&bytes[0x1A2..0x1A2 + 8], &0x0A64_0000u64.to_le_bytes());

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_short_read_is_read_error() {
        let root = scratch_root("short");

        let err = read_msr_at(&root, 0, 0x606).unwrap_err();
        assert!(matches!(err, MsrError::ReadFailed { cpu: 0, msr: 0x606, .. }));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_missing_device_is_open_error() {
        let root = scratch_root("missing");

        let err = read_msr_at(&root, 7, 0x606).unwrap_err();
        assert!(matches!(err, MsrError::OpenFailed { cpu: 7, .. }));

        std::fs::remove_dir_all(&root).unwrap();
    }
}
