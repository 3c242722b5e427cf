pub mod actions;
pub mod batch;

pub use batch::{apply_to_all, read_all, resolve_cpus, BatchOutcome};
