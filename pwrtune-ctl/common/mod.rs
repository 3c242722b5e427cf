pub mod cpus;
pub mod msr;

pub use cpus::{enumerate_cpus, validate_cpu};
pub use msr::{MsrStore, RegisterStore};

#[cfg(test)]
pub(crate) mod testing;
