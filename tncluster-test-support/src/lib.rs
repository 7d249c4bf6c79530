//! Shared test utilities used across tncluster crates.

pub mod ci;
pub mod tracing;
