//! Benchmark support crate for tncluster.
//!
//! Provides seeded synthetic distance lists and parameter types used by the
//! Criterion benchmarks for merge tree construction and threshold
//! extraction.

pub mod error;
pub mod params;
pub mod source;
