//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use tncluster_core::{ExtractionError, TreeError};

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic distance generation failed.
    #[error("synthetic distance generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Merge tree construction failed.
    #[error("merge tree construction failed: {0}")]
    Tree(#[from] TreeError),
    /// Cluster extraction failed.
    #[error("cluster extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
}
