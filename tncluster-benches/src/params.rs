//! Benchmark parameter types.

use std::fmt;

/// Parameters for a tree building or extraction benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct DistanceBenchParams {
    /// Number of distinct entities.
    pub entity_count: u32,
    /// Number of distance records per entity.
    pub degree: u32,
    /// Whether disconnected components are joined under a synthetic root.
    pub synthetic_root: bool,
}

impl fmt::Display for DistanceBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},k={}", self.entity_count, self.degree)?;
        if self.synthetic_root {
            f.write_str(",rooted")?;
        }
        Ok(())
    }
}
