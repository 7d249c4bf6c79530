//! Flat cluster extraction from a merge forest.
//!
//! The extractor picks the single distance threshold that maximises the number
//! of clusters holding at least two entities, then cuts every tree at that
//! threshold. The search replays merges from the leaves upward while keeping a
//! running count of non-singleton clusters, so each merge node is visited once.

mod cut;
mod scan;

use tracing::{Span, debug, field, info, instrument};

use crate::{
    ClusteringResult,
    error::ExtractionError,
    hierarchy::{EntityId, MergeForest},
};

use self::{cut::cut_forest, scan::ThresholdScan};

/// Strategy used to choose the cut threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ClusteringMode {
    /// Maximise the number of clusters with at least two members.
    #[default]
    MaxNonSingleton,
}

impl ClusteringMode {
    /// Returns the stable name used on the command line and in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MaxNonSingleton => "max_non_singleton",
        }
    }
}

/// Chooses a threshold for a merge forest and cuts it into clusters.
///
/// # Examples
/// ```
/// use tncluster_core::{DistanceTriple, MergeTreeBuilder, ThresholdClusterer};
///
/// let triples = vec![
///     DistanceTriple::new(1.0, "A", "B"),
///     DistanceTriple::new(1.5, "C", "D"),
///     DistanceTriple::new(4.0, "B", "C"),
/// ];
/// let forest = MergeTreeBuilder::new().build(&triples)?;
/// let result = ThresholdClusterer::new().extract(&forest)?;
/// assert_eq!(result.threshold(), Some(1.5));
/// assert_eq!(result.clusters(), [vec!["A", "B"], vec!["C", "D"]]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThresholdClusterer {
    mode: ClusteringMode,
    verbose: bool,
}

impl ThresholdClusterer {
    /// Creates an extractor using [`ClusteringMode::MaxNonSingleton`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the threshold strategy.
    #[must_use]
    pub fn with_mode(mut self, mode: ClusteringMode) -> Self {
        self.mode = mode;
        self
    }

    /// Reports the chosen threshold and cluster count at `info` level.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Returns the configured strategy.
    #[must_use]
    pub fn mode(&self) -> ClusteringMode {
        self.mode
    }

    /// Returns whether the diagnostics summary is raised to `info`.
    #[must_use]
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Finds the optimal threshold for `forest` and cuts it.
    ///
    /// Every leaf of the forest lands in exactly one cluster. Clusters are
    /// listed root by root in breadth-first discovery order; leaves split off
    /// above the threshold appear as single-member clusters.
    ///
    /// # Errors
    /// Returns [`ExtractionError::StructuralInvariantViolation`] when a
    /// non-root merge node does not have exactly two children, or a root merge
    /// node has fewer than two. The forest is checked in full before any
    /// clusters are produced.
    #[instrument(
        name = "clusters.extract",
        err,
        skip(self, forest),
        fields(
            mode = self.mode.as_str(),
            roots = forest.roots().len(),
            threshold = field::Empty,
            non_singleton_clusters = field::Empty,
        ),
    )]
    pub fn extract<K: EntityId>(
        &self,
        forest: &MergeForest<K>,
    ) -> Result<ClusteringResult<K>, ExtractionError> {
        let threshold = match self.mode {
            ClusteringMode::MaxNonSingleton => ThresholdScan::from_forest(forest)?.best_threshold(),
        };
        let clusters = cut_forest(forest, threshold);
        let result = ClusteringResult::new(threshold, clusters);

        let non_singleton_clusters = result.non_singleton_count();
        let span = Span::current();
        if let Some(threshold) = threshold {
            span.record("threshold", threshold);
        }
        span.record("non_singleton_clusters", non_singleton_clusters);
        if self.verbose {
            info!(threshold = ?threshold, non_singleton_clusters, "optimal threshold selected");
        } else {
            debug!(threshold = ?threshold, non_singleton_clusters, "optimal threshold selected");
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests;
