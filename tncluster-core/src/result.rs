//! Result types for threshold cluster extraction.
//!
//! A clustering is reported as the list of non-singleton clusters found at the
//! chosen threshold. Per-entity assignments number those clusters from one in
//! discovery order and mark every other entity as a singleton.

use std::fmt;

/// Represents the output of a [`crate::ThresholdClusterer::extract`] call.
///
/// # Examples
/// ```
/// use tncluster_core::{ClusterAssignment, ClusterId, ClusteringResult};
///
/// let result = ClusteringResult::new(Some(2.0), vec![vec!["A", "B"], vec!["C", "D"]]);
/// assert_eq!(result.non_singleton_count(), 2);
/// let assignments: Vec<_> = result.assignments().collect();
/// assert_eq!(assignments[0], (&"A", ClusterAssignment::Cluster(ClusterId::new(1))));
/// assert_eq!(assignments[3], (&"D", ClusterAssignment::Cluster(ClusterId::new(2))));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringResult<K> {
    threshold: Option<f64>,
    clusters: Vec<Vec<K>>,
}

impl<K> ClusteringResult<K> {
    /// Builds a result from a threshold and the clusters cut at it.
    ///
    /// Clusters keep the order given; single-member clusters are reported as
    /// singletons by [`Self::assignments`].
    #[must_use]
    pub fn new(threshold: Option<f64>, clusters: Vec<Vec<K>>) -> Self {
        Self {
            threshold,
            clusters,
        }
    }

    /// Returns the chosen threshold, or `None` when the forest has no merge
    /// nodes to cut.
    #[must_use]
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    /// Returns every cluster, singletons included, in discovery order.
    #[must_use]
    pub fn clusters(&self) -> &[Vec<K>] {
        &self.clusters
    }

    /// Counts clusters with at least two members.
    #[must_use]
    pub fn non_singleton_count(&self) -> usize {
        self.non_singletons().count()
    }

    /// Counts the entities covered by the result.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.clusters.iter().map(Vec::len).sum()
    }

    /// Iterates over clusters with at least two members.
    pub fn non_singletons(&self) -> impl Iterator<Item = &[K]> {
        self.clusters
            .iter()
            .filter(|cluster| cluster.len() > 1)
            .map(Vec::as_slice)
    }

    /// Yields each entity with its assignment, cluster by cluster.
    ///
    /// Non-singleton clusters receive identifiers counting up from one;
    /// members of single-entity clusters are [`ClusterAssignment::Singleton`].
    pub fn assignments(&self) -> impl Iterator<Item = (&K, ClusterAssignment)> {
        let mut next_id = 0u64;
        self.clusters.iter().flat_map(move |cluster| {
            let assignment = if cluster.len() > 1 {
                next_id += 1;
                ClusterAssignment::Cluster(ClusterId::new(next_id))
            } else {
                ClusterAssignment::Singleton
            };
            cluster.iter().map(move |entity| (entity, assignment))
        })
    }
}

/// Cluster membership reported for one entity.
///
/// Renders as the cluster number, or `-1` for singletons.
///
/// # Examples
/// ```
/// use tncluster_core::{ClusterAssignment, ClusterId};
///
/// assert_eq!(ClusterAssignment::Cluster(ClusterId::new(3)).to_string(), "3");
/// assert_eq!(ClusterAssignment::Singleton.to_string(), "-1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterAssignment {
    /// Member of the numbered non-singleton cluster.
    Cluster(ClusterId),
    /// Not grouped with any other entity at the threshold.
    Singleton,
}

impl ClusterAssignment {
    /// Returns the cluster identifier, if any.
    #[must_use]
    pub const fn cluster_id(self) -> Option<ClusterId> {
        match self {
            Self::Cluster(id) => Some(id),
            Self::Singleton => None,
        }
    }
}

impl fmt::Display for ClusterAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cluster(id) => write!(f, "{}", id.get()),
            Self::Singleton => f.write_str("-1"),
        }
    }
}

/// Identifier assigned to a non-singleton cluster.
///
/// # Examples
/// ```
/// use tncluster_core::ClusterId;
///
/// let id = ClusterId::new(4);
/// assert_eq!(id.get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(u64);

impl ClusterId {
    /// Creates a new cluster identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}
