//! Single-linkage merge-tree construction from sorted distance triples.
//!
//! Triples are swept in non-decreasing distance order. Whenever a triple is
//! the first to connect two clusters, a merge node labelled with its distance
//! is created above both cluster roots. This is Kruskal's algorithm with the
//! dendrogram recorded on the side, so it matches repeatedly merging the two
//! closest clusters without the cubic cost.

use std::collections::HashMap;

use tracing::{Span, debug, field, instrument};

use crate::{
    error::TreeError,
    triple::{DistanceList, DistanceTriple},
};

use super::{
    EntityId,
    disjoint_set::DisjointSet,
    forest::{MergeForest, NodeId},
};

/// Configures and runs merge-tree construction.
///
/// Without a missing distance, a disconnected input yields one root per
/// connected component. With one, the components are gathered under a single
/// synthetic root at that height.
///
/// # Examples
/// ```
/// use tncluster_core::{DistanceTriple, MergeTreeBuilder};
///
/// let triples = vec![
///     DistanceTriple::new(1.0, "A", "B"),
///     DistanceTriple::new(1.0, "C", "D"),
/// ];
/// let split = MergeTreeBuilder::new().build(&triples)?;
/// assert_eq!(split.roots().len(), 2);
///
/// let rooted = MergeTreeBuilder::new()
///     .with_missing_distance(10.0)
///     .build(&triples)?;
/// let root = rooted.node(rooted.roots()[0]).expect("root exists");
/// assert_eq!(root.height(), 10.0);
/// assert_eq!(root.children().len(), 2);
/// # Ok::<(), tncluster_core::TreeError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MergeTreeBuilder {
    missing_distance: Option<f64>,
}

impl MergeTreeBuilder {
    /// Creates a builder that leaves disconnected components unrooted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Roots disconnected components under a synthetic node at `distance`.
    ///
    /// The distance must be finite and strictly greater than every input
    /// distance; [`Self::build`] checks this before doing any work.
    #[must_use]
    pub fn with_missing_distance(mut self, distance: f64) -> Self {
        self.missing_distance = Some(distance);
        self
    }

    /// Returns the configured missing distance.
    #[must_use]
    pub fn missing_distance(&self) -> Option<f64> {
        self.missing_distance
    }

    /// Builds the merge forest for `triples`, which must already be sorted
    /// ascending by distance.
    ///
    /// Every entity mentioned by a triple appears as exactly one leaf. Triples
    /// joining entities that are already connected leave the tree unchanged.
    ///
    /// # Errors
    /// Returns [`TreeError::InvalidDistance`] for negative or non-finite
    /// distances, [`TreeError::UnsortedInput`] when the triples are out of
    /// order, and [`TreeError::InvalidMissingDistance`] when the configured
    /// missing distance does not exceed the largest input distance. All of
    /// these are detected before construction starts.
    #[instrument(
        name = "tree.build",
        err,
        skip(self, triples),
        fields(triples = triples.len(), entities = field::Empty, roots = field::Empty),
    )]
    pub fn build<K: EntityId>(
        &self,
        triples: &[DistanceTriple<K>],
    ) -> Result<MergeForest<K>, TreeError> {
        let max_distance = validate_triples(triples)?;
        self.validate_missing_distance(max_distance)?;

        let mut sweep = Sweep::new();
        for triple in triples {
            sweep.merge(triple)?;
        }
        let entities = sweep.dsu.len();
        let (forest, synthetic_root) = sweep.finish(self.missing_distance);

        let span = Span::current();
        span.record("entities", entities);
        span.record("roots", forest.roots().len());
        debug!(
            entities,
            roots = forest.roots().len(),
            synthetic_root,
            "merge forest built"
        );
        Ok(forest)
    }

    /// Builds the merge forest for an already sorted [`DistanceList`].
    ///
    /// # Errors
    /// Returns the same errors as [`Self::build`].
    pub fn build_list<K: EntityId>(
        &self,
        list: &DistanceList<K>,
    ) -> Result<MergeForest<K>, TreeError> {
        self.build(list.as_slice())
    }

    fn validate_missing_distance(&self, max_distance: Option<f64>) -> Result<(), TreeError> {
        let Some(missing_distance) = self.missing_distance else {
            return Ok(());
        };
        let exceeds_max = max_distance.is_none_or(|max| missing_distance > max);
        if missing_distance.is_finite() && exceeds_max {
            return Ok(());
        }
        Err(TreeError::InvalidMissingDistance {
            missing_distance,
            max_distance: max_distance.unwrap_or(0.0),
        })
    }
}

fn validate_triples<K>(triples: &[DistanceTriple<K>]) -> Result<Option<f64>, TreeError> {
    let mut previous: Option<f64> = None;
    for (index, triple) in triples.iter().enumerate() {
        let distance = triple.distance();
        if !distance.is_finite() || distance < 0.0 {
            return Err(TreeError::InvalidDistance { index, distance });
        }
        if let Some(previous) = previous.filter(|&previous| distance < previous) {
            return Err(TreeError::UnsortedInput {
                index,
                distance,
                previous,
            });
        }
        previous = Some(distance);
    }
    Ok(previous)
}

/// Transient state for one construction pass.
struct Sweep<K> {
    dsu: DisjointSet<K>,
    forest: MergeForest<K>,
    cluster_root: HashMap<K, NodeId>,
}

impl<K: EntityId> Sweep<K> {
    fn new() -> Self {
        Self {
            dsu: DisjointSet::new(),
            forest: MergeForest::default(),
            cluster_root: HashMap::new(),
        }
    }

    fn register(&mut self, entity: &K) -> Result<(), TreeError> {
        if self.dsu.contains(entity) {
            return Ok(());
        }
        self.dsu.add(entity.clone())?;
        let leaf = self.forest.push_leaf(entity.clone());
        self.cluster_root.insert(entity.clone(), leaf);
        Ok(())
    }

    fn merge(&mut self, triple: &DistanceTriple<K>) -> Result<(), TreeError> {
        self.register(triple.source())?;
        self.register(triple.target())?;

        let left = self.dsu.find(triple.source())?;
        let right = self.dsu.find(triple.target())?;
        if left == right {
            return Ok(());
        }

        let left_node = self.take_root(&left)?;
        let right_node = self.take_root(&right)?;
        let merged = self.dsu.union(&left, &right)?;
        let parent = self
            .forest
            .push_merge(triple.distance(), vec![left_node, right_node]);
        self.cluster_root.insert(merged, parent);
        Ok(())
    }

    fn take_root(&mut self, representative: &K) -> Result<NodeId, TreeError> {
        self.cluster_root
            .remove(representative)
            .ok_or(TreeError::InvariantViolation {
                invariant: "every cluster representative must own a tree root",
            })
    }

    fn finish(self, missing_distance: Option<f64>) -> (MergeForest<K>, bool) {
        let Self {
            mut forest,
            cluster_root,
            ..
        } = self;
        let mut roots: Vec<NodeId> = cluster_root.into_values().collect();
        roots.sort_unstable();

        let synthetic_root = match missing_distance {
            Some(missing) if roots.len() > 1 => {
                let top = forest.push_merge(missing, roots);
                roots = vec![top];
                true
            }
            _ => false,
        };
        forest.set_roots(roots);
        (forest, synthetic_root)
    }
}
