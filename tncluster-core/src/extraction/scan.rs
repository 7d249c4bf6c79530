//! Height-ordered search for the threshold with the most non-singleton
//! clusters.
//!
//! Cutting at height `t` keeps every maximal merge node at or below `t` as a
//! cluster. Replaying merges in ascending height, a node whose children are
//! all leaves creates one new non-singleton cluster, and every internal child
//! it absorbs removes one. The running total after a height group is
//! therefore the exact cluster count for a cut at that height.

use std::collections::HashSet;

use crate::{
    error::ExtractionError,
    hierarchy::{MergeForest, NodeId},
};

/// One merge event: its height and its effect on the cluster count.
#[derive(Clone, Copy, Debug, PartialEq)]
struct MergeStep {
    height: f64,
    delta: isize,
}

/// Merge events of a validated forest, sorted by ascending height.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct ThresholdScan {
    steps: Vec<MergeStep>,
}

impl ThresholdScan {
    /// Validates the shape of `forest` and collects its merge events.
    pub(super) fn from_forest<K>(forest: &MergeForest<K>) -> Result<Self, ExtractionError> {
        let roots: HashSet<NodeId> = forest.roots().iter().copied().collect();
        let mut steps = Vec::new();
        let mut stack: Vec<NodeId> = forest.roots().to_vec();

        while let Some(id) = stack.pop() {
            let Some(node) = forest.node(id) else {
                continue;
            };
            if node.is_leaf() {
                continue;
            }
            let children = node.children();
            let bifurcating = if roots.contains(&id) {
                children.len() >= 2
            } else {
                children.len() == 2
            };
            if !bifurcating {
                return Err(ExtractionError::StructuralInvariantViolation {
                    node: id.index(),
                    children: children.len(),
                });
            }

            let internal_children = children
                .iter()
                .filter(|&&child| forest.node(child).is_some_and(|child| !child.is_leaf()))
                .count();
            steps.push(MergeStep {
                height: node.height(),
                delta: 1 - internal_children.cast_signed(),
            });
            stack.extend(children.iter().copied());
        }

        steps.sort_by(|left, right| left.height.total_cmp(&right.height));
        Ok(Self { steps })
    }

    /// Returns the lowest height at which the non-singleton cluster count
    /// peaks, or `None` when there are no merges.
    pub(super) fn best_threshold(&self) -> Option<f64> {
        let mut best: Option<(f64, isize)> = None;
        let mut count = 0isize;
        for group in self.steps.chunk_by(|left, right| left.height == right.height) {
            count += group.iter().map(|step| step.delta).sum::<isize>();
            let height = group.first().map_or(0.0, |step| step.height);
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((height, count));
            }
        }
        best.map(|(height, _)| height)
    }
}
