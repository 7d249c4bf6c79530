//! Breadth-first cut of a merge forest at a fixed threshold.

use std::collections::VecDeque;

use crate::hierarchy::{MergeForest, NodeId};

/// Cuts every tree in `forest` at `threshold`, root by root.
///
/// A merge node at or below the threshold contributes all of its leaves as
/// one cluster; taller merges are split into their children. Leaves reached
/// directly become single-member clusters. Without a threshold every merge
/// is split.
pub(super) fn cut_forest<K: Clone>(forest: &MergeForest<K>, threshold: Option<f64>) -> Vec<Vec<K>> {
    let mut clusters = Vec::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();

    for &root in forest.roots() {
        queue.push_back(root);
        while let Some(id) = queue.pop_front() {
            let Some(node) = forest.node(id) else {
                continue;
            };
            if let Some(entity) = node.entity() {
                clusters.push(vec![entity.clone()]);
            } else if threshold.is_none_or(|threshold| node.height() > threshold) {
                queue.extend(node.children().iter().copied());
            } else {
                clusters.push(forest.leaves(id).into_iter().cloned().collect());
            }
        }
    }
    clusters
}
