//! Merge-tree construction from pairwise distances.
//!
//! This module covers the first half of the clustering pipeline:
//!
//! - Tracking which entities are already connected with a keyed
//!   [`DisjointSet`].
//! - Sweeping sorted distance triples to build a single-linkage merge
//!   hierarchy (one tree per connected component).
//! - Optionally rooting disconnected components under a synthetic node at a
//!   caller-supplied "missing" distance.
//!
//! The resulting [`MergeForest`] is consumed by threshold extraction.

mod builder;
mod disjoint_set;
mod forest;

use std::{fmt, hash::Hash};

pub use self::{
    builder::MergeTreeBuilder,
    disjoint_set::DisjointSet,
    forest::{MergeForest, MergeNode, NodeId, NodeLabel},
};

/// Bounds required of entity identifiers.
///
/// Identifiers are hashed for lookup, ordered so tie-breaks are
/// deterministic, and rendered when reported in errors or output.
pub trait EntityId: Clone + Eq + Hash + Ord + fmt::Display {}

impl<T> EntityId for T where T: Clone + Eq + Hash + Ord + fmt::Display {}
