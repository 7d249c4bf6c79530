//! tncluster core library.
//!
//! Builds single-linkage merge trees from pairwise distances and cuts them at
//! the threshold that yields the most non-singleton clusters.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod extraction;
mod hierarchy;
mod newick;
mod result;
mod tn93;
mod triple;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::{
    error::{
        DisjointSetError, DisjointSetErrorCode, ExtractionError, ExtractionErrorCode, ParseError,
        ParseErrorCode, TreeError, TreeErrorCode,
    },
    extraction::{ClusteringMode, ThresholdClusterer},
    hierarchy::{
        DisjointSet, EntityId, MergeForest, MergeNode, MergeTreeBuilder, NodeId, NodeLabel,
    },
    newick::{parse_newick, write_newick},
    result::{ClusterAssignment, ClusterId, ClusteringResult},
    tn93::parse_tn93,
    triple::{DistanceList, DistanceTriple},
};
