//! Arena storage for merge trees.
//!
//! Nodes live in a single vector and refer to their children by [`NodeId`],
//! so a forest owns every node exactly once and never needs back pointers.
//! Traversals use explicit worklists to stay safe on the deep, caterpillar
//! shaped trees single linkage tends to produce.

use std::fmt;

/// Index of a node within a [`MergeForest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena index of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Label carried by a merge-tree node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeLabel<K> {
    /// A leaf standing for one entity.
    Entity(K),
    /// An internal node recording the distance at which its children merged.
    Merge(f64),
}

/// One node of a merge tree.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeNode<K> {
    label: NodeLabel<K>,
    height: f64,
    edge_length: Option<f64>,
    children: Vec<NodeId>,
}

impl<K> MergeNode<K> {
    /// Returns `true` when the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the node's label: an entity for leaves, a merge distance for
    /// internal nodes.
    #[must_use]
    pub const fn label(&self) -> &NodeLabel<K> {
        &self.label
    }

    /// Returns the entity for leaf nodes.
    #[must_use]
    pub const fn entity(&self) -> Option<&K> {
        match &self.label {
            NodeLabel::Entity(entity) => Some(entity),
            NodeLabel::Merge(_) => None,
        }
    }

    /// Returns the node's height above the leaves (zero for leaves).
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Returns the length of the edge to the parent, if the node has one.
    #[must_use]
    pub const fn edge_length(&self) -> Option<f64> {
        self.edge_length
    }

    /// Returns the node's children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A forest of merge trees sharing one node arena.
///
/// # Examples
/// ```
/// use tncluster_core::{DistanceTriple, MergeTreeBuilder};
///
/// let triples = vec![
///     DistanceTriple::new(1.0, "A", "B"),
///     DistanceTriple::new(2.0, "B", "C"),
/// ];
/// let forest = MergeTreeBuilder::new().build(&triples)?;
/// assert_eq!(forest.roots().len(), 1);
/// assert_eq!(forest.leaf_count(), 3);
/// let root = forest.roots()[0];
/// let mut leaves: Vec<_> = forest.leaves(root).into_iter().copied().collect();
/// leaves.sort_unstable();
/// assert_eq!(leaves, ["A", "B", "C"]);
/// # Ok::<(), tncluster_core::TreeError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MergeForest<K> {
    nodes: Vec<MergeNode<K>>,
    roots: Vec<NodeId>,
}

impl<K> Default for MergeForest<K> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }
}

impl<K> MergeForest<K> {
    pub(crate) fn with_capacity(nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            roots: Vec::new(),
        }
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when the forest holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the tree roots in a deterministic order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&MergeNode<K>> {
        self.nodes.get(id.0)
    }

    /// Iterates over every node with its id, in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &MergeNode<K>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Counts the leaves in the whole forest.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Returns the entities below `root`, left to right.
    ///
    /// Unknown ids yield an empty list.
    #[must_use]
    pub fn leaves(&self, root: NodeId) -> Vec<&K> {
        let mut leaves = Vec::new();
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            if let Some(entity) = node.entity() {
                leaves.push(entity);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        leaves
    }

    pub(crate) fn push_leaf(&mut self, entity: K) -> NodeId {
        self.push(MergeNode {
            label: NodeLabel::Entity(entity),
            height: 0.0,
            edge_length: None,
            children: Vec::new(),
        })
    }

    /// Adds an internal node above `children`, setting each child's edge to
    /// the height gap between them.
    pub(crate) fn push_merge(&mut self, height: f64, children: Vec<NodeId>) -> NodeId {
        for child in &children {
            if let Some(node) = self.nodes.get_mut(child.0) {
                node.edge_length = Some(height - node.height);
            }
        }
        self.push(MergeNode {
            label: NodeLabel::Merge(height),
            height,
            edge_length: None,
            children,
        })
    }

    /// Adds a node whose height and edge length come from an external source
    /// (such as parsed Newick text) rather than from a merge.
    pub(crate) fn push_parsed(
        &mut self,
        label: NodeLabel<K>,
        height: f64,
        edge_length: Option<f64>,
        children: Vec<NodeId>,
    ) -> NodeId {
        self.push(MergeNode {
            label,
            height,
            edge_length,
            children,
        })
    }

    pub(crate) fn set_roots(&mut self, roots: Vec<NodeId>) {
        self.roots = roots;
    }

    fn push(&mut self, node: MergeNode<K>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }
}
