//! Newick rendering for merge trees.

use std::fmt::{self, Display, Write as _};

use crate::hierarchy::{MergeForest, NodeId, NodeLabel};

/// Characters that force a label into single quotes.
const RESERVED: &[char] = &['(', ')', '[', ']', ':', ';', ',', '\''];

enum Step {
    Enter(NodeId),
    Separator,
    Close(NodeId),
}

/// Renders the tree under `root` as one `;`-terminated Newick string.
///
/// Leaves print their entity, merge nodes print their height, and every node
/// with an edge length prints it after a colon. Returns `None` when `root` is
/// not part of `forest`.
///
/// # Examples
/// ```
/// use tncluster_core::{DistanceTriple, MergeTreeBuilder, write_newick};
///
/// let triples = vec![
///     DistanceTriple::new(1.0, "A", "B"),
///     DistanceTriple::new(2.5, "B", "C"),
/// ];
/// let forest = MergeTreeBuilder::new().build(&triples)?;
/// let newick = write_newick(&forest, forest.roots()[0]);
/// assert_eq!(newick.as_deref(), Some("((A:1,B:1)1:1.5,C:2.5)2.5;"));
/// # Ok::<(), tncluster_core::TreeError>(())
/// ```
#[must_use]
pub fn write_newick<K: Display>(forest: &MergeForest<K>, root: NodeId) -> Option<String> {
    forest.node(root)?;
    let mut out = String::new();
    render(forest, root, &mut out).ok()?;
    Some(out)
}

fn render<K: Display>(forest: &MergeForest<K>, root: NodeId, out: &mut String) -> fmt::Result {
    let mut steps = vec![Step::Enter(root)];
    while let Some(step) = steps.pop() {
        match step {
            Step::Separator => out.push(','),
            Step::Enter(id) => {
                let Some(node) = forest.node(id) else {
                    continue;
                };
                if node.is_leaf() {
                    write_node(out, forest, id)?;
                    continue;
                }
                out.push('(');
                steps.push(Step::Close(id));
                for (position, &child) in node.children().iter().enumerate().rev() {
                    steps.push(Step::Enter(child));
                    if position > 0 {
                        steps.push(Step::Separator);
                    }
                }
            }
            Step::Close(id) => {
                out.push(')');
                write_node(out, forest, id)?;
            }
        }
    }
    out.push(';');
    Ok(())
}

impl<K: Display> MergeForest<K> {
    /// Renders every tree as Newick, one string per root in root order.
    #[must_use]
    pub fn to_newick_lines(&self) -> Vec<String> {
        self.roots()
            .iter()
            .filter_map(|&root| write_newick(self, root))
            .collect()
    }
}

fn write_node<K: Display>(out: &mut String, forest: &MergeForest<K>, id: NodeId) -> fmt::Result {
    let Some(node) = forest.node(id) else {
        return Ok(());
    };
    match node.label() {
        NodeLabel::Entity(entity) => push_label(out, &entity.to_string()),
        NodeLabel::Merge(height) => write!(out, "{height}")?,
    }
    if let Some(edge) = node.edge_length() {
        write!(out, ":{edge}")?;
    }
    Ok(())
}

fn push_label(out: &mut String, label: &str) {
    let needs_quotes = label.is_empty()
        || label
            .chars()
            .any(|c| c.is_whitespace() || RESERVED.contains(&c));
    if needs_quotes {
        out.push('\'');
        out.push_str(&label.replace('\'', "''"));
        out.push('\'');
    } else {
        out.push_str(label);
    }
}
