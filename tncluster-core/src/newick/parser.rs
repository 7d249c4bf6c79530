//! Newick reading into a merge forest.
//!
//! Parsing is iterative: nodes are appended to the arena as soon as they are
//! complete, which is post-order, so every child exists before its parent and
//! heights can be derived immediately.

use crate::{
    error::ParseError,
    hierarchy::{MergeForest, NodeId, NodeLabel},
};

/// Characters that end an unquoted label.
const DELIMITERS: &[char] = &['(', ')', '[', ']', ':', ';', ',', '\''];

/// Parses one or more `;`-terminated Newick trees into a forest, one root per
/// tree in input order.
///
/// Leaf labels become entities and sit at height zero. A numeric internal
/// label is taken as the node's merge height, so trees written by
/// [`write_newick`](super::write_newick) read back with their exact heights.
/// Without one, an internal node's height is its first child's height plus
/// that child's edge length (a missing length counts as zero). Bracketed
/// comments are skipped and labels may be single-quoted.
///
/// # Errors
/// Returns [`ParseError::Newick`] with the byte offset of the problem when
/// parentheses are unbalanced, an edge length is not a finite number, a tree
/// lacks its terminating `;`, or the text holds no tree at all.
///
/// # Examples
/// ```
/// use tncluster_core::parse_newick;
///
/// let forest = parse_newick("((A:1,B:1):2,C:3);")?;
/// let root = forest.node(forest.roots()[0]).expect("root exists");
/// assert_eq!(root.height(), 3.0);
/// assert_eq!(forest.leaf_count(), 3);
/// # Ok::<(), tncluster_core::ParseError>(())
/// ```
pub fn parse_newick(text: &str) -> Result<MergeForest<String>, ParseError> {
    let mut parser = Parser {
        text,
        position: 0,
        forest: MergeForest::with_capacity(text.len() / 2),
    };
    let mut roots = Vec::new();

    parser.skip_insignificant()?;
    if parser.peek().is_none() {
        return Err(parser.error("no tree found"));
    }
    while parser.peek().is_some() {
        roots.push(parser.tree()?);
        parser.skip_insignificant()?;
    }
    parser.forest.set_roots(roots);
    Ok(parser.forest)
}

/// Reads an internal label as a merge height when it is a finite,
/// non-negative number.
fn label_height(label: &str) -> Option<f64> {
    label
        .parse::<f64>()
        .ok()
        .filter(|height| height.is_finite() && *height >= 0.0)
}

struct Parser<'a> {
    text: &'a str,
    position: usize,
    forest: MergeForest<String>,
}

impl Parser<'_> {
    /// Parses one tree up to and including its `;`.
    fn tree(&mut self) -> Result<NodeId, ParseError> {
        let mut open: Vec<Vec<NodeId>> = Vec::new();
        loop {
            self.skip_insignificant()?;
            if self.peek() == Some('(') {
                self.bump();
                open.push(Vec::new());
                continue;
            }

            let mut node = self.leaf()?;
            loop {
                self.skip_insignificant()?;
                match (self.peek(), open.last_mut()) {
                    (Some(','), Some(siblings)) => {
                        siblings.push(node);
                        self.bump();
                        break;
                    }
                    (Some(')'), Some(_)) => {
                        self.bump();
                        let mut children = open.pop().unwrap_or_default();
                        children.push(node);
                        node = self.internal(children)?;
                    }
                    (Some(';'), None) => {
                        self.bump();
                        return Ok(node);
                    }
                    (None, _) => return Err(self.error("unexpected end of input")),
                    (Some(';'), Some(_)) => return Err(self.error("unbalanced parentheses")),
                    (Some(')'), None) => return Err(self.error("unbalanced parentheses")),
                    (Some(','), None) => return Err(self.error("sibling outside parentheses")),
                    (Some(_), _) => return Err(self.error("unexpected character")),
                }
            }
        }
    }

    fn leaf(&mut self) -> Result<NodeId, ParseError> {
        let label = self.label()?;
        let edge_length = self.edge_length()?;
        Ok(self
            .forest
            .push_parsed(NodeLabel::Entity(label), 0.0, edge_length, Vec::new()))
    }

    fn internal(&mut self, children: Vec<NodeId>) -> Result<NodeId, ParseError> {
        let label = self.label()?;
        let edge_length = self.edge_length()?;
        let height = match label_height(&label) {
            Some(height) => height,
            None => children
                .first()
                .and_then(|&first| self.forest.node(first))
                .map_or(0.0, |first| {
                    first.height() + first.edge_length().unwrap_or(0.0)
                }),
        };
        Ok(self.forest.push_parsed(
            NodeLabel::Merge(height),
            height,
            edge_length,
            children,
        ))
    }

    fn label(&mut self) -> Result<String, ParseError> {
        self.skip_insignificant()?;
        if self.peek() == Some('\'') {
            return self.quoted_label();
        }
        let start = self.position;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || DELIMITERS.contains(&c) {
                break;
            }
            self.bump();
        }
        Ok(self.text[start..self.position].to_owned())
    }

    fn quoted_label(&mut self) -> Result<String, ParseError> {
        let opening = self.position;
        self.bump();
        let mut label = String::new();
        loop {
            match self.peek() {
                None => {
                    self.position = opening;
                    return Err(self.error("unterminated quoted label"));
                }
                Some('\'') => {
                    self.bump();
                    if self.peek() != Some('\'') {
                        return Ok(label);
                    }
                    label.push('\'');
                    self.bump();
                }
                Some(c) => {
                    label.push(c);
                    self.bump();
                }
            }
        }
    }

    fn edge_length(&mut self) -> Result<Option<f64>, ParseError> {
        self.skip_insignificant()?;
        if self.peek() != Some(':') {
            return Ok(None);
        }
        self.bump();
        self.skip_insignificant()?;
        let start = self.position;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        {
            self.bump();
        }
        let raw = &self.text[start..self.position];
        match raw.parse::<f64>() {
            Ok(length) if length.is_finite() => Ok(Some(length)),
            _ => {
                self.position = start;
                Err(self.error("invalid edge length"))
            }
        }
    }

    /// Skips whitespace and `[...]` comments.
    fn skip_insignificant(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => self.bump(),
                Some('[') => {
                    let opening = self.position;
                    match self.text[opening..].find(']') {
                        Some(offset) => self.position = opening + offset + 1,
                        None => return Err(self.error("unterminated comment")),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.position..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.position += c.len_utf8();
        }
    }

    fn error(&self, reason: &'static str) -> ParseError {
        ParseError::Newick {
            position: self.position,
            reason,
        }
    }
}
