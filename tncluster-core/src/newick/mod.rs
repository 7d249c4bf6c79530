//! Newick serialisation of merge forests.
//!
//! Writing renders leaves by entity and merge nodes by height, with edge
//! lengths on every non-root node. Reading accepts any Newick tree and
//! derives heights from edge lengths, so externally built trees can be fed
//! to threshold extraction.

mod parser;
mod writer;

pub use self::{parser::parse_newick, writer::write_newick};

#[cfg(test)]
mod tests;
