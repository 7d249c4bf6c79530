//! Command-line interface for building merge trees and extracting clusters.
//!
//! Three commands are offered: `tree` turns a TN93 distance list into Newick
//! merge trees, `cluster` cuts existing Newick trees at the threshold with the
//! most non-singleton clusters, and `run` chains the two.

mod commands;
mod streams;

pub use commands::{
    Cli, CliError, ClusterCommand, ClusteringArgs, Command, ExecutionSummary, IoArgs, ModeArg,
    Report, RunCommand, TreeCommand, render_summary, run_cli, write_summary,
};

#[cfg(test)]
mod test_helpers;
