//! Command implementations and argument parsing for the tncluster CLI.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tncluster_core::{
    ClusteringMode, ClusteringResult, ExtractionError, MergeForest, MergeTreeBuilder, ParseError,
    ThresholdClusterer, TreeError, parse_newick, parse_tn93,
};
use tracing::{Span, field, info, instrument};

use super::streams::{describe, open_input, read_input, write_output};

const STANDARD_STREAM: &str = "-";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "tncluster",
    about = "Cluster entities from pairwise distances without a fixed cutoff."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Returns `true` when the selected command asked for verbose output.
    #[must_use]
    pub const fn verbose(&self) -> bool {
        match &self.command {
            Command::Tree(_) => false,
            Command::Cluster(ClusterCommand { clustering, .. })
            | Command::Run(RunCommand { clustering, .. }) => clustering.verbose,
        }
    }
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build single-linkage merge trees from a TN93 distance list.
    Tree(TreeCommand),
    /// Cluster the leaves of Newick trees at the optimal threshold.
    Cluster(ClusterCommand),
    /// Build merge trees from a TN93 distance list and cluster them.
    Run(RunCommand),
}

/// Input and output locations shared by every command.
#[derive(Debug, Args, Clone)]
pub struct IoArgs {
    /// Input file; `-` reads stdin and a `.gz` suffix enables gzip.
    #[arg(short, long, default_value = STANDARD_STREAM)]
    pub input: PathBuf,

    /// Output file; `-` writes stdout and a `.gz` suffix enables gzip.
    #[arg(short, long, default_value = STANDARD_STREAM)]
    pub output: PathBuf,
}

/// Options accepted by the `tree` command.
#[derive(Debug, Args, Clone)]
pub struct TreeCommand {
    /// Input and output locations.
    #[command(flatten)]
    pub io: IoArgs,

    /// Root disconnected components under one node at this distance.
    #[arg(long)]
    pub missing: Option<f64>,
}

/// Options accepted by the `cluster` command.
#[derive(Debug, Args, Clone)]
pub struct ClusterCommand {
    /// Input and output locations.
    #[command(flatten)]
    pub io: IoArgs,

    /// Threshold selection options.
    #[command(flatten)]
    pub clustering: ClusteringArgs,
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Input and output locations.
    #[command(flatten)]
    pub io: IoArgs,

    /// Root disconnected components under one node at this distance.
    #[arg(long)]
    pub missing: Option<f64>,

    /// Threshold selection options.
    #[command(flatten)]
    pub clustering: ClusteringArgs,
}

/// Threshold selection options.
#[derive(Debug, Args, Clone, Copy)]
pub struct ClusteringArgs {
    /// Threshold selection strategy.
    #[arg(short, long, value_enum, default_value_t = ModeArg::MaxNonSingleton)]
    pub mode: ModeArg,

    /// Log the chosen threshold and cluster count at `info` level.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ClusteringArgs {
    fn clusterer(self) -> ThresholdClusterer {
        ThresholdClusterer::new()
            .with_mode(self.mode.into())
            .with_verbose(self.verbose)
    }
}

/// Threshold selection strategies exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Maximise the number of clusters with at least two members.
    MaxNonSingleton,
}

impl From<ModeArg> for ClusteringMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::MaxNonSingleton => Self::MaxNonSingleton,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Opening, reading or writing a stream failed.
    #[error("I/O failed on `{path}`: {source}")]
    Io {
        /// Path that triggered the failure (`-` for standard streams).
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The input could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Tree construction failed.
    #[error(transparent)]
    Tree(#[from] TreeError),
    /// Cluster extraction failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

impl CliError {
    /// Returns the stable code of the underlying library error, if any.
    #[must_use]
    pub const fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Io { .. } => None,
            Self::Parse(error) => Some(error.code().as_str()),
            Self::Tree(error) => Some(error.code().as_str()),
            Self::Extraction(error) => Some(error.code().as_str()),
        }
    }
}

/// Payload produced by a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// Newick trees, one per connected component or synthetic root.
    Trees(Vec<String>),
    /// Cluster assignments for every leaf.
    Clusters(ClusteringResult<String>),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    /// Where the payload should be written (`-` for stdout).
    pub output: PathBuf,
    /// The payload itself.
    pub report: Report,
}

/// Executes the CLI command represented by `cli`.
///
/// Input is read and processed in full; nothing is written until
/// [`write_summary`] or [`render_summary`] is called.
///
/// # Errors
/// Returns [`CliError`] when reading, parsing, tree building or extraction
/// fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use tncluster_cli::cli::{Cli, Command, IoArgs, Report, TreeCommand, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "A,B,0.5\nC,D,0.5\n")?;
/// let cli = Cli {
///     command: Command::Tree(TreeCommand {
///         io: IoArgs {
///             input: file.path().to_path_buf(),
///             output: "-".into(),
///         },
///         missing: Some(1.0),
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(
///     summary.report,
///     Report::Trees(vec!["((A:0.5,B:0.5)0.5:0.5,(C:0.5,D:0.5)0.5:0.5)1;".to_owned()])
/// );
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Tree(command) => {
            span.record("command", "tree");
            tree_command(command)
        }
        Command::Cluster(command) => {
            span.record("command", "cluster");
            cluster_command(command)
        }
        Command::Run(command) => {
            span.record("command", "run");
            run_command(command)
        }
    }
}

#[instrument(
    name = "cli.tree",
    err,
    skip(command),
    fields(input = field::Empty, missing = ?command.missing, trees = field::Empty),
)]
pub(super) fn tree_command(command: TreeCommand) -> Result<ExecutionSummary, CliError> {
    let TreeCommand { io, missing } = command;
    let forest = build_forest(&io.input, missing)?;
    let trees = forest.to_newick_lines();

    let span = Span::current();
    span.record("input", field::display(describe(&io.input, "stdin")));
    span.record("trees", trees.len());
    Ok(ExecutionSummary {
        output: io.output,
        report: Report::Trees(trees),
    })
}

#[instrument(
    name = "cli.cluster",
    err,
    skip(command),
    fields(input = field::Empty, mode = ?command.clustering.mode),
)]
pub(super) fn cluster_command(command: ClusterCommand) -> Result<ExecutionSummary, CliError> {
    let ClusterCommand { io, clustering } = command;
    log_inputs(&io, clustering);
    Span::current().record("input", field::display(describe(&io.input, "stdin")));

    let forest = parse_newick(&read_input(&io.input)?)?;
    let result = clustering.clusterer().extract(&forest)?;
    Ok(ExecutionSummary {
        output: io.output,
        report: Report::Clusters(result),
    })
}

#[instrument(
    name = "cli.pipeline",
    err,
    skip(command),
    fields(input = field::Empty, missing = ?command.missing, mode = ?command.clustering.mode),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let RunCommand {
        io,
        missing,
        clustering,
    } = command;
    log_inputs(&io, clustering);
    Span::current().record("input", field::display(describe(&io.input, "stdin")));

    let forest = build_forest(&io.input, missing)?;
    let result = clustering.clusterer().extract(&forest)?;
    Ok(ExecutionSummary {
        output: io.output,
        report: Report::Clusters(result),
    })
}

fn build_forest(input: &Path, missing: Option<f64>) -> Result<MergeForest<String>, CliError> {
    let list = parse_tn93(open_input(input)?)?;
    let builder = match missing {
        Some(distance) => MergeTreeBuilder::new().with_missing_distance(distance),
        None => MergeTreeBuilder::new(),
    };
    Ok(builder.build_list(&list)?)
}

fn log_inputs(io: &IoArgs, clustering: ClusteringArgs) {
    if clustering.verbose {
        info!(
            input = %describe(&io.input, "stdin"),
            output = %describe(&io.output, "stdout"),
            mode = ClusteringMode::from(clustering.mode).as_str(),
            "clustering inputs"
        );
    }
}

/// Writes `summary` to its configured output, compressing `.gz` paths.
///
/// # Errors
/// Returns [`CliError::Io`] when the output cannot be created or written.
pub fn write_summary(summary: &ExecutionSummary) -> Result<(), CliError> {
    write_output(&summary.output, |writer| render_summary(summary, writer))
}

/// Renders the payload of `summary` to `writer`.
///
/// Trees are written one Newick string per line. Clusters are written as a
/// tab-separated table with a `SequenceName\tClusterNumber` header, where
/// singletons carry `-1`.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use tncluster_cli::cli::{ExecutionSummary, Report, render_summary};
/// # use tncluster_core::ClusteringResult;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     output: "-".into(),
///     report: Report::Clusters(ClusteringResult::new(
///         Some(0.5),
///         vec![vec!["A".to_owned(), "B".to_owned()], vec!["C".to_owned()]],
///     )),
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "SequenceName\tClusterNumber\nA\t1\nB\t1\nC\t-1\n"
/// );
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match &summary.report {
        Report::Trees(trees) => {
            for tree in trees {
                writeln!(writer, "{tree}")?;
            }
        }
        Report::Clusters(result) => {
            writeln!(writer, "SequenceName\tClusterNumber")?;
            for (entity, assignment) in result.assignments() {
                writeln!(writer, "{entity}\t{assignment}")?;
            }
        }
    }
    Ok(())
}
