//! Argument parsing, execution, and rendering for the hcsolver CLI.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use hcsolver_core::{
    ClustererBuilder, ClusteringError, ClusteringOutcome, DistanceMetric, Linkage, Termination,
    TraceEntry, TraceRecorder,
};
use hcsolver_providers_text::{PointFileError, PointFileProvider};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "hcsolver",
    about = "Agglomerative hierarchical clustering of labeled points."
)]
pub struct Cli {
    /// Print every merge and the partition it produced.
    #[arg(short, long)]
    pub verbose: bool,

    /// Stop once this many clusters remain. Values below 1 cluster down to a
    /// single group.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub depth: i64,

    /// Rule for the distance between two clusters.
    #[arg(long, value_enum, default_value_t = LinkageArg::Single)]
    pub linkage: LinkageArg,

    /// Distance between two points.
    #[arg(long, value_enum, default_value_t = MetricArg::SquaredEuclidean)]
    pub metric: MetricArg,

    /// Point file: one `<id> <c1> ... <cn>` record per line.
    pub input: PathBuf,
}

/// Supported linkage rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LinkageArg {
    /// Nearest members decide.
    Single,
    /// Farthest members decide.
    Complete,
}

impl From<LinkageArg> for Linkage {
    fn from(arg: LinkageArg) -> Self {
        match arg {
            LinkageArg::Single => Self::Single,
            LinkageArg::Complete => Self::Complete,
        }
    }
}

/// Supported point metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    /// Sum of squared coordinate differences.
    SquaredEuclidean,
    /// Sum of absolute coordinate differences.
    Manhattan,
}

impl From<MetricArg> for DistanceMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::SquaredEuclidean => Self::SquaredEuclidean,
            MetricArg::Manhattan => Self::Manhattan,
        }
    }
}

/// Errors surfaced while executing the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The input file is malformed.
    #[error(transparent)]
    Input(#[from] PointFileError),
    /// Clustering failed.
    #[error(transparent)]
    Core(#[from] ClusteringError),
}

/// Outcome of a CLI run, ready for rendering.
#[derive(Debug)]
pub struct ExecutionSummary {
    /// Name of the input source.
    pub data_source: String,
    /// Depth actually applied after clamping negatives to zero.
    pub depth: usize,
    /// Final partition and termination reason.
    pub outcome: ClusteringOutcome,
    /// Per-merge trace, present in verbose mode.
    pub trace: Option<Vec<TraceEntry>>,
}

/// Loads the input named by `cli` and clusters it.
///
/// # Errors
/// Returns [`CliError`] when the input cannot be read or parsed, or
/// clustering fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use hcsolver_cli::cli::{Cli, LinkageArg, MetricArg, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "A 0 0\nB 1 0\nC 5 5\n")?;
/// let cli = Cli {
///     verbose: false,
///     depth: 2,
///     linkage: LinkageArg::Single,
///     metric: MetricArg::SquaredEuclidean,
///     input: file.path().to_path_buf(),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.outcome.cluster_count(), 2);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(
        input = field::Empty,
        depth = field::Empty,
        linkage = field::Empty,
        metric = field::Empty,
        verbose = cli.verbose,
    ),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let depth = effective_depth(cli.depth);
    let linkage = Linkage::from(cli.linkage);
    let metric = DistanceMetric::from(cli.metric);

    let span = Span::current();
    span.record("input", field::display(cli.input.display()));
    span.record("depth", depth);
    span.record("linkage", field::display(linkage));
    span.record("metric", field::display(metric));

    let clusterer = ClustererBuilder::new()
        .with_linkage(linkage)
        .with_metric(metric)
        .with_depth(depth)
        .build()?;

    let reader = open_input_reader(&cli.input)?;
    let provider =
        PointFileProvider::try_from_reader(derive_data_source_name(&cli.input), reader)?;

    let (outcome, trace) = if cli.verbose {
        let mut recorder = TraceRecorder::new();
        let outcome = clusterer.run_with_observer(provider.points(), &mut recorder)?;
        (outcome, Some(recorder.into_entries()))
    } else {
        (clusterer.run(provider.points())?, None)
    };

    info!(
        data_source = provider.name(),
        clusters = outcome.cluster_count(),
        merges = outcome.merges(),
        "command completed"
    );
    Ok(ExecutionSummary {
        data_source: provider.name().to_owned(),
        depth,
        outcome,
        trace,
    })
}

/// Negative depths behave like `0`.
pub(super) fn effective_depth(depth: i64) -> usize {
    usize::try_from(depth.max(0)).unwrap_or(usize::MAX)
}

#[instrument(name = "cli.open_input_reader", err, fields(path = field::Empty))]
pub(super) fn open_input_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    Span::current().record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

pub(super) fn derive_data_source_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|value| value.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "points".to_owned())
}

/// Renders `summary` to `writer`.
///
/// Verbose runs list each merge with the partition it produced. Every run
/// then lists the final clusters as `<name>\t<members>`.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    for entry in summary.trace.iter().flatten() {
        let step = &entry.step;
        writeln!(
            writer,
            "step {}: merged {}-{} at distance {}",
            step.step(),
            step.left_point(),
            step.right_point(),
            step.distance()
        )?;
        for cluster in &entry.partition {
            writeln!(writer, "  {}", cluster.name)?;
        }
    }

    if summary.outcome.termination() == Termination::CandidatesExhausted {
        writeln!(
            writer,
            "note: candidates exhausted before reaching depth {}",
            summary.depth
        )?;
    }

    writeln!(writer, "clusters: {}", summary.outcome.cluster_count())?;
    for cluster in summary.outcome.partition() {
        let members: Vec<&str> = cluster.members.iter().map(AsRef::as_ref).collect();
        writeln!(writer, "{}\t{}", cluster.name, members.join(","))?;
    }
    Ok(())
}
