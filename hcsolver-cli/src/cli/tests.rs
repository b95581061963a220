//! Unit tests for argument parsing, execution, and rendering.

use super::commands::{derive_data_source_name, effective_depth};
use super::test_helpers::{cli_for, create_points_file, run_cli_expecting_error, temp_dir};
use super::{Cli, CliError, ExecutionSummary, LinkageArg, MetricArg, render_summary, run_cli};

use std::path::Path;

use clap::Parser;
use hcsolver_providers_text::PointFileError;
use rstest::rstest;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

use hcsolver_test_support::tracing::RecordingLayer;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const TRIANGLE: &str = "A 0 0\nB 1 0\nC 5 5\n";
const TWO_PAIRS: &str = "# two tight pairs\nA 0 0\nB 0 1\nC 10 10\nD 10 11\n";

fn render(summary: &ExecutionSummary) -> Result<String, Box<dyn std::error::Error>> {
    let mut buffer = Vec::new();
    render_summary(summary, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[rstest]
#[case::stem_with_extension("/tmp/points.txt", "points")]
#[case::stem_without_extension("/tmp/blobs", "blobs")]
#[case::missing_stem("", "points")]
fn derive_data_source_name_uses_file_stem(#[case] raw_path: &str, #[case] expected: &str) {
    assert_eq!(derive_data_source_name(Path::new(raw_path)), expected);
}

#[rstest]
#[case(-5, 0)]
#[case(0, 0)]
#[case(3, 3)]
fn effective_depth_clamps_negatives(#[case] raw: i64, #[case] expected: usize) {
    assert_eq!(effective_depth(raw), expected);
}

#[rstest]
fn clap_defaults() -> TestResult {
    let cli = Cli::try_parse_from(["hcsolver", "points.txt"])?;
    assert!(!cli.verbose);
    assert_eq!(cli.depth, 0);
    assert_eq!(cli.linkage, LinkageArg::Single);
    assert_eq!(cli.metric, MetricArg::SquaredEuclidean);
    assert_eq!(cli.input, Path::new("points.txt"));
    Ok(())
}

#[rstest]
fn clap_accepts_all_options() -> TestResult {
    let cli = Cli::try_parse_from([
        "hcsolver",
        "-v",
        "--depth",
        "-2",
        "--linkage",
        "complete",
        "--metric",
        "manhattan",
        "points.txt",
    ])?;
    assert!(cli.verbose);
    assert_eq!(cli.depth, -2);
    assert_eq!(cli.linkage, LinkageArg::Complete);
    assert_eq!(cli.metric, MetricArg::Manhattan);
    Ok(())
}

#[rstest]
#[case::unknown_linkage(&["hcsolver", "--linkage", "average", "p.txt"])]
#[case::unknown_metric(&["hcsolver", "--metric", "cosine", "p.txt"])]
#[case::missing_input(&["hcsolver", "--depth", "2"])]
#[case::non_numeric_depth(&["hcsolver", "--depth", "two", "p.txt"])]
fn clap_rejects_invalid_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
#[case::depth_one(1, "clusters: 1\n{{A,B},C}\tA,B,C\n")]
#[case::depth_two(2, "clusters: 2\n{A,B}\tA,B\n{C}\tC\n")]
#[case::negative_depth(-1, "clusters: 1\n{{A,B},C}\tA,B,C\n")]
fn run_triangle_single_linkage(
    #[from(temp_dir)] dir: TempDir,
    #[case] depth: i64,
    #[case] expected: &str,
) -> TestResult {
    let path = create_points_file(&dir, "triangle.txt", TRIANGLE)?;
    let summary = run_cli(cli_for(
        &path,
        LinkageArg::Single,
        MetricArg::SquaredEuclidean,
        depth,
    ))?;
    assert_eq!(summary.data_source, "triangle");
    assert!(summary.trace.is_none());
    assert_eq!(render(&summary)?, expected);
    Ok(())
}

#[rstest]
fn run_two_pairs_complete_manhattan(#[from(temp_dir)] dir: TempDir) -> TestResult {
    let path = create_points_file(&dir, "pairs.txt", TWO_PAIRS)?;
    let summary = run_cli(cli_for(&path, LinkageArg::Complete, MetricArg::Manhattan, 2))?;
    assert_eq!(render(&summary)?, "clusters: 2\n{A,B}\tA,B\n{C,D}\tC,D\n");
    Ok(())
}

#[rstest]
fn verbose_run_renders_each_step(#[from(temp_dir)] dir: TempDir) -> TestResult {
    let path = create_points_file(&dir, "triangle.txt", TRIANGLE)?;
    let mut cli = cli_for(&path, LinkageArg::Single, MetricArg::SquaredEuclidean, 1);
    cli.verbose = true;
    let summary = run_cli(cli)?;
    let expected = "\
step 1: merged A-B at distance 1
  {A,B}
  {C}
step 2: merged B-C at distance 41
  {{A,B},C}
clusters: 1
{{A,B},C}\tA,B,C
";
    assert_eq!(render(&summary)?, expected);
    Ok(())
}

#[rstest]
fn identical_points_merge_at_zero(#[from(temp_dir)] dir: TempDir) -> TestResult {
    let path = create_points_file(&dir, "twins.txt", "A 2 2\nB 2 2\n")?;
    let mut cli = cli_for(&path, LinkageArg::Single, MetricArg::SquaredEuclidean, 0);
    cli.verbose = true;
    let summary = run_cli(cli)?;
    let rendered = render(&summary)?;
    assert!(rendered.starts_with("step 1: merged A-B at distance 0\n"));
    assert!(rendered.ends_with("clusters: 1\n{A,B}\tA,B\n"));
    Ok(())
}

#[rstest]
fn empty_input_renders_no_clusters(#[from(temp_dir)] dir: TempDir) -> TestResult {
    let path = create_points_file(&dir, "empty.txt", "# nothing\n")?;
    let summary = run_cli(cli_for(&path, LinkageArg::Single, MetricArg::Manhattan, 0))?;
    assert_eq!(render(&summary)?, "clusters: 0\n");
    Ok(())
}

#[rstest]
fn missing_input_is_an_io_error(#[from(temp_dir)] dir: TempDir) {
    let cli = cli_for(
        &dir.path().join("missing.txt"),
        LinkageArg::Single,
        MetricArg::SquaredEuclidean,
        0,
    );
    let err = run_cli_expecting_error(cli, "missing file must fail");
    match err {
        CliError::Io { path, .. } => assert!(path.ends_with("missing.txt")),
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
fn malformed_input_reports_line(#[from(temp_dir)] dir: TempDir) -> TestResult {
    let path = create_points_file(&dir, "bad.txt", "A 0 0\nB 1\n")?;
    let err = run_cli_expecting_error(
        cli_for(&path, LinkageArg::Single, MetricArg::SquaredEuclidean, 0),
        "dimension mismatch must fail",
    );
    assert!(matches!(
        err,
        CliError::Input(PointFileError::DimensionMismatch { line: 2, .. })
    ));
    Ok(())
}

#[rstest]
fn undecodable_input_reports_line(#[from(temp_dir)] dir: TempDir) -> TestResult {
    let path = dir.path().join("latin1.txt");
    std::fs::write(&path, b"A 0 0\nB 1 0\nC \xff 5\n")?;
    let err = run_cli_expecting_error(
        cli_for(&path, LinkageArg::Single, MetricArg::SquaredEuclidean, 0),
        "invalid UTF-8 must fail",
    );
    match err {
        CliError::Input(input) => {
            assert!(matches!(input, PointFileError::Io { line: 3, .. }));
            assert_eq!(input.line(), Some(3));
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[rstest]
fn run_cli_emits_tracing_fields(#[from(temp_dir)] dir: TempDir) -> TestResult {
    let path = create_points_file(&dir, "triangle.txt", TRIANGLE)?;
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let cli = cli_for(&path, LinkageArg::Complete, MetricArg::Manhattan, -3);
    let summary = tracing::subscriber::with_default(subscriber, || run_cli(cli))?;
    assert_eq!(summary.depth, 0);

    let run = layer.span_named("cli.run").expect("cli.run span must exist");
    assert_eq!(run.fields.get("depth"), Some(&"0".to_owned()));
    assert_eq!(run.fields.get("linkage"), Some(&"complete".to_owned()));
    assert_eq!(run.fields.get("metric"), Some(&"manhattan".to_owned()));
    assert_eq!(run.fields.get("verbose"), Some(&"false".to_owned()));
    assert!(
        run.fields
            .get("input")
            .is_some_and(|value| value.ends_with("triangle.txt"))
    );
    assert!(layer.span_named("core.run").is_some());

    let completed = layer.events_with_message("command completed");
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].level, Level::INFO);
    assert_eq!(
        completed[0].fields.get("data_source"),
        Some(&"triangle".to_owned())
    );
    Ok(())
}

#[rstest]
fn open_input_reader_records_path_on_error(#[from(temp_dir)] dir: TempDir) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let cli = cli_for(
        &dir.path().join("absent.txt"),
        LinkageArg::Single,
        MetricArg::SquaredEuclidean,
        0,
    );

    let err = tracing::subscriber::with_default(subscriber, || run_cli(cli))
        .expect_err("missing file must fail");
    assert!(matches!(err, CliError::Io { .. }));

    let reader = layer
        .span_named("cli.open_input_reader")
        .expect("reader span must exist");
    assert!(
        reader
            .fields
            .get("path")
            .is_some_and(|value| value.ends_with("absent.txt"))
    );
}
