//! Fixtures for the CLI unit tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rstest::fixture;
use tempfile::TempDir;

use super::{Cli, CliError, LinkageArg, MetricArg, run_cli};

/// Fresh scratch directory, removed when dropped.
#[fixture]
pub(super) fn temp_dir() -> TempDir {
    tempfile::tempdir().unwrap_or_else(|err| panic!("scratch directory unavailable: {err}"))
}

/// Writes `contents` to `dir/name` and returns the full path.
pub(super) fn create_points_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// Non-verbose invocation over `input`.
pub(super) fn cli_for(input: &Path, linkage: LinkageArg, metric: MetricArg, depth: i64) -> Cli {
    Cli {
        verbose: false,
        depth,
        linkage,
        metric,
        input: input.to_owned(),
    }
}

pub(super) fn run_cli_expecting_error(cli: Cli, reason: &str) -> CliError {
    run_cli(cli).err().unwrap_or_else(|| panic!("{reason}"))
}
