//! Command-line interface for clustering a point file.
//!
//! Loads labeled points, runs the agglomerative engine with the requested
//! linkage, metric, and depth, and renders the final partition.

mod commands;

pub use commands::{
    Cli, CliError, ExecutionSummary, LinkageArg, MetricArg, render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;
