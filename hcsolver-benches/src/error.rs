//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use crate::source::SyntheticError;
use hcsolver_core::ClusteringError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic data generation failed.
    #[error("synthetic point generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Building the clusterer or running it failed.
    #[error("clustering failed: {0}")]
    Clustering(#[from] ClusteringError),
}
