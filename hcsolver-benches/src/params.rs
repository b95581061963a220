//! Benchmark parameter types.

use std::fmt;

use hcsolver_core::Linkage;

/// Parameters for a clustering benchmark run.
#[derive(Clone, Debug)]
pub struct ClusteringBenchParams {
    /// Number of points in the dataset.
    pub point_count: usize,
    /// Linkage rule under test.
    pub linkage: Linkage,
    /// Cluster count at which merging stops.
    pub depth: usize,
}

impl fmt::Display for ClusteringBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={},linkage={},depth={}",
            self.point_count, self.linkage, self.depth
        )
    }
}

/// Parameters for a distance matrix benchmark run.
#[derive(Clone, Debug)]
pub struct MatrixBenchParams {
    /// Number of points in the dataset.
    pub point_count: usize,
}

impl fmt::Display for MatrixBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}", self.point_count)
    }
}
