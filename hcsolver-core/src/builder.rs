//! Builder utilities for configuring clustering runs.
//!
//! Exposes the configuration surface and the validation performed before a
//! [`Clusterer`] is constructed.

use crate::{
    Result, clusterer::Clusterer, distance::DistanceMetric, error::ClusteringError,
    linkage::Linkage,
};

/// Configures and constructs [`Clusterer`] instances.
///
/// The metric defaults to squared Euclidean and the depth to `0` (cluster
/// down to a single group). The linkage rule has no default and must be set.
///
/// # Examples
/// ```
/// use hcsolver_core::{ClustererBuilder, DistanceMetric, Linkage};
///
/// let clusterer = ClustererBuilder::new()
///     .with_linkage(Linkage::Complete)
///     .with_metric(DistanceMetric::Manhattan)
///     .with_depth(2)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(clusterer.linkage(), Linkage::Complete);
/// assert_eq!(clusterer.target_clusters(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClustererBuilder {
    linkage: Option<Linkage>,
    metric: DistanceMetric,
    depth: usize,
}

impl ClustererBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the linkage rule.
    #[must_use]
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = Some(linkage);
        self
    }

    /// Returns the configured linkage rule, if any.
    #[must_use]
    pub fn linkage(&self) -> Option<Linkage> {
        self.linkage
    }

    /// Overrides the distance metric.
    #[must_use]
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Returns the configured distance metric.
    #[must_use]
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Sets the minimum cluster count at which merging stops. `0` and `1`
    /// both cluster down to a single group.
    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Returns the configured depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Validates the configuration and constructs a [`Clusterer`].
    ///
    /// # Errors
    /// Returns [`ClusteringError::MissingLinkage`] when no linkage rule was
    /// set.
    pub fn build(self) -> Result<Clusterer> {
        let linkage = self.linkage.ok_or(ClusteringError::MissingLinkage)?;
        Ok(Clusterer::new(linkage, self.metric, self.depth))
    }
}
