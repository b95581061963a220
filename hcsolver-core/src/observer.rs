//! Step-by-step reporting of merges.
//!
//! Observers receive every successful merge together with the partition that
//! resulted from it. They are a reporting hook only; the engine's result does
//! not depend on them.

use std::sync::Arc;

use crate::{
    distance::Distance,
    result::{ClusterId, ClusterSnapshot},
    state::ClusterState,
};

/// One successful merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeStep {
    step: usize,
    left_point: Arc<str>,
    right_point: Arc<str>,
    distance: Distance,
    merged: ClusterId,
    clusters_remaining: usize,
}

impl MergeStep {
    pub(crate) fn new(
        step: usize,
        left_point: Arc<str>,
        right_point: Arc<str>,
        distance: Distance,
        merged: ClusterId,
        clusters_remaining: usize,
    ) -> Self {
        Self {
            step,
            left_point,
            right_point,
            distance,
            merged,
            clusters_remaining,
        }
    }

    /// One-based merge counter.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Identifier of the first point of the triggering pair.
    #[must_use]
    pub fn left_point(&self) -> &str {
        &self.left_point
    }

    /// Identifier of the second point of the triggering pair.
    #[must_use]
    pub fn right_point(&self) -> &str {
        &self.right_point
    }

    /// Distance of the triggering pair.
    #[must_use]
    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// Handle of the cluster created by the merge.
    #[must_use]
    pub fn merged(&self) -> ClusterId {
        self.merged
    }

    /// Cluster count after the merge.
    #[must_use]
    pub fn clusters_remaining(&self) -> usize {
        self.clusters_remaining
    }
}

/// Receives each merge applied by [`crate::Clusterer`].
///
/// Closures taking `(&MergeStep, &ClusterState)` implement the trait.
///
/// # Examples
/// ```
/// use hcsolver_core::{ClusterState, MergeObserver, MergeStep};
///
/// let mut distances = Vec::new();
/// let mut observer = |step: &MergeStep, _state: &ClusterState| {
///     distances.push(step.distance().value());
/// };
/// # fn takes(_: &mut impl MergeObserver) {}
/// # takes(&mut observer);
/// ```
pub trait MergeObserver {
    /// Called after `step` has been applied; `state` is the new partition.
    fn on_merge(&mut self, step: &MergeStep, state: &ClusterState);
}

impl<F> MergeObserver for F
where
    F: FnMut(&MergeStep, &ClusterState),
{
    fn on_merge(&mut self, step: &MergeStep, state: &ClusterState) {
        self(step, state);
    }
}

/// Observer that ignores every merge.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl MergeObserver for NoopObserver {
    fn on_merge(&mut self, _step: &MergeStep, _state: &ClusterState) {}
}

/// A recorded merge with the partition it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    /// The merge itself.
    pub step: MergeStep,
    /// Partition after the merge, in partition order.
    pub partition: Vec<ClusterSnapshot>,
}

/// Observer recording every merge with a partition snapshot, for verbose
/// reporting.
#[derive(Debug, Clone, Default)]
pub struct TraceRecorder {
    entries: Vec<TraceEntry>,
}

impl TraceRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded merges in application order.
    #[must_use]
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Consumes the recorder, returning its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<TraceEntry> {
        self.entries
    }
}

impl MergeObserver for TraceRecorder {
    fn on_merge(&mut self, step: &MergeStep, state: &ClusterState) {
        self.entries.push(TraceEntry {
            step: step.clone(),
            partition: state.partition(),
        });
    }
}
