//! Result types for clustering runs.
//!
//! Provides the stable cluster handle, partition snapshots and the outcome of
//! a [`crate::Clusterer`] run.

use std::{fmt, sync::Arc};

use crate::state::ClusterState;

/// Stable handle assigned to a cluster when it is created.
///
/// Handles are never reused within a [`ClusterState`]: merging two clusters
/// retires both handles and allocates a fresh one.
///
/// # Examples
/// ```
/// use hcsolver_core::ClusterId;
///
/// let id = ClusterId::new(4);
/// assert_eq!(id.get(), 4);
/// assert_eq!(id.to_string(), "#4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(usize);

impl ClusterId {
    /// Creates a new cluster handle.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: usize) -> Self { Self(id) }

    /// Returns the underlying arena index.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> usize { self.0 }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owned snapshot of one cluster: its display name and member identifiers in
/// merge order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSnapshot {
    /// Deterministic display name such as `{{A,B},C}`.
    pub name: String,
    /// Member point identifiers.
    pub members: Vec<Arc<str>>,
}

/// Why a clustering run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The partition reached the requested cluster count.
    TargetReached,
    /// The distance sequence ran out before the requested cluster count was
    /// reached; the partition is the best effort reached so far.
    CandidatesExhausted,
}

/// Represents the output of a [`crate::Clusterer::run`] invocation.
#[derive(Debug, Clone)]
pub struct ClusteringOutcome {
    state: ClusterState,
    merges: usize,
    termination: Termination,
}

impl ClusteringOutcome {
    pub(crate) fn new(state: ClusterState, merges: usize, termination: Termination) -> Self {
        Self {
            state,
            merges,
            termination,
        }
    }

    /// Returns the final partition.
    #[must_use]
    pub fn state(&self) -> &ClusterState {
        &self.state
    }

    /// Consumes the outcome, returning the final partition.
    #[must_use]
    pub fn into_state(self) -> ClusterState {
        self.state
    }

    /// Number of merges applied during the run.
    #[must_use]
    pub fn merges(&self) -> usize {
        self.merges
    }

    /// Number of clusters in the final partition.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.state.len()
    }

    /// Reason the run stopped.
    #[must_use]
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Snapshot of the final partition in partition order.
    #[must_use]
    pub fn partition(&self) -> Vec<ClusterSnapshot> {
        self.state.partition()
    }
}
