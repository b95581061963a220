//! Merge selection under single or complete linkage.
//!
//! The selector walks the ascending distance sequence of a
//! [`DistanceMatrix`] exactly once. Each entry names a pair of points; the
//! entry is skipped when both points already share a cluster. Otherwise:
//!
//! - single linkage accepts it at once, since the smallest remaining
//!   cross-cluster point distance is the single-linkage cluster distance;
//! - complete linkage accepts it only when the entry's distance equals the
//!   largest point distance between the two clusters. Smaller entries are
//!   discarded for good: cluster maxima never shrink as clusters grow, and the
//!   pair that realises the maximum is itself further along the sequence.
//!
//! Complete-linkage maxima are memoised per cluster pair. Handles are never
//! reused and a cluster's members never change under its handle, so a cached
//! maximum stays valid for the whole run. A merged cluster's maximum against
//! another cluster is the larger of its two children's maxima when both are
//! cached, and a member scan otherwise.
//!
//! Entries with equal distances are considered in matrix iteration order. No
//! further tie-break is applied, so the merge order among equal distances
//! depends on point insertion order.

use core::fmt;
use std::collections::HashMap;

use tracing::trace;

use crate::{
    distance::Distance,
    matrix::{DistanceMatrix, PairDistance},
    result::ClusterId,
    state::ClusterState,
};

/// Policy deriving a cluster-to-cluster distance from point distances.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Linkage {
    /// Minimum point distance across the two clusters.
    Single,
    /// Maximum point distance across the two clusters.
    Complete,
}

impl Linkage {
    /// Returns the stable name of the linkage rule.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Complete => "complete",
        }
    }

    /// Distance between two live clusters under this rule, computed by
    /// scanning every member pair in `matrix`.
    ///
    /// Returns `None` when either handle is not live or a member index is not
    /// covered by the matrix.
    #[must_use]
    pub fn cluster_distance(
        self,
        matrix: &DistanceMatrix,
        state: &ClusterState,
        left: ClusterId,
        right: ClusterId,
    ) -> Option<f64> {
        let left_members = state.members_of(left)?;
        let right_members = state.members_of(right)?;
        let mut best: Option<f64> = None;
        for &i in left_members {
            for &j in right_members {
                let distance = matrix.distance(i, j)?;
                best = Some(match (self, best) {
                    (_, None) => distance,
                    (Self::Single, Some(current)) => current.min(distance),
                    (Self::Complete, Some(current)) => current.max(distance),
                });
            }
        }
        best
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pair of clusters chosen for the next merge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MergeCandidate {
    left: ClusterId,
    right: ClusterId,
    pair: PairDistance,
}

impl MergeCandidate {
    /// Cluster owning the pair's first point; listed first in the merge.
    #[must_use]
    pub fn left(&self) -> ClusterId {
        self.left
    }

    /// Cluster owning the pair's second point.
    #[must_use]
    pub fn right(&self) -> ClusterId {
        self.right
    }

    /// Point pair that triggered the merge.
    #[must_use]
    pub fn pair(&self) -> PairDistance {
        self.pair
    }

    /// Distance at which the merge happens.
    #[must_use]
    pub fn distance(&self) -> Distance {
        self.pair.distance()
    }
}

/// Cursor over the sorted distance sequence that yields eligible merges.
///
/// # Examples
/// ```
/// use hcsolver_core::{
///     ClusterState, DistanceMatrix, DistanceMetric, Linkage, LinkageSelector, Point, PointSet,
/// };
///
/// let points = PointSet::try_new(vec![
///     Point::new("A", vec![0.0, 0.0]),
///     Point::new("B", vec![1.0, 0.0]),
///     Point::new("C", vec![5.0, 5.0]),
/// ])?;
/// let matrix = DistanceMatrix::build(&points, DistanceMetric::SquaredEuclidean)?;
/// let state = ClusterState::from_points(&points);
/// let mut selector = LinkageSelector::new(&matrix, Linkage::Single);
///
/// let candidate = selector.next_merge(&state).expect("a merge is available");
/// assert_eq!(candidate.distance().value(), 1.0);
/// assert_eq!(candidate.left(), state.owner_of("A").expect("tracked"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct LinkageSelector<'m> {
    matrix: &'m DistanceMatrix,
    linkage: Linkage,
    cursor: usize,
    stale: usize,
    deferred: usize,
    maxima: HashMap<(ClusterId, ClusterId), f64>,
}

impl<'m> LinkageSelector<'m> {
    /// Creates a selector positioned at the smallest distance.
    #[must_use]
    pub fn new(matrix: &'m DistanceMatrix, linkage: Linkage) -> Self {
        Self {
            matrix,
            linkage,
            cursor: 0,
            stale: 0,
            deferred: 0,
            maxima: HashMap::new(),
        }
    }

    /// Linkage rule applied by this selector.
    #[must_use]
    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// Pops entries until one qualifies as a merge of two distinct clusters
    /// in `state`, or returns `None` once the sequence is exhausted.
    pub fn next_merge(&mut self, state: &ClusterState) -> Option<MergeCandidate> {
        while let Some(pair) = self.matrix.sorted_distances().get(self.cursor).copied() {
            self.cursor += 1;

            let owners = state
                .owner_of_index(pair.left())
                .zip(state.owner_of_index(pair.right()));
            let Some((left, right)) = owners.filter(|(left, right)| left != right) else {
                self.stale += 1;
                continue;
            };

            if self.accepts(state, left, right, pair.value()) {
                return Some(MergeCandidate { left, right, pair });
            }

            self.deferred += 1;
            trace!(
                left = pair.left(),
                right = pair.right(),
                distance = pair.value(),
                "complete linkage deferred candidate"
            );
        }
        None
    }

    fn accepts(
        &mut self,
        state: &ClusterState,
        left: ClusterId,
        right: ClusterId,
        value: f64,
    ) -> bool {
        match self.linkage {
            Linkage::Single => true,
            // The popped pair is one of the cross pairs, so the maximum is
            // never below `value`; equality is the acceptance test.
            Linkage::Complete => self
                .complete_distance(state, left, right)
                .is_some_and(|maximum| maximum <= value),
        }
    }

    fn complete_distance(
        &mut self,
        state: &ClusterState,
        a: ClusterId,
        b: ClusterId,
    ) -> Option<f64> {
        let key = if a < b { (a, b) } else { (b, a) };
        if let Some(&cached) = self.maxima.get(&key) {
            return Some(cached);
        }
        let from_children = |merged: ClusterId, other: ClusterId| {
            let (x, y) = state.children_of(merged)?;
            let lookup = |child: ClusterId| {
                let key = if child < other { (child, other) } else { (other, child) };
                self.maxima.get(&key).copied()
            };
            Some(lookup(x)?.max(lookup(y)?))
        };
        let maximum = from_children(a, b)
            .or_else(|| from_children(b, a))
            .or_else(|| Linkage::Complete.cluster_distance(self.matrix, state, a, b))?;
        self.maxima.insert(key, maximum);
        Some(maximum)
    }

    /// Number of cluster pairs whose complete-linkage maximum is memoised.
    #[must_use]
    pub fn cached_maxima(&self) -> usize {
        self.maxima.len()
    }

    /// Entries skipped because both points already shared a cluster.
    #[must_use]
    pub fn stale(&self) -> usize {
        self.stale
    }

    /// Entries discarded by the complete-linkage maximum check.
    #[must_use]
    pub fn deferred(&self) -> usize {
        self.deferred
    }

    /// Entries not yet examined.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.matrix
            .sorted_distances()
            .len()
            .saturating_sub(self.cursor)
    }
}
