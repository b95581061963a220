//! Agglomerative clustering engine.
//!
//! Provides the [`Clusterer`] entry point, which seeds one singleton per
//! point, builds the distance matrix once, and applies merges proposed by the
//! [`LinkageSelector`] until the partition reaches the requested depth.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    Result,
    distance::DistanceMetric,
    error::{ClusterStateError, ClusteringError},
    linkage::{Linkage, LinkageSelector, MergeCandidate},
    matrix::DistanceMatrix,
    observer::{MergeObserver, MergeStep, NoopObserver},
    points::PointSet,
    result::{ClusteringOutcome, Termination},
    state::ClusterState,
};

/// Entry point for running agglomerative clustering.
///
/// # Examples
/// ```
/// use hcsolver_core::{ClustererBuilder, Linkage, Point, PointSet};
///
/// let points = PointSet::try_new(vec![
///     Point::new("A", vec![0.0, 0.0]),
///     Point::new("B", vec![1.0, 0.0]),
///     Point::new("C", vec![5.0, 5.0]),
/// ])?;
/// let clusterer = ClustererBuilder::new()
///     .with_linkage(Linkage::Single)
///     .with_depth(2)
///     .build()?;
/// let outcome = clusterer.run(&points)?;
///
/// let names: Vec<String> = outcome.partition().into_iter().map(|c| c.name).collect();
/// assert_eq!(names, ["{A,B}", "{C}"]);
/// assert_eq!(outcome.merges(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Clusterer {
    linkage: Linkage,
    metric: DistanceMetric,
    depth: usize,
}

impl Clusterer {
    pub(crate) fn new(linkage: Linkage, metric: DistanceMetric, depth: usize) -> Self {
        Self {
            linkage,
            metric,
            depth,
        }
    }

    /// Returns the linkage rule.
    #[must_use]
    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// Returns the distance metric.
    #[must_use]
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Returns the configured depth as supplied.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Cluster count at which merging stops: `max(1, depth)`.
    #[must_use]
    pub fn target_clusters(&self) -> usize {
        self.depth.max(1)
    }

    /// Clusters `points` without step reporting.
    ///
    /// # Errors
    /// Returns [`ClusteringError`] when the matrix cannot be built or a merge
    /// is rejected by the state; neither happens for a validated
    /// [`PointSet`].
    pub fn run(&self, points: &PointSet) -> Result<ClusteringOutcome> {
        self.run_with_observer(points, &mut NoopObserver)
    }

    /// Clusters `points`, reporting every merge to `observer`.
    ///
    /// # Errors
    /// See [`Self::run`].
    #[instrument(
        name = "core.run",
        err,
        skip(self, points, observer),
        fields(
            points = points.len(),
            linkage = %self.linkage,
            metric = %self.metric,
            depth = self.depth,
        ),
    )]
    pub fn run_with_observer<O>(
        &self,
        points: &PointSet,
        observer: &mut O,
    ) -> Result<ClusteringOutcome>
    where
        O: MergeObserver + ?Sized,
    {
        let state = ClusterState::from_points(points);
        if points.is_empty() {
            warn!("point set is empty, returning an empty partition");
            return Ok(ClusteringOutcome::new(state, 0, Termination::TargetReached));
        }

        let matrix = DistanceMatrix::build(points, self.metric)?;
        let outcome = self.resume(&matrix, state, observer)?;
        info!(
            clusters = outcome.cluster_count(),
            merges = outcome.merges(),
            termination = ?outcome.termination(),
            "clustering finished"
        );
        Ok(outcome)
    }

    /// Continues clustering from an existing `state` over a prebuilt
    /// `matrix`.
    ///
    /// A state already at or below the target cluster count is returned
    /// unchanged with zero merges.
    ///
    /// # Errors
    /// Returns [`ClusteringError::MatrixMismatch`] when `matrix` and `state`
    /// cover a different number of points,
    /// [`ClusteringError::PointMismatch`] when a state point sits at another
    /// matrix position or is absent from it, and [`ClusteringError::State`]
    /// if a merge is rejected.
    pub fn resume<O>(
        &self,
        matrix: &DistanceMatrix,
        mut state: ClusterState,
        observer: &mut O,
    ) -> Result<ClusteringOutcome>
    where
        O: MergeObserver + ?Sized,
    {
        if matrix.len() != state.point_count() {
            return Err(ClusteringError::MatrixMismatch {
                matrix: matrix.len(),
                state: state.point_count(),
            });
        }
        if let Some((index, point)) = (0..state.point_count())
            .filter_map(|index| state.point_id(index).map(|id| (index, id)))
            .find(|&(index, id)| matrix.index_of(id) != Some(index))
        {
            return Err(ClusteringError::PointMismatch {
                index,
                point: Arc::from(point),
            });
        }

        let target = self.target_clusters();
        let mut selector = LinkageSelector::new(matrix, self.linkage);
        let mut merges = 0_usize;

        while state.len() > target {
            let Some(candidate) = selector.next_merge(&state) else {
                warn!(
                    clusters = state.len(),
                    target,
                    stale = selector.stale(),
                    deferred = selector.deferred(),
                    "distance candidates exhausted before reaching target depth"
                );
                return Ok(ClusteringOutcome::new(
                    state,
                    merges,
                    Termination::CandidatesExhausted,
                ));
            };

            merges += 1;
            let step = apply_merge(&mut state, candidate, merges)?;
            debug!(
                step = step.step(),
                left = step.left_point(),
                right = step.right_point(),
                distance = step.distance().value(),
                clusters = step.clusters_remaining(),
                "merged clusters"
            );
            observer.on_merge(&step, &state);
        }

        Ok(ClusteringOutcome::new(
            state,
            merges,
            Termination::TargetReached,
        ))
    }
}

fn apply_merge(
    state: &mut ClusterState,
    candidate: MergeCandidate,
    step: usize,
) -> Result<MergeStep> {
    let pair = candidate.pair();
    let point_id = |state: &ClusterState, index: usize| {
        state
            .shared_point_id(index)
            .ok_or_else(|| ClusterStateError::Inconsistent {
                reason: format!("point {index} is not tracked by the state"),
            })
    };
    let left_point = point_id(state, pair.left())?;
    let right_point = point_id(state, pair.right())?;
    let merged = state.merge(candidate.left(), candidate.right())?;
    Ok(MergeStep::new(
        step,
        left_point,
        right_point,
        candidate.distance(),
        merged,
        state.len(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::{builder::ClustererBuilder, points::Point};

    fn clusterer(linkage: Linkage, depth: usize) -> Clusterer {
        ClustererBuilder::new()
            .with_linkage(linkage)
            .with_depth(depth)
            .build()
            .expect("linkage is configured")
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(4, 4)]
    fn target_clusters_is_at_least_one(#[case] depth: usize, #[case] expected: usize) {
        assert_eq!(clusterer(Linkage::Single, depth).target_clusters(), expected);
    }

    #[test]
    fn resume_rejects_mismatched_matrix() {
        let points = PointSet::try_new(vec![
            Point::new("A", vec![0.0]),
            Point::new("B", vec![1.0]),
        ])
        .expect("points are valid");
        let matrix =
            DistanceMatrix::build(&points, DistanceMetric::Manhattan).expect("matrix builds");
        let state = ClusterState::try_from_identifiers(["A", "B", "C"]).expect("unique ids");
        let err = clusterer(Linkage::Single, 0)
            .resume(&matrix, state, &mut NoopObserver)
            .expect_err("sizes differ");
        assert_eq!(err, ClusteringError::MatrixMismatch { matrix: 2, state: 3 });
    }

    #[rstest]
    #[case::foreign_identifier(["A", "Z"], 1, "Z")]
    #[case::swapped_order(["B", "A"], 0, "B")]
    fn resume_rejects_state_from_other_points(
        #[case] ids: [&str; 2],
        #[case] index: usize,
        #[case] point: &str,
    ) {
        let points = PointSet::try_new(vec![
            Point::new("A", vec![0.0]),
            Point::new("B", vec![1.0]),
        ])
        .expect("points are valid");
        let matrix =
            DistanceMatrix::build(&points, DistanceMetric::Manhattan).expect("matrix builds");
        let state = ClusterState::try_from_identifiers(ids).expect("unique ids");
        let err = clusterer(Linkage::Single, 0)
            .resume(&matrix, state, &mut NoopObserver)
            .expect_err("state and matrix disagree on points");
        assert_eq!(
            err,
            ClusteringError::PointMismatch {
                index,
                point: Arc::from(point),
            }
        );
        assert_eq!(err.code().as_str(), "HCSOLVER_POINT_MISMATCH");
    }

    #[test]
    fn apply_merge_reports_the_triggering_pair() {
        let points = PointSet::try_new(vec![
            Point::new("A", vec![0.0]),
            Point::new("B", vec![3.0]),
        ])
        .expect("points are valid");
        let matrix =
            DistanceMatrix::build(&points, DistanceMetric::Manhattan).expect("matrix builds");
        let mut state = ClusterState::from_points(&points);
        let candidate = LinkageSelector::new(&matrix, Linkage::Single)
            .next_merge(&state)
            .expect("one merge is available");

        let step = apply_merge(&mut state, candidate, 1).expect("merge applies");
        assert_eq!(step.left_point(), "A");
        assert_eq!(step.right_point(), "B");
        assert_eq!(step.distance().value(), 3.0);
        assert_eq!(step.clusters_remaining(), 1);
        assert_eq!(state.name_of(step.merged()).as_deref(), Some("{A,B}"));
    }
}
