//! Pairwise distance table over the initial singleton clusters.
//!
//! Distances are computed once per unordered pair and stored as a condensed
//! upper triangle in row-major order (`i < j`). The same pass records every
//! pair in a sequence that is then stably sorted by distance, so pairs with
//! equal distances keep matrix iteration order. Merge selection walks that
//! sequence; nothing is recomputed as clusters merge.

use std::{collections::HashMap, sync::Arc};

use tracing::{debug, instrument};

use crate::{
    distance::{Distance, DistanceMetric},
    error::{ClusteringError, Result},
    points::PointSet,
};

/// One off-diagonal matrix entry: a pair of point indices (`left < right`)
/// and their distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairDistance {
    left: usize,
    right: usize,
    distance: Distance,
}

impl PairDistance {
    /// Index of the first point of the pair.
    #[must_use]
    pub fn left(&self) -> usize {
        self.left
    }

    /// Index of the second point of the pair.
    #[must_use]
    pub fn right(&self) -> usize {
        self.right
    }

    /// Distance between the two points.
    #[must_use]
    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// Raw distance value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.distance.value()
    }
}

/// Symmetric point-to-point distance table with a zero diagonal.
///
/// # Examples
/// ```
/// use hcsolver_core::{DistanceMatrix, DistanceMetric, Point, PointSet};
///
/// let points = PointSet::try_new(vec![
///     Point::new("A", vec![0.0, 0.0]),
///     Point::new("B", vec![1.0, 0.0]),
///     Point::new("C", vec![5.0, 5.0]),
/// ])?;
/// let matrix = DistanceMatrix::build(&points, DistanceMetric::SquaredEuclidean)?;
/// assert_eq!(matrix.distance(2, 0), Some(50.0));
/// let sorted: Vec<f64> = matrix.sorted_distances().iter().map(|pair| pair.value()).collect();
/// assert_eq!(sorted, [1.0, 41.0, 50.0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct DistanceMatrix {
    len: usize,
    metric: DistanceMetric,
    index: HashMap<Arc<str>, usize>,
    condensed: Vec<f64>,
    sorted: Vec<PairDistance>,
}

impl DistanceMatrix {
    /// Computes every pairwise distance in `points` with `metric`.
    ///
    /// # Errors
    /// Returns [`ClusteringError::Distance`] when the metric rejects a pair.
    /// A validated [`PointSet`] never triggers this.
    #[instrument(
        name = "core.distance_matrix",
        err,
        skip(points, metric),
        fields(points = points.len(), metric = %metric),
    )]
    pub fn build(points: &PointSet, metric: DistanceMetric) -> Result<Self> {
        let len = points.len();
        let pairs = pair_count(len);
        let mut condensed = Vec::with_capacity(pairs);
        let mut sorted = Vec::with_capacity(pairs);

        for (left, left_point) in points.iter().enumerate() {
            for (right, right_point) in points.iter().enumerate().skip(left + 1) {
                let distance = metric
                    .distance(left_point.coordinates(), right_point.coordinates())
                    .map_err(|error| ClusteringError::Distance {
                        left: left_point.shared_id(),
                        right: right_point.shared_id(),
                        error,
                    })?;
                condensed.push(distance.value());
                sorted.push(PairDistance {
                    left,
                    right,
                    distance,
                });
            }
        }

        // `sort_by` is stable: equal distances stay in matrix iteration order.
        sorted.sort_by(|a, b| a.distance().total_cmp(&b.distance()));
        debug!(pairs = sorted.len(), "distance matrix built");

        let index = points
            .ids()
            .into_iter()
            .enumerate()
            .map(|(position, id)| (id, position))
            .collect();

        Ok(Self {
            len,
            metric,
            index,
            condensed,
            sorted,
        })
    }

    /// Number of points covered by the matrix.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the matrix covers no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Metric the matrix was built with.
    #[must_use]
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Distance between points `i` and `j` in either order; `0.0` on the
    /// diagonal and `None` when an index is out of range.
    #[must_use]
    pub fn distance(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.len || j >= self.len {
            return None;
        }
        if i == j {
            return Some(Distance::ZERO.value());
        }
        let (row, column) = if i < j { (i, j) } else { (j, i) };
        self.condensed
            .get(condensed_index(self.len, row, column))
            .copied()
    }

    /// Row of the point labeled `id`, in point-set order.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Distance between the points labeled `left` and `right`; `None` when
    /// either identifier is unknown.
    #[must_use]
    pub fn distance_between(&self, left: &str, right: &str) -> Option<f64> {
        let i = self.index_of(left)?;
        let j = self.index_of(right)?;
        self.distance(i, j)
    }

    /// All off-diagonal entries in ascending distance order, one per unordered
    /// pair.
    #[must_use]
    pub fn sorted_distances(&self) -> &[PairDistance] {
        &self.sorted
    }
}

fn pair_count(len: usize) -> usize {
    len.saturating_mul(len.saturating_sub(1)) / 2
}

/// Offset of `(row, column)` with `row < column` in the condensed triangle.
fn condensed_index(len: usize, row: usize, column: usize) -> usize {
    // Rows before `row` contribute `len - 1 - k` entries each.
    row * len - row * (row + 1) / 2 + (column - row - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::{fixture, rstest};

    use crate::points::Point;

    #[fixture]
    fn triangle() -> PointSet {
        PointSet::try_new(vec![
            Point::new("A", vec![0.0, 0.0]),
            Point::new("B", vec![1.0, 0.0]),
            Point::new("C", vec![5.0, 5.0]),
        ])
        .expect("fixture points are valid")
    }

    #[rstest]
    fn matrix_is_symmetric_with_zero_diagonal(triangle: PointSet) {
        let matrix = DistanceMatrix::build(&triangle, DistanceMetric::SquaredEuclidean)
            .expect("matrix builds");
        for i in 0..triangle.len() {
            assert_eq!(matrix.distance(i, i), Some(0.0));
            for j in 0..triangle.len() {
                assert_eq!(matrix.distance(i, j), matrix.distance(j, i));
            }
        }
        assert_eq!(matrix.distance(0, 1), Some(1.0));
        assert_eq!(matrix.distance(1, 2), Some(41.0));
        assert_eq!(matrix.distance(0, 3), None);
    }

    #[rstest]
    #[case("A", "C", Some(50.0))]
    #[case("C", "A", Some(50.0))]
    #[case("B", "B", Some(0.0))]
    #[case("A", "Z", None)]
    fn distance_between_looks_up_identifiers(
        triangle: PointSet,
        #[case] left: &str,
        #[case] right: &str,
        #[case] expected: Option<f64>,
    ) {
        let matrix = DistanceMatrix::build(&triangle, DistanceMetric::SquaredEuclidean)
            .expect("matrix builds");
        assert_eq!(matrix.distance_between(left, right), expected);
    }

    #[rstest]
    fn sorted_sequence_has_one_entry_per_pair(triangle: PointSet) {
        let matrix =
            DistanceMatrix::build(&triangle, DistanceMetric::Manhattan).expect("matrix builds");
        let entries = matrix.sorted_distances();
        assert_eq!(entries.len(), 3);
        assert!(entries.windows(2).all(|w| w[0].value() <= w[1].value()));
        assert!(entries.iter().all(|entry| entry.left() < entry.right()));
    }

    #[test]
    fn equal_distances_keep_matrix_iteration_order() {
        let points = PointSet::try_new(vec![
            Point::new("A", vec![0.0]),
            Point::new("B", vec![1.0]),
            Point::new("C", vec![2.0]),
            Point::new("D", vec![3.0]),
        ])
        .expect("points are valid");
        let matrix =
            DistanceMatrix::build(&points, DistanceMetric::Manhattan).expect("matrix builds");
        let unit_pairs: Vec<(usize, usize)> = matrix
            .sorted_distances()
            .iter()
            .take_while(|entry| entry.value() == 1.0)
            .map(|entry| (entry.left(), entry.right()))
            .collect();
        assert_eq!(unit_pairs, [(0, 1), (1, 2), (2, 3)]);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 0)]
    #[case(2, 1)]
    #[case(5, 10)]
    fn entry_count_is_n_choose_two(#[case] count: usize, #[case] expected: usize) {
        let points = PointSet::try_new(
            (0..count)
                .map(|index| Point::new(format!("p{index}"), vec![index as f64]))
                .collect(),
        )
        .expect("points are valid");
        let matrix = DistanceMatrix::build(&points, DistanceMetric::SquaredEuclidean)
            .expect("matrix builds");
        assert_eq!(matrix.sorted_distances().len(), expected);
        assert_eq!(matrix.len(), count);
        assert_eq!(matrix.is_empty(), count == 0);
    }

    #[test]
    fn condensed_index_walks_rows_contiguously() {
        let len = 4;
        let offsets: Vec<usize> = (0..len)
            .flat_map(|row| ((row + 1)..len).map(move |column| (row, column)))
            .map(|(row, column)| condensed_index(len, row, column))
            .collect();
        assert_eq!(offsets, [0, 1, 2, 3, 4, 5]);
    }
}
