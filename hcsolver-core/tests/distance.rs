//! Tests for the public distance functions and their validation.

use hcsolver_core::{
    Coordinates, DistanceError, DistanceMetric, Operand, manhattan_distance,
    squared_euclidean_distance,
};
use rstest::rstest;

#[rstest]
#[case(&[0.0, 0.0], &[1.0, 0.0], 1.0)]
#[case(&[1.0, 2.0, 3.0], &[4.0, 6.0, 3.0], 25.0)]
#[case(&[-2.0], &[2.0], 16.0)]
fn squared_euclidean_skips_the_root(
    #[case] left: &[f64],
    #[case] right: &[f64],
    #[case] expected: f64,
) {
    let distance = squared_euclidean_distance(left, right).expect("inputs are valid");
    assert_eq!(distance.value(), expected);
}

#[rstest]
#[case(&[0.0, 0.0], &[10.0, 11.0], 21.0)]
#[case(&[1.5, -1.5], &[-1.5, 1.5], 6.0)]
fn manhattan_sums_absolute_differences(
    #[case] left: &[f64],
    #[case] right: &[f64],
    #[case] expected: f64,
) {
    let distance = manhattan_distance(left, right).expect("inputs are valid");
    assert_eq!(distance.value(), expected);
}

#[rstest]
#[case::empty_left(&[], &[1.0], DistanceError::Empty { operand: Operand::Left })]
#[case::empty_right(&[1.0], &[], DistanceError::Empty { operand: Operand::Right })]
#[case::mismatch(&[1.0, 2.0], &[1.0], DistanceError::DimensionMismatch { left: 2, right: 1 })]
fn metrics_reject_malformed_vectors(
    #[case] left: &[f64],
    #[case] right: &[f64],
    #[case] expected: DistanceError,
) {
    for metric in [DistanceMetric::SquaredEuclidean, DistanceMetric::Manhattan] {
        let err = metric.distance(left, right).expect_err("input is malformed");
        assert_eq!(err, expected);
    }
}

#[rstest]
fn non_finite_values_name_the_offending_side() {
    let err = manhattan_distance(&[0.0, 1.0], &[0.0, f64::INFINITY])
        .expect_err("infinity is rejected");
    assert!(matches!(
        err,
        DistanceError::NonFinite {
            operand: Operand::Right,
            index: 1,
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "right operand has a non-finite coordinate at index 1: inf"
    );
}

#[rstest]
#[case::squared_euclidean(DistanceMetric::SquaredEuclidean, &[0.0, 0.0], &[2e155, 0.0])]
#[case::manhattan(DistanceMetric::Manhattan, &[-1.5e308], &[1.5e308])]
fn overflowing_distances_are_rejected(
    #[case] metric: DistanceMetric,
    #[case] left: &[f64],
    #[case] right: &[f64],
) {
    let err = metric.distance(left, right).expect_err("sum exceeds f64::MAX");
    assert!(matches!(
        err,
        DistanceError::Overflow { value, .. } if value == f64::INFINITY
    ));
    assert!(err.to_string().contains("overflowed"));
}

#[rstest]
fn largest_finite_distance_is_kept() {
    let distance = manhattan_distance(&[0.0], &[f64::MAX]).expect("sum stays finite");
    assert_eq!(distance.value(), f64::MAX);
}

#[rstest]
fn coordinates_expose_dimension() {
    let coordinates =
        Coordinates::try_new(&[1.0, 2.0, 3.0], Operand::Left).expect("coordinates are valid");
    assert_eq!(coordinates.dimension(), 3);
    assert_eq!(coordinates.as_slice(), &[1.0, 2.0, 3.0]);
}

#[rstest]
#[case(DistanceMetric::SquaredEuclidean, "squared-euclidean")]
#[case(DistanceMetric::Manhattan, "manhattan")]
fn metric_names_are_stable(#[case] metric: DistanceMetric, #[case] name: &str) {
    assert_eq!(metric.as_str(), name);
    assert_eq!(metric.to_string(), name);
}
