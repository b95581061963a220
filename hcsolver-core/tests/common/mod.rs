#![allow(dead_code)]

use hcsolver_core::{Clusterer, ClustererBuilder, DistanceMetric, Linkage, Point, PointSet};

/// Builds a point set from `(id, coordinates)` pairs.
#[must_use]
pub fn point_set(points: &[(&str, &[f64])]) -> PointSet {
    PointSet::try_new(
        points
            .iter()
            .map(|(id, coordinates)| Point::new(*id, coordinates.to_vec()))
            .collect(),
    )
    .expect("fixture points must be valid")
}

/// A(0,0), B(1,0), C(5,5).
#[must_use]
pub fn triangle() -> PointSet {
    point_set(&[("A", &[0.0, 0.0]), ("B", &[1.0, 0.0]), ("C", &[5.0, 5.0])])
}

/// A(0,0), B(0,1), C(10,10), D(10,11).
#[must_use]
pub fn two_pairs() -> PointSet {
    point_set(&[
        ("A", &[0.0, 0.0]),
        ("B", &[0.0, 1.0]),
        ("C", &[10.0, 10.0]),
        ("D", &[10.0, 11.0]),
    ])
}

#[must_use]
pub fn clusterer(linkage: Linkage, metric: DistanceMetric, depth: usize) -> Clusterer {
    ClustererBuilder::new()
        .with_linkage(linkage)
        .with_metric(metric)
        .with_depth(depth)
        .build()
        .expect("linkage is configured")
}

/// Cluster names of a partition, in partition order.
#[must_use]
pub fn names(partition: &[hcsolver_core::ClusterSnapshot]) -> Vec<String> {
    partition.iter().map(|cluster| cluster.name.clone()).collect()
}
