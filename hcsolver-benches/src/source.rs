//! Synthetic point sets for benchmarking.
//!
//! Points are drawn around randomly placed centroids so that clustering
//! runs see realistic, well-separated groups. Generation is seeded for
//! reproducibility across runs.

use hcsolver_core::{Point, PointSet, PointSetError};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Errors that may occur during synthetic point generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum SyntheticError {
    /// The requested point count was zero.
    #[error("point count must be greater than zero")]
    ZeroPoints,
    /// The requested dimension count was zero.
    #[error("dimension count must be greater than zero")]
    ZeroDimensions,
    /// The requested blob count was zero.
    #[error("blob count must be greater than zero")]
    ZeroBlobs,
    /// The generated points were rejected.
    #[error("generated points were rejected: {0}")]
    Points(#[from] PointSetError),
}

/// Configuration for synthetic blob generation.
#[derive(Clone, Debug)]
pub struct BlobConfig {
    /// Number of points to generate.
    pub point_count: usize,
    /// Dimensionality of each point.
    pub dimensions: usize,
    /// Number of centroids the points are spread across.
    pub blobs: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Half-width of the cube centroids are drawn from.
const CENTROID_SPREAD: f64 = 100.0;
/// Half-width of the cube each point is jittered within around its centroid.
const BLOB_RADIUS: f64 = 2.0;

/// Generates a seeded blob-shaped [`PointSet`].
///
/// Points are assigned to centroids round-robin and named `p0`, `p1`, ...
///
/// # Errors
/// Returns [`SyntheticError`] when any count in `config` is zero.
///
/// # Examples
/// ```
/// use hcsolver_benches::source::{BlobConfig, generate_blobs};
///
/// let config = BlobConfig { point_count: 12, dimensions: 3, blobs: 4, seed: 7 };
/// let points = generate_blobs(&config).expect("valid config");
/// assert_eq!(points.len(), 12);
/// assert_eq!(points.dimension(), 3);
/// ```
pub fn generate_blobs(config: &BlobConfig) -> Result<PointSet, SyntheticError> {
    if config.point_count == 0 {
        return Err(SyntheticError::ZeroPoints);
    }
    if config.dimensions == 0 {
        return Err(SyntheticError::ZeroDimensions);
    }
    if config.blobs == 0 {
        return Err(SyntheticError::ZeroBlobs);
    }

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let centroids: Vec<Vec<f64>> = (0..config.blobs)
        .map(|_| {
            (0..config.dimensions)
                .map(|_| rng.gen_range(-CENTROID_SPREAD..CENTROID_SPREAD))
                .collect()
        })
        .collect();

    let points = (0..config.point_count)
        .zip(centroids.iter().cycle())
        .map(|(index, centroid)| {
            let coordinates = centroid
                .iter()
                .map(|&centre| centre + rng.gen_range(-BLOB_RADIUS..BLOB_RADIUS))
                .collect();
            Point::new(format!("p{index}"), coordinates)
        })
        .collect();
    Ok(PointSet::try_new(points)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn config(point_count: usize, dimensions: usize, blobs: usize) -> BlobConfig {
        BlobConfig {
            point_count,
            dimensions,
            blobs,
            seed: 42,
        }
    }

    #[rstest]
    #[case(config(0, 2, 1), SyntheticError::ZeroPoints)]
    #[case(config(5, 0, 1), SyntheticError::ZeroDimensions)]
    #[case(config(5, 2, 0), SyntheticError::ZeroBlobs)]
    fn rejects_zero_counts(#[case] config: BlobConfig, #[case] expected: SyntheticError) {
        let err = generate_blobs(&config).expect_err("zero counts are invalid");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn generation_is_reproducible() {
        let first = generate_blobs(&config(20, 4, 3)).expect("valid config");
        let second = generate_blobs(&config(20, 4, 3)).expect("valid config");
        let coordinates = |points: &PointSet| -> Vec<Vec<f64>> {
            points
                .iter()
                .map(|point| point.coordinates().to_vec())
                .collect()
        };
        assert_eq!(coordinates(&first), coordinates(&second));
    }

    #[rstest]
    fn points_stay_near_their_centroid() {
        let points = generate_blobs(&config(6, 2, 2)).expect("valid config");
        // p0 and p2 share a centroid, so they differ by at most twice the
        // radius per axis.
        let p0 = points.get(0).expect("p0 exists").coordinates();
        let p2 = points.get(2).expect("p2 exists").coordinates();
        for (a, b) in p0.iter().zip(p2) {
            assert!((a - b).abs() <= 2.0 * BLOB_RADIUS);
        }
    }
}
