//! Distance primitives for the built-in numeric metrics.
//!
//! Both metrics validate their inputs and surface detailed errors. Callers
//! that hold a validated [`crate::PointSet`] never observe those errors, but
//! the free functions remain safe to call on arbitrary slices.

mod helpers;
mod manhattan;
mod squared_euclidean;
mod types;

use core::fmt;

pub use self::manhattan::manhattan_distance;
pub use self::squared_euclidean::squared_euclidean_distance;
pub use self::types::{Coordinates, Distance, DistanceError, Operand, Result};

/// Metric used to populate the [`crate::DistanceMatrix`].
///
/// # Examples
/// ```
/// use hcsolver_core::DistanceMetric;
///
/// let metric = DistanceMetric::Manhattan;
/// let distance = metric.distance(&[0.0, 0.0], &[1.0, 2.0]).expect("equal dimensions");
/// assert_eq!(distance.value(), 3.0);
/// assert_eq!(metric.to_string(), "manhattan");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum DistanceMetric {
    /// Sum of squared coordinate differences.
    #[default]
    SquaredEuclidean,
    /// Sum of absolute coordinate differences.
    Manhattan,
}

impl DistanceMetric {
    /// Computes the distance between `left` and `right` under this metric.
    ///
    /// # Errors
    /// Propagates the [`DistanceError`] raised by the selected metric.
    pub fn distance(self, left: &[f64], right: &[f64]) -> Result<Distance> {
        match self {
            Self::SquaredEuclidean => squared_euclidean_distance(left, right),
            Self::Manhattan => manhattan_distance(left, right),
        }
    }

    /// Returns the stable name of the metric.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SquaredEuclidean => "squared-euclidean",
            Self::Manhattan => "manhattan",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
