use crate::distance::helpers::{checked_operands, sum_terms};
use crate::distance::types::{Distance, Result};

/// Sum of squared coordinate differences.
///
/// The square root is never taken: merge selection only compares distances,
/// and the squared form keeps integer-valued inputs exact.
///
/// ```
/// use hcsolver_core::{DistanceError, squared_euclidean_distance};
///
/// let distance = squared_euclidean_distance(&[1.0, 2.0], &[4.0, 6.0])?;
/// assert_eq!(distance.value(), 25.0);
/// # Ok::<(), DistanceError>(())
/// ```
///
/// # Errors
/// Returns [`crate::DistanceError`] for empty, non-finite, or
/// differently-sized operands, and when the result overflows `f64`.
pub fn squared_euclidean_distance(left: &[f64], right: &[f64]) -> Result<Distance> {
    let operands = checked_operands(left, right)?;
    sum_terms(operands, |l, r| (l - r).powi(2))
}
