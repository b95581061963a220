use crate::distance::helpers::{checked_operands, sum_terms};
use crate::distance::types::{Distance, Result};

/// Sum of absolute coordinate differences (L1).
///
/// ```
/// use hcsolver_core::{DistanceError, manhattan_distance};
///
/// let distance = manhattan_distance(&[0.0, 1.0], &[10.0, 11.0])?;
/// assert_eq!(distance.value(), 20.0);
/// # Ok::<(), DistanceError>(())
/// ```
///
/// # Errors
/// Returns [`crate::DistanceError`] for empty, non-finite, or
/// differently-sized operands, and when the result overflows `f64`.
pub fn manhattan_distance(left: &[f64], right: &[f64]) -> Result<Distance> {
    let operands = checked_operands(left, right)?;
    sum_terms(operands, |l, r| (l - r).abs())
}
