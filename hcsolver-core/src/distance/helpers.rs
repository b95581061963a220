use super::types::{Coordinates, Distance, DistanceError, Operand, Result};

/// Checks both operands and their dimensions before a metric runs.
pub(crate) fn checked_operands<'a>(
    left: &'a [f64],
    right: &'a [f64],
) -> Result<(Coordinates<'a>, Coordinates<'a>)> {
    let left = Coordinates::try_new(left, Operand::Left)?;
    let right = Coordinates::try_new(right, Operand::Right)?;
    if left.dimension() == right.dimension() {
        Ok((left, right))
    } else {
        Err(DistanceError::DimensionMismatch {
            left: left.dimension(),
            right: right.dimension(),
        })
    }
}

/// Folds `term` over paired coordinates; the sum must stay finite.
pub(crate) fn sum_terms(
    (left, right): (Coordinates<'_>, Coordinates<'_>),
    term: impl Fn(f64, f64) -> f64,
) -> Result<Distance> {
    let value: f64 = left.iter().zip(right.iter()).map(|(&l, &r)| term(l, r)).sum();
    if value.is_finite() {
        Ok(Distance::from_raw(value))
    } else {
        Err(DistanceError::Overflow {
            dimension: left.dimension(),
            value,
        })
    }
}
