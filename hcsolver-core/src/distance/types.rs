//! Coordinate and distance newtypes used by the metrics.

use core::{cmp::Ordering, fmt, ops::Deref};

use thiserror::Error;

/// Which argument of a two-operand distance call a value came from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operand {
    /// The first argument.
    Left,
    /// The second argument.
    Right,
}

impl Operand {
    /// Lower-case label used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs or results the metrics refuse to turn into a [`Distance`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DistanceError {
    /// An operand had no coordinates.
    #[error("{operand} operand has no coordinates")]
    Empty {
        /// The empty operand.
        operand: Operand,
    },
    /// The operands have different dimensions.
    #[error("operands differ in dimension: left has {left}, right has {right}")]
    DimensionMismatch {
        /// Dimension of the left operand.
        left: usize,
        /// Dimension of the right operand.
        right: usize,
    },
    /// An operand holds NaN or an infinity.
    #[error("{operand} operand has a non-finite coordinate at index {index}: {value}")]
    NonFinite {
        /// The offending operand.
        operand: Operand,
        /// Zero-based coordinate index.
        index: usize,
        /// The rejected value.
        value: f64,
    },
    /// The operands are finite but their distance exceeds `f64::MAX`.
    #[error("distance over {dimension} coordinates overflowed to {value}")]
    Overflow {
        /// Shared dimension of the operands.
        dimension: usize,
        /// The non-finite sum.
        value: f64,
    },
}

/// Result alias for the metrics.
pub type Result<T> = core::result::Result<T, DistanceError>;

/// Borrowed coordinates known to be non-empty and finite.
///
/// # Examples
/// ```
/// use hcsolver_core::{Coordinates, DistanceError, Operand};
///
/// let coordinates = Coordinates::try_new(&[1.0, 2.0], Operand::Left)?;
/// assert_eq!(coordinates.dimension(), 2);
///
/// let err = Coordinates::try_new(&[f64::NAN], Operand::Right).unwrap_err();
/// assert!(matches!(err, DistanceError::NonFinite { operand: Operand::Right, index: 0, .. }));
/// # Ok::<(), DistanceError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Coordinates<'a> {
    values: &'a [f64],
}

impl<'a> Coordinates<'a> {
    /// Checks `values` on behalf of `operand`.
    ///
    /// # Errors
    /// Returns [`DistanceError::Empty`] for an empty slice and
    /// [`DistanceError::NonFinite`] for the first NaN or infinite value.
    pub fn try_new(values: &'a [f64], operand: Operand) -> Result<Self> {
        if values.is_empty() {
            return Err(DistanceError::Empty { operand });
        }
        match values.iter().position(|value| !value.is_finite()) {
            Some(index) => Err(DistanceError::NonFinite {
                operand,
                index,
                value: values.get(index).copied().unwrap_or(f64::NAN),
            }),
            None => Ok(Self { values }),
        }
    }

    /// Number of coordinates.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// The underlying slice.
    #[must_use]
    pub fn as_slice(&self) -> &'a [f64] {
        self.values
    }
}

impl Deref for Coordinates<'_> {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        self.values
    }
}

/// Non-negative distance produced by a metric.
///
/// Comparison goes through [`f64::total_cmp`], so distances sort without a
/// partial-order escape hatch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Distance(f64);

impl Distance {
    /// Distance from any point to itself.
    pub const ZERO: Self = Self(0.0);

    pub(crate) fn from_raw(value: f64) -> Self {
        Self(value)
    }

    /// The raw value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Total order over distances.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
