//! Labeled points and the validated collection the engine clusters.

use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

use crate::error::PointSetError;

/// A labeled point in `d`-dimensional space.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    id: Arc<str>,
    coordinates: Vec<f64>,
}

impl Point {
    /// Creates a point. Validation happens when the point joins a
    /// [`PointSet`].
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>, coordinates: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            coordinates,
        }
    }

    /// Returns the point identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn shared_id(&self) -> Arc<str> {
        Arc::clone(&self.id)
    }

    /// Returns the coordinates in input order.
    #[must_use]
    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }

    /// Returns the number of coordinates.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.coordinates.len()
    }
}

/// Ordered collection of points with unique identifiers, a shared positive
/// dimension and finite coordinates.
///
/// Insertion order is significant: it fixes the point indices used by the
/// [`crate::DistanceMatrix`] and therefore the order in which equal distances
/// are considered.
///
/// # Examples
/// ```
/// use hcsolver_core::{Point, PointSet};
///
/// let points = PointSet::try_new(vec![
///     Point::new("A", vec![0.0, 0.0]),
///     Point::new("B", vec![1.0, 0.0]),
/// ])
/// .expect("points are valid");
/// assert_eq!(points.len(), 2);
/// assert_eq!(points.dimension(), 2);
/// assert_eq!(points.index_of("B"), Some(1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PointSet {
    points: Vec<Point>,
    dimension: usize,
    index: HashMap<Arc<str>, usize>,
}

impl PointSet {
    /// Validates `points` and builds the set.
    ///
    /// An empty vector is accepted and yields an empty set with dimension `0`.
    ///
    /// # Errors
    /// Returns [`PointSetError::EmptyIdentifier`] for blank identifiers,
    /// [`PointSetError::DuplicateIdentifier`] when an identifier repeats,
    /// [`PointSetError::ZeroDimension`] when a point has no coordinates,
    /// [`PointSetError::DimensionMismatch`] when a point's dimension differs
    /// from the first point's, and [`PointSetError::NonFinite`] for NaN or
    /// infinite coordinates.
    pub fn try_new(points: Vec<Point>) -> Result<Self, PointSetError> {
        let dimension = points.first().map_or(0, Point::dimension);
        let mut index = HashMap::with_capacity(points.len());

        for (position, point) in points.iter().enumerate() {
            validate_point(point, position, dimension)?;
            match index.entry(point.shared_id()) {
                Entry::Occupied(_) => {
                    return Err(PointSetError::DuplicateIdentifier {
                        id: point.shared_id(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
            }
        }

        Ok(Self {
            points,
            dimension,
            index,
        })
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns whether the set holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the shared dimension, or `0` for an empty set.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the point at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    /// Returns the index of the point labeled `id`.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Iterates over the points in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Point> {
        self.points.iter()
    }

    /// Returns the identifiers in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<Arc<str>> {
        self.points.iter().map(Point::shared_id).collect()
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

fn validate_point(point: &Point, position: usize, dimension: usize) -> Result<(), PointSetError> {
    if point.id().trim().is_empty() {
        return Err(PointSetError::EmptyIdentifier { position });
    }
    if point.dimension() == 0 {
        return Err(PointSetError::ZeroDimension {
            id: point.shared_id(),
        });
    }
    if point.dimension() != dimension {
        return Err(PointSetError::DimensionMismatch {
            id: point.shared_id(),
            expected: dimension,
            actual: point.dimension(),
        });
    }
    if let Some((index, value)) = point
        .coordinates()
        .iter()
        .copied()
        .enumerate()
        .find(|(_, value)| !value.is_finite())
    {
        return Err(PointSetError::NonFinite {
            id: point.shared_id(),
            index,
            value,
        });
    }
    Ok(())
}
