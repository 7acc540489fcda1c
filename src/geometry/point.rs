//! Three-dimensional points of the input point table.
//!
//! A [`Point`] is identified by its position in the mesh's point table; the
//! struct itself only carries coordinates. Points are immutable once created.

#![forbid(unsafe_code)]

use crate::geometry::traits::coordinate::{
    CoordinateConversionError, CoordinateScalar, safe_coords_to_f64,
};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// A point in 3D space with coordinates of scalar type `T`.
///
/// Coordinates are private so that a point cannot change after it has been
/// placed in a mesh.
///
/// # Examples
///
/// ```rust
/// use delaunay_audit::geometry::point::Point;
///
/// let p = Point::new([1.0, 2.0, 3.0]);
/// assert_eq!(p.coords(), &[1.0, 2.0, 3.0]);
/// assert_eq!(p[2], 3.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent, bound = "T: CoordinateScalar")]
pub struct Point<T>
where
    T: CoordinateScalar,
{
    coords: [T; 3],
}

impl<T> Point<T>
where
    T: CoordinateScalar,
{
    /// Create a point from its three coordinates.
    #[inline]
    #[must_use]
    pub const fn new(coords: [T; 3]) -> Self {
        Self { coords }
    }

    /// Returns a reference to the coordinate array.
    #[inline]
    #[must_use]
    pub const fn coords(&self) -> &[T; 3] {
        &self.coords
    }

    /// Returns `true` if every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|c| c.is_finite())
    }

    /// Convert the coordinates to `f64` for predicate evaluation.
    ///
    /// # Errors
    ///
    /// Returns a [`CoordinateConversionError`] if a coordinate is not finite.
    pub fn to_f64(&self) -> Result<[f64; 3], CoordinateConversionError> {
        safe_coords_to_f64(self.coords)
    }
}

impl<T> Index<usize> for Point<T>
where
    T: CoordinateScalar,
{
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.coords[index]
    }
}

impl<T> From<[T; 3]> for Point<T>
where
    T: CoordinateScalar,
{
    fn from(coords: [T; 3]) -> Self {
        Self::new(coords)
    }
}

impl<T> From<Point<T>> for [T; 3]
where
    T: CoordinateScalar,
{
    fn from(point: Point<T>) -> Self {
        point.coords
    }
}
