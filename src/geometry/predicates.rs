//! Geometric predicates for tetrahedra.
//!
//! This module contains the two predicates every mesh check is built on:
//! the orientation of a tetrahedron and the position of a point relative to the
//! circumsphere of a tetrahedron. Both are evaluated as determinant signs in
//! `f64`. Tolerances are relative: a determinant whose magnitude does not
//! exceed `tolerance × permanent_bound` of its matrix is classified as
//! degenerate or on the boundary. The bound has the same degree as the
//! determinant (3 for orientation, 5 for in-sphere), so classification does not
//! depend on the scale of the mesh.

#![forbid(unsafe_code)]

use crate::geometry::matrix::{
    Matrix3, Matrix4, Matrix5, determinant3, determinant4, determinant5,
    normalize_spatial_scale, permanent_bound,
};
use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::{CoordinateConversionError, CoordinateScalar};

/// Default relative tolerance: a few thousand `f64` ulps of the magnitude bound.
///
/// Coordinates of both `f32` and `f64` meshes are widened exactly to `f64`, so
/// one tolerance serves every scalar.
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 4096.0 * f64::EPSILON;

/// Represents the position of a point relative to a circumsphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InSphere {
    /// The point is outside the circumsphere
    OUTSIDE,
    /// The point is on the boundary of the circumsphere (within numerical tolerance)
    BOUNDARY,
    /// The point is inside the circumsphere
    INSIDE,
}

impl std::fmt::Display for InSphere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OUTSIDE => write!(f, "OUTSIDE"),
            Self::BOUNDARY => write!(f, "BOUNDARY"),
            Self::INSIDE => write!(f, "INSIDE"),
        }
    }
}

/// Represents the orientation of a tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The tetrahedron has negative orientation
    NEGATIVE,
    /// The four vertices are coplanar (within numerical tolerance)
    DEGENERATE,
    /// The tetrahedron has positive orientation
    POSITIVE,
}

impl Orientation {
    /// Sign of the orientation as `-1.0`, `0.0` or `1.0`.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::NEGATIVE => -1.0,
            Self::DEGENERATE => 0.0,
            Self::POSITIVE => 1.0,
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NEGATIVE => write!(f, "NEGATIVE"),
            Self::DEGENERATE => write!(f, "DEGENERATE"),
            Self::POSITIVE => write!(f, "POSITIVE"),
        }
    }
}

/// Convert the four vertices of a tetrahedron to `f64` coordinates.
///
/// # Errors
///
/// Returns a [`CoordinateConversionError`] if any coordinate is not finite.
pub fn tetrahedron_coords<T: CoordinateScalar>(
    points: &[Point<T>; 4],
) -> Result<[[f64; 3]; 4], CoordinateConversionError> {
    Ok([
        points[0].to_f64()?,
        points[1].to_f64()?,
        points[2].to_f64()?,
        points[3].to_f64()?,
    ])
}

/// Build the 3×3 orientation matrix with rows `b − a`, `c − a`, `d − a`.
///
/// Its determinant equals `(b − a) · ((c − a) × (d − a))`, six times the
/// signed volume of the tetrahedron.
#[must_use]
pub fn orientation_matrix(coords: &[[f64; 3]; 4]) -> Matrix3 {
    let [a, b, c, d] = coords;
    Matrix3::from_fn(|r, col| {
        let p = match r {
            0 => b,
            1 => c,
            _ => d,
        };
        p[col] - a[col]
    })
}

/// Build the relative lifted 4×4 in-sphere matrix.
///
/// Rows are `(p − a, |p − a|²)` for `p` in `b`, `c`, `d` and the test point.
#[must_use]
pub fn lifted_insphere_matrix(coords: &[[f64; 3]; 4], test_point: &[f64; 3]) -> Matrix4 {
    let [a, b, c, d] = coords;
    let rows = [b, c, d, test_point];
    let mut m = Matrix4::zeros();
    for (r, p) in rows.iter().enumerate() {
        let rel = [p[0] - a[0], p[1] - a[1], p[2] - a[2]];
        m[(r, 0)] = rel[0];
        m[(r, 1)] = rel[1];
        m[(r, 2)] = rel[2];
        m[(r, 3)] = rel[2].mul_add(rel[2], rel[0].mul_add(rel[0], rel[1] * rel[1]));
    }
    m
}

/// Build the absolute lifted 5×5 in-sphere matrix.
///
/// ```text
/// | ax  ay  az  |a|²  1 |
/// | bx  by  bz  |b|²  1 |
/// | cx  cy  cz  |c|²  1 |
/// | dx  dy  dz  |d|²  1 |
/// | qx  qy  qz  |q|²  1 |
/// ```
///
/// Its determinant equals the determinant of [`lifted_insphere_matrix`].
#[must_use]
pub fn absolute_insphere_matrix(coords: &[[f64; 3]; 4], test_point: &[f64; 3]) -> Matrix5 {
    let rows = [&coords[0], &coords[1], &coords[2], &coords[3], test_point];
    let mut m = Matrix5::zeros();
    for (r, p) in rows.iter().enumerate() {
        m[(r, 0)] = p[0];
        m[(r, 1)] = p[1];
        m[(r, 2)] = p[2];
        m[(r, 3)] = p[2].mul_add(p[2], p[0].mul_add(p[0], p[1] * p[1]));
        m[(r, 4)] = 1.0;
    }
    m
}

/// Orientation determinant of a tetrahedron and its magnitude bound.
///
/// Both are taken from the scale-normalized orientation matrix.
#[must_use]
pub fn orientation_determinant(coords: &[[f64; 3]; 4]) -> (f64, f64) {
    let (m, _) = normalize_spatial_scale(orientation_matrix(coords), None);
    (determinant3(&m), permanent_bound(&m))
}

/// Relative lifted in-sphere determinant and its magnitude bound.
#[must_use]
pub fn lifted_insphere_determinant(coords: &[[f64; 3]; 4], test_point: &[f64; 3]) -> (f64, f64) {
    let (m, _) = normalize_spatial_scale(lifted_insphere_matrix(coords, test_point), Some(3));
    (determinant4(&m), permanent_bound(&m))
}

/// Absolute lifted in-sphere determinant and its magnitude bound.
#[must_use]
pub fn absolute_insphere_determinant(
    coords: &[[f64; 3]; 4],
    test_point: &[f64; 3],
) -> (f64, f64) {
    let (m, _) = normalize_spatial_scale(absolute_insphere_matrix(coords, test_point), Some(3));
    (determinant5(&m), permanent_bound(&m))
}

/// Classify an orientation determinant against `tolerance × bound`.
#[must_use]
pub fn orientation_from_determinant(det: f64, bound: f64, tolerance: f64) -> Orientation {
    let threshold = tolerance * bound;
    if det > threshold {
        Orientation::POSITIVE
    } else if det < -threshold {
        Orientation::NEGATIVE
    } else {
        Orientation::DEGENERATE
    }
}

/// Classify a lifted in-sphere determinant, normalized by the orientation of
/// the tetrahedron, against `tolerance × bound`.
///
/// For a positively oriented tetrahedron a negative lifted determinant means
/// the point lies inside the circumsphere; the sign flips for negative
/// orientation. A degenerate tetrahedron has no circumsphere and always yields
/// [`InSphere::BOUNDARY`].
#[must_use]
pub fn insphere_from_determinant(
    det: f64,
    bound: f64,
    orientation: Orientation,
    tolerance: f64,
) -> InSphere {
    let normalized = det * orientation.sign();
    let threshold = tolerance * bound;
    if orientation == Orientation::DEGENERATE {
        InSphere::BOUNDARY
    } else if normalized < -threshold {
        InSphere::INSIDE
    } else if normalized > threshold {
        InSphere::OUTSIDE
    } else {
        InSphere::BOUNDARY
    }
}

/// Determine the orientation of a tetrahedron.
///
/// The orientation is the sign of `(v1 − v0) · ((v2 − v0) × (v3 − v0))`;
/// determinants within the relative `tolerance` of their magnitude bound are
/// [`Orientation::DEGENERATE`].
///
/// # Errors
///
/// Returns a [`CoordinateConversionError`] if any coordinate is not finite.
///
/// # Example
///
/// ```
/// use delaunay_audit::geometry::point::Point;
/// use delaunay_audit::geometry::predicates::{
///     DEFAULT_RELATIVE_TOLERANCE, Orientation, simplex_orientation,
/// };
///
/// let tet = [
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1e-4, 0.0, 0.0]),
///     Point::new([0.0, 1e-4, 0.0]),
///     Point::new([0.0, 0.0, 1e-4]),
/// ];
/// let tol = DEFAULT_RELATIVE_TOLERANCE;
/// assert_eq!(simplex_orientation(&tet, tol).unwrap(), Orientation::POSITIVE);
///
/// let swapped = [tet[1], tet[0], tet[2], tet[3]];
/// assert_eq!(simplex_orientation(&swapped, tol).unwrap(), Orientation::NEGATIVE);
/// ```
pub fn simplex_orientation<T: CoordinateScalar>(
    points: &[Point<T>; 4],
    tolerance: f64,
) -> Result<Orientation, CoordinateConversionError> {
    let coords = tetrahedron_coords(points)?;
    let (det, bound) = orientation_determinant(&coords);
    Ok(orientation_from_determinant(det, bound, tolerance))
}

/// Test the position of a point relative to the circumsphere of a tetrahedron
/// using the absolute lifted 5×5 determinant.
///
/// # Errors
///
/// Returns a [`CoordinateConversionError`] if any coordinate is not finite.
///
/// # Example
///
/// ```
/// use delaunay_audit::geometry::point::Point;
/// use delaunay_audit::geometry::predicates::{DEFAULT_RELATIVE_TOLERANCE, InSphere, insphere};
///
/// let tet = [
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
///     Point::new([0.0, 0.0, 1.0]),
/// ];
/// let inside = Point::new([0.25, 0.25, 0.25]);
/// let outside = Point::new([2.0, 2.0, 2.0]);
/// let tol = DEFAULT_RELATIVE_TOLERANCE;
/// assert_eq!(insphere(&tet, &inside, tol).unwrap(), InSphere::INSIDE);
/// assert_eq!(insphere(&tet, &outside, tol).unwrap(), InSphere::OUTSIDE);
/// ```
pub fn insphere<T: CoordinateScalar>(
    simplex_points: &[Point<T>; 4],
    test_point: &Point<T>,
    tolerance: f64,
) -> Result<InSphere, CoordinateConversionError> {
    let coords = tetrahedron_coords(simplex_points)?;
    let q = test_point.to_f64()?;
    let (orient_det, orient_bound) = orientation_determinant(&coords);
    let orientation = orientation_from_determinant(orient_det, orient_bound, tolerance);
    let (det, bound) = absolute_insphere_determinant(&coords, &q);
    Ok(insphere_from_determinant(det, bound, orientation, tolerance))
}

/// Test the position of a point relative to the circumsphere of a tetrahedron
/// using the relative lifted 4×4 determinant.
///
/// Translating every row by the first vertex keeps the matrix entries small
/// for meshes far from the origin, which makes this form better conditioned
/// than [`insphere`].
///
/// # Errors
///
/// Returns a [`CoordinateConversionError`] if any coordinate is not finite.
pub fn insphere_lifted<T: CoordinateScalar>(
    simplex_points: &[Point<T>; 4],
    test_point: &Point<T>,
    tolerance: f64,
) -> Result<InSphere, CoordinateConversionError> {
    let coords = tetrahedron_coords(simplex_points)?;
    let q = test_point.to_f64()?;
    let (orient_det, orient_bound) = orientation_determinant(&coords);
    let orientation = orientation_from_determinant(orient_det, orient_bound, tolerance);
    let (det, bound) = lifted_insphere_determinant(&coords, &q);
    Ok(insphere_from_determinant(det, bound, orientation, tolerance))
}
