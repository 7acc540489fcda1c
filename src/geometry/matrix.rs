//! Matrix operations.
//!
//! This module provides small, stack-allocated linear algebra helpers used by
//! geometric predicates. All predicate matrices are built in `f64` on top of
//! `nalgebra`'s fixed-size matrices:
//! - orientation: 3×3 (edge vectors relative to the first vertex)
//! - lifted in-sphere: 4×4 (relative form) or 5×5 (absolute form)

#![forbid(unsafe_code)]

use nalgebra::SMatrix;

/// Fixed-size `f64` matrix used by the predicates.
pub type Matrix<const R: usize, const C: usize> = SMatrix<f64, R, C>;

/// 3×3 orientation matrix.
pub type Matrix3 = Matrix<3, 3>;

/// 4×4 relative lifted in-sphere matrix.
pub type Matrix4 = Matrix<4, 4>;

/// 5×5 absolute lifted in-sphere matrix.
pub type Matrix5 = Matrix<5, 5>;

/// Determinant of a 3×3 matrix.
///
/// # Examples
///
/// ```rust
/// use delaunay_audit::geometry::matrix::{Matrix3, determinant3};
///
/// assert_eq!(determinant3(&Matrix3::identity()), 1.0);
/// ```
#[inline]
#[must_use]
pub fn determinant3(m: &Matrix3) -> f64 {
    m.determinant()
}

/// Determinant of a 4×4 matrix (LU based).
#[inline]
#[must_use]
pub fn determinant4(m: &Matrix4) -> f64 {
    m.determinant()
}

/// Determinant of a 5×5 matrix (LU based).
#[inline]
#[must_use]
pub fn determinant5(m: &Matrix5) -> f64 {
    m.determinant()
}

/// Magnitude bound of a determinant: the permanent of `|A|`.
///
/// Every term of the Leibniz expansion of `det(A)` is bounded by the matching
/// term of this sum, so floating-point error in the determinant is proportional
/// to it. The bound is homogeneous of the same degree as the determinant under
/// uniform scaling of the input points.
///
/// # Examples
///
/// ```rust
/// use delaunay_audit::geometry::matrix::{Matrix3, permanent_bound};
///
/// assert_eq!(permanent_bound(&(Matrix3::identity() * 2.0)), 8.0);
/// assert_eq!(permanent_bound(&Matrix3::repeat(-1.0)), 6.0);
/// ```
#[must_use]
pub fn permanent_bound<const N: usize>(matrix: &Matrix<N, N>) -> f64 {
    fn expand<const M: usize>(matrix: &Matrix<M, M>, row: usize, used: u32) -> f64 {
        if row == M {
            return 1.0;
        }
        (0..M)
            .filter(|&col| used & (1 << col) == 0 && matrix[(row, col)] != 0.0)
            .map(|col| matrix[(row, col)].abs() * expand(matrix, row + 1, used | (1 << col)))
            .sum()
    }
    expand(matrix, 0, 0)
}

/// Rescale the spatial columns `0..3` of a predicate matrix to unit magnitude.
///
/// Spatial columns are divided by their largest absolute entry `s` and the
/// lifted column, if any, by `s²`. The determinant is divided by a positive
/// power of `s` and keeps its sign; the ratio of the determinant to its
/// [`permanent_bound`] is unchanged. Keeps determinants of tiny or huge meshes
/// away from underflow and overflow. Returns the matrix and `s`.
#[must_use]
pub fn normalize_spatial_scale<const N: usize>(
    mut matrix: Matrix<N, N>,
    lifted_column: Option<usize>,
) -> (Matrix<N, N>, f64) {
    let mut scale = 0.0_f64;
    for r in 0..N {
        for c in 0..3 {
            scale = scale.max(matrix[(r, c)].abs());
        }
    }
    if scale <= 0.0 || !scale.is_finite() {
        return (matrix, 1.0);
    }
    for r in 0..N {
        for c in 0..3 {
            matrix[(r, c)] /= scale;
        }
        if let Some(lifted) = lifted_column {
            matrix[(r, lifted)] /= scale * scale;
        }
    }
    (matrix, scale)
}
