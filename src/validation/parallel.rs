//! Per-tetrahedron execution helper shared by the geometric checkers.
//!
//! With the `parallel` feature the closure runs on rayon's pool; otherwise it
//! runs serially. Results are collected in tetrahedron order either way, so
//! reports do not depend on the feature.

use crate::core::mesh::{Mesh, TetIndex, Tetrahedron};
use crate::geometry::traits::coordinate::CoordinateScalar;
use crate::validation::error::ValidationError;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Apply `func(index, tet)` to every tetrahedron, stopping at the first error.
///
/// # Errors
///
/// Returns the first [`ValidationError`] produced by `func` (the lowest-index
/// one in serial mode; any one in parallel mode).
pub fn try_map_tetrahedra<T, R, F>(mesh: &Mesh<T>, func: F) -> Result<Vec<R>, ValidationError>
where
    T: CoordinateScalar,
    R: Send,
    F: Fn(TetIndex, &Tetrahedron) -> Result<R, ValidationError> + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        mesh.tetrahedra()
            .par_iter()
            .enumerate()
            .map(|(i, tet)| func(i, tet))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        mesh.tetrahedra()
            .iter()
            .enumerate()
            .map(|(i, tet)| func(i, tet))
            .collect()
    }
}
