//! Errors raised while auditing a mesh.
//!
//! Invariant violations are never errors; they are report contents. An error
//! means a check could not be carried out.

#![forbid(unsafe_code)]

use thiserror::Error;

use crate::core::mesh::{TetIndex, VertexIndex};
use crate::geometry::traits::coordinate::CoordinateConversionError;

/// Errors that can occur during mesh validation.
///
/// # Examples
///
/// ```rust
/// use delaunay_audit::geometry::traits::coordinate::CoordinateConversionError;
/// use delaunay_audit::validation::error::ValidationError;
///
/// let err = ValidationError::NumericPredicate {
///     tet: 3,
///     vertex: Some(7),
///     source: CoordinateConversionError::NonFiniteValue {
///         coordinate_index: 0,
///         coordinate_value: "NaN".to_string(),
///     },
/// };
/// assert!(err.to_string().contains("tetrahedron 3"));
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Numeric predicate failure while evaluating a tetrahedron.
    #[error(
        "Numeric predicate failure for tetrahedron {tet} (test vertex {vertex:?}): {source}"
    )]
    NumericPredicate {
        /// The tetrahedron whose predicate was being evaluated.
        tet: TetIndex,
        /// The vertex being classified against its circumsphere, if any.
        vertex: Option<VertexIndex>,
        /// Underlying predicate error.
        #[source]
        source: CoordinateConversionError,
    },
}
