//! Coordinate scalar abstraction for mesh points and geometric predicates.
//!
//! Meshes handed over by a triangulation engine are stored either in single or
//! double precision. [`CoordinateScalar`] collects everything the checkers need
//! from such a scalar: floating-point arithmetic, serialization and a name for
//! the precision used in summaries.
//!
//! All predicates evaluate their determinants in `f64`; values are widened with
//! [`safe_coords_to_f64`], which rejects non-finite input instead of silently
//! propagating NaN into a sign test. Widening `f32` is exact, so predicate
//! tolerances do not depend on the coordinate scalar.
//!
//! # Examples
//!
//! ```rust
//! use delaunay_audit::geometry::traits::coordinate::{CoordinateScalar, safe_coords_to_f64};
//!
//! assert_eq!(f32::precision_name(), "Single");
//! assert_eq!(f64::precision_name(), "Double");
//!
//! let coords = safe_coords_to_f64([1.0_f32, 2.0, 3.0]).unwrap();
//! assert_eq!(coords, [1.0, 2.0, 3.0]);
//! assert!(safe_coords_to_f64([f64::NAN, 0.0, 0.0]).is_err());
//! ```

use num_traits::{Float, cast};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::{Debug, Display};

/// Errors that can occur during coordinate conversion in geometric predicates.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoordinateConversionError {
    /// Coordinate conversion failed.
    #[error(
        "Failed to convert coordinate at index {coordinate_index} from {from_type} to {to_type}: {coordinate_value}"
    )]
    ConversionFailed {
        /// Index of the coordinate that failed to convert
        coordinate_index: usize,
        /// String representation of the problematic coordinate value
        coordinate_value: String,
        /// Source type name
        from_type: &'static str,
        /// Target type name
        to_type: &'static str,
    },
    /// Non-finite value (NaN or infinity) encountered during coordinate conversion
    #[error(
        "Non-finite value (NaN or infinity) at coordinate index {coordinate_index}: {coordinate_value}"
    )]
    NonFiniteValue {
        /// Index of the coordinate that contains the non-finite value
        coordinate_index: usize,
        /// String representation of the non-finite coordinate value
        coordinate_value: String,
    },
}

/// Scalar type usable as a mesh coordinate.
///
/// Implemented for `f32` and `f64`, the two precisions a triangulation engine
/// commonly produces.
///
/// ```
/// use delaunay_audit::geometry::traits::coordinate::CoordinateScalar;
///
/// fn describe<T: CoordinateScalar>(value: T) -> String {
///     format!("{value} ({})", T::precision_name())
/// }
/// assert_eq!(describe(0.5_f32), "0.5 (Single)");
/// ```
pub trait CoordinateScalar:
    Float + Default + Debug + Display + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Human-readable precision name (`"Single"` or `"Double"`).
    fn precision_name() -> &'static str;
}

impl CoordinateScalar for f32 {
    fn precision_name() -> &'static str {
        "Single"
    }
}

impl CoordinateScalar for f64 {
    fn precision_name() -> &'static str {
        "Double"
    }
}

fn safe_cast_to_f64<T: CoordinateScalar>(
    value: T,
    coordinate_index: usize,
) -> Result<f64, CoordinateConversionError> {
    if !value.is_finite() {
        return Err(CoordinateConversionError::NonFiniteValue {
            coordinate_index,
            coordinate_value: format!("{value:?}"),
        });
    }

    cast(value).ok_or_else(|| CoordinateConversionError::ConversionFailed {
        coordinate_index,
        coordinate_value: format!("{value:?}"),
        from_type: std::any::type_name::<T>(),
        to_type: "f64",
    })
}

/// Safely convert a coordinate triple to `f64`.
///
/// # Errors
///
/// Returns a [`CoordinateConversionError`] naming the first offending coordinate.
pub fn safe_coords_to_f64<T: CoordinateScalar>(
    coords: [T; 3],
) -> Result<[f64; 3], CoordinateConversionError> {
    let mut result = [0.0_f64; 3];
    for (i, &coord) in coords.iter().enumerate() {
        result[i] = safe_cast_to_f64(coord, i)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_names() {
        assert_eq!(f32::precision_name(), "Single");
        assert_eq!(f64::precision_name(), "Double");
    }

    #[test]
    fn safe_coords_to_f64_reports_offending_index() {
        let err = safe_coords_to_f64([0.0_f64, f64::INFINITY, 1.0]).unwrap_err();
        assert_eq!(
            err,
            CoordinateConversionError::NonFiniteValue {
                coordinate_index: 1,
                coordinate_value: "inf".to_string(),
            }
        );
        assert!(err.to_string().contains("Non-finite value"));
    }

    #[test]
    fn f32_coordinates_widen_exactly() {
        let widened = safe_coords_to_f64([0.1_f32, 0.05, 1e-30]).unwrap();
        assert_eq!(
            widened,
            [f64::from(0.1_f32), f64::from(0.05_f32), f64::from(1e-30_f32)]
        );
    }
}
