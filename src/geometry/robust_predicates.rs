//! Geometric predicates with cross-checked in-sphere evaluation.
//!
//! The plain predicates in [`crate::geometry::predicates`] evaluate one
//! determinant per decision. The predicates here evaluate the in-sphere test in
//! both its relative 4×4 and absolute 5×5 forms and, when the two are decisive
//! but disagree, keep the one whose determinant clears its magnitude bound by
//! the wider relative margin.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::predicates::{
    DEFAULT_RELATIVE_TOLERANCE, InSphere, Orientation, absolute_insphere_determinant,
    insphere_from_determinant, lifted_insphere_determinant, orientation_determinant,
    orientation_from_determinant, tetrahedron_coords,
};
use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::{CoordinateConversionError, CoordinateScalar};

/// Tolerance configuration for geometric predicates.
///
/// The tolerance is relative to the magnitude bound of each determinant, so a
/// single configuration is valid for meshes of any scale and for both `f32` and
/// `f64` coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredicateConfig {
    /// Determinants within this fraction of their magnitude bound count as zero
    pub relative_tolerance: f64,
    /// Use cross-checked predicates ([`crate::geometry::kernel::RobustKernel`])
    /// instead of the single-evaluation ones
    pub adaptive: bool,
}

impl Default for PredicateConfig {
    fn default() -> Self {
        config_presets::general()
    }
}

/// Factory functions for predicate configurations suited to different inputs.
pub mod config_presets {
    use super::{DEFAULT_RELATIVE_TOLERANCE, PredicateConfig};

    /// Configuration for general-purpose auditing.
    #[must_use]
    pub const fn general() -> PredicateConfig {
        PredicateConfig {
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE,
            adaptive: true,
        }
    }

    /// Configuration for high-precision auditing (stricter tolerances).
    #[must_use]
    pub const fn high_precision() -> PredicateConfig {
        PredicateConfig {
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE / 64.0,
            adaptive: true,
        }
    }

    /// Configuration for nearly degenerate input (more lenient tolerances).
    ///
    /// Slivers whose volume is below about `1e-8` of their magnitude bound are
    /// treated as flat.
    #[must_use]
    pub const fn degenerate_robust() -> PredicateConfig {
        PredicateConfig {
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE * 1.0e4,
            adaptive: true,
        }
    }

    /// Single-evaluation configuration ([`crate::geometry::kernel::FastKernel`]).
    #[must_use]
    pub const fn fast() -> PredicateConfig {
        PredicateConfig {
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE,
            adaptive: false,
        }
    }
}

/// Orientation predicate with a relative tolerance.
///
/// # Errors
///
/// Returns a [`CoordinateConversionError`] if any coordinate is not finite.
pub fn robust_orientation<T: CoordinateScalar>(
    simplex_points: &[Point<T>; 4],
    config: &PredicateConfig,
) -> Result<Orientation, CoordinateConversionError> {
    let coords = tetrahedron_coords(simplex_points)?;
    let (det, bound) = orientation_determinant(&coords);
    Ok(orientation_from_determinant(det, bound, config.relative_tolerance))
}

/// In-sphere predicate with a consistency check.
///
/// 1. Evaluate the relative lifted 4×4 determinant against its magnitude bound.
/// 2. Evaluate the absolute 5×5 determinant the same way.
/// 3. If both are decisive and disagree, keep the evaluation with the larger
///    `|det| / bound`.
///
/// # Errors
///
/// Returns a [`CoordinateConversionError`] if any coordinate is not finite.
pub fn robust_insphere<T: CoordinateScalar>(
    simplex_points: &[Point<T>; 4],
    test_point: &Point<T>,
    config: &PredicateConfig,
) -> Result<InSphere, CoordinateConversionError> {
    let orientation = robust_orientation(simplex_points, config)?;
    if orientation == Orientation::DEGENERATE {
        return Ok(InSphere::BOUNDARY);
    }

    let coords = tetrahedron_coords(simplex_points)?;
    let q = test_point.to_f64()?;
    let tolerance = config.relative_tolerance;

    let (lifted_det, lifted_bound) = lifted_insphere_determinant(&coords, &q);
    let primary = insphere_from_determinant(lifted_det, lifted_bound, orientation, tolerance);

    let (absolute_det, absolute_bound) = absolute_insphere_determinant(&coords, &q);
    let secondary =
        insphere_from_determinant(absolute_det, absolute_bound, orientation, tolerance);

    let conflicting = matches!(
        (primary, secondary),
        (InSphere::INSIDE, InSphere::OUTSIDE) | (InSphere::OUTSIDE, InSphere::INSIDE)
    );
    if !conflicting {
        return Ok(primary);
    }

    let lifted_margin = relative_margin(lifted_det, lifted_bound);
    let absolute_margin = relative_margin(absolute_det, absolute_bound);
    debug!(
        primary = %primary,
        secondary = %secondary,
        lifted_margin,
        absolute_margin,
        "lifted and absolute in-sphere determinants disagree; keeping the wider margin"
    );
    Ok(if absolute_margin > lifted_margin {
        secondary
    } else {
        primary
    })
}

fn relative_margin(det: f64, bound: f64) -> f64 {
    if bound > 0.0 { det.abs() / bound } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn unit_tet() -> [Point<f64>; 4] {
        [
            Point::new([0.0, 0.0, 0.0]),
            Point::new([1.0, 0.0, 0.0]),
            Point::new([0.0, 1.0, 0.0]),
            Point::new([0.0, 0.0, 1.0]),
        ]
    }

    #[test]
    fn robust_insphere_general() {
        let config = config_presets::general();
        let inside = Point::new([0.25, 0.25, 0.25]);
        let outside = Point::new([2.0, 2.0, 2.0]);
        assert_eq!(
            robust_insphere(&unit_tet(), &inside, &config).unwrap(),
            InSphere::INSIDE
        );
        assert_eq!(
            robust_insphere(&unit_tet(), &outside, &config).unwrap(),
            InSphere::OUTSIDE
        );
    }

    #[test]
    fn robust_orientation_matches_plain_sign() {
        let config = config_presets::general();
        let tet = unit_tet();
        assert_eq!(
            robust_orientation(&tet, &config).unwrap(),
            Orientation::POSITIVE
        );
        let swapped = [tet[0], tet[1], tet[3], tet[2]];
        assert_eq!(
            robust_orientation(&swapped, &config).unwrap(),
            Orientation::NEGATIVE
        );
    }

    #[test]
    fn translated_far_from_origin_keeps_classification() {
        let config = config_presets::general();
        let offset = 1.0e6;
        let tet = unit_tet().map(|p| {
            let c = p.coords();
            Point::new([c[0] + offset, c[1] + offset, c[2] + offset])
        });
        let inside = Point::new([0.25 + offset, 0.25 + offset, 0.25 + offset]);
        assert_eq!(
            robust_insphere(&tet, &inside, &config).unwrap(),
            InSphere::INSIDE
        );
    }

    #[test]
    fn small_single_precision_mesh_keeps_classification() {
        let config = PredicateConfig::default();
        let s = 0.01_f32;
        let tet = unit_tet().map(|p| {
            let c = p.coords();
            Point::new([c[0] as f32 * s, c[1] as f32 * s, c[2] as f32 * s])
        });
        assert_eq!(
            robust_orientation(&tet, &config).unwrap(),
            Orientation::POSITIVE
        );
        let inside = Point::new([0.25 * s, 0.25 * s, 0.25 * s]);
        assert_eq!(
            robust_insphere(&tet, &inside, &config).unwrap(),
            InSphere::INSIDE
        );
    }

    #[test]
    fn sliver_is_degenerate_only_under_lenient_config() {
        // Fourth vertex 1e-10 above the plane x + y + z = 1 through the others
        let third = 1.0 / 3.0;
        let tet = [
            Point::new([1.0, 0.0, 0.0]),
            Point::new([0.0, 1.0, 0.0]),
            Point::new([0.0, 0.0, 1.0]),
            Point::new([third, third, third + 1e-10]),
        ];
        assert_eq!(
            robust_orientation(&tet, &config_presets::general()).unwrap(),
            Orientation::POSITIVE
        );
        let lenient = config_presets::degenerate_robust();
        assert_eq!(
            robust_orientation(&tet, &lenient).unwrap(),
            Orientation::DEGENERATE
        );
        let q = Point::new([0.3, 0.3, 0.3]);
        assert_eq!(
            robust_insphere(&tet, &q, &lenient).unwrap(),
            InSphere::BOUNDARY
        );
    }

    #[test]
    fn relative_margin_of_empty_bound_is_zero() {
        assert_relative_eq!(relative_margin(0.0, 0.0), 0.0);
        assert_relative_eq!(relative_margin(-2.0, 8.0), 0.25);
    }

    #[test]
    fn presets_order_tolerances() {
        let general = config_presets::general();
        let strict = config_presets::high_precision();
        let lenient = config_presets::degenerate_robust();
        assert!(strict.relative_tolerance < general.relative_tolerance);
        assert!(lenient.relative_tolerance > general.relative_tolerance);
        assert!(strict.relative_tolerance > 16.0 * f64::EPSILON);
        assert!(!config_presets::fast().adaptive);
        assert_eq!(PredicateConfig::default(), general);
    }
}
