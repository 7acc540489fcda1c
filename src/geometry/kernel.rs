//! Geometric kernel abstraction following CGAL's design.
//!
//! The [`Kernel`] trait is the only door through which the mesh checkers reach
//! geometry. Keeping the predicates behind it lets a fixed-tolerance kernel, an
//! adaptive one, or an exact-arithmetic one be swapped in without touching the
//! checkers.

use core::marker::PhantomData;

use crate::geometry::point::Point;
use crate::geometry::predicates::{
    DEFAULT_RELATIVE_TOLERANCE, InSphere, Orientation, insphere_lifted, simplex_orientation,
};
use crate::geometry::robust_predicates::{
    PredicateConfig, config_presets, robust_insphere, robust_orientation,
};
use crate::geometry::traits::coordinate::{CoordinateConversionError, CoordinateScalar};

/// Geometric kernel trait defining the predicates used by the mesh checkers.
///
/// # Examples
///
/// ```
/// use delaunay_audit::geometry::kernel::{FastKernel, Kernel};
/// use delaunay_audit::geometry::point::Point;
/// use delaunay_audit::geometry::predicates::{InSphere, Orientation};
///
/// let kernel = FastKernel::<f64>::new();
/// let tet = [
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
///     Point::new([0.0, 0.0, 1.0]),
/// ];
/// assert_eq!(kernel.orientation(&tet).unwrap(), Orientation::POSITIVE);
///
/// let test_point = Point::new([0.25, 0.25, 0.25]);
/// assert_eq!(kernel.in_sphere(&tet, &test_point).unwrap(), InSphere::INSIDE);
/// ```
pub trait Kernel: Clone + Send + Sync {
    /// The scalar type used for coordinates.
    type Scalar: CoordinateScalar;

    /// Compute the orientation of a tetrahedron.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateConversionError`] if a coordinate is not finite.
    fn orientation(
        &self,
        points: &[Point<Self::Scalar>; 4],
    ) -> Result<Orientation, CoordinateConversionError>;

    /// Test if a point is inside, on, or outside the circumsphere of a tetrahedron.
    ///
    /// A degenerate tetrahedron yields [`InSphere::BOUNDARY`].
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateConversionError`] if a coordinate is not finite.
    fn in_sphere(
        &self,
        simplex_points: &[Point<Self::Scalar>; 4],
        test_point: &Point<Self::Scalar>,
    ) -> Result<InSphere, CoordinateConversionError>;
}

/// Fast floating-point kernel.
///
/// Evaluates one determinant per decision (the relative lifted 4×4 form for
/// in-sphere) against a relative tolerance, by default
/// [`DEFAULT_RELATIVE_TOLERANCE`]. Use [`RobustKernel`] to cross-check
/// near-degenerate configurations.
#[derive(Clone, Debug)]
pub struct FastKernel<T: CoordinateScalar> {
    tolerance: f64,
    _phantom: PhantomData<T>,
}

impl<T: CoordinateScalar> FastKernel<T> {
    /// Create a new fast kernel with the default relative tolerance.
    ///
    /// # Examples
    ///
    /// ```
    /// use delaunay_audit::geometry::kernel::FastKernel;
    /// use delaunay_audit::geometry::predicates::DEFAULT_RELATIVE_TOLERANCE;
    ///
    /// let kernel = FastKernel::<f32>::new();
    /// assert_eq!(kernel.tolerance(), DEFAULT_RELATIVE_TOLERANCE);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self::with_tolerance(DEFAULT_RELATIVE_TOLERANCE)
    }

    /// Create a fast kernel with an explicit relative tolerance.
    #[must_use]
    pub const fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            _phantom: PhantomData,
        }
    }

    /// Fraction of a determinant's magnitude bound below which it counts as zero.
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl<T: CoordinateScalar> Default for FastKernel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CoordinateScalar> Kernel for FastKernel<T> {
    type Scalar = T;

    fn orientation(
        &self,
        points: &[Point<Self::Scalar>; 4],
    ) -> Result<Orientation, CoordinateConversionError> {
        simplex_orientation(points, self.tolerance)
    }

    fn in_sphere(
        &self,
        simplex_points: &[Point<Self::Scalar>; 4],
        test_point: &Point<Self::Scalar>,
    ) -> Result<InSphere, CoordinateConversionError> {
        insphere_lifted(simplex_points, test_point, self.tolerance)
    }
}

/// Kernel with cross-checked in-sphere evaluation.
///
/// Uses the predicates of [`crate::geometry::robust_predicates`]: the relative
/// and absolute in-sphere determinants are both evaluated, and conflicting
/// decisions are settled by the wider margin over the magnitude bound.
///
/// # Examples
///
/// ```
/// use delaunay_audit::geometry::kernel::{Kernel, RobustKernel};
/// use delaunay_audit::geometry::point::Point;
/// use delaunay_audit::geometry::predicates::InSphere;
/// use delaunay_audit::geometry::robust_predicates::config_presets;
///
/// let kernel = RobustKernel::<f64>::with_config(config_presets::high_precision());
/// let tet = [
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
///     Point::new([0.0, 0.0, 1.0]),
/// ];
/// let test_point = Point::new([0.25, 0.25, 0.25]);
/// assert_eq!(kernel.in_sphere(&tet, &test_point).unwrap(), InSphere::INSIDE);
/// ```
#[derive(Clone, Debug)]
pub struct RobustKernel<T: CoordinateScalar> {
    config: PredicateConfig,
    _phantom: PhantomData<T>,
}

impl<T: CoordinateScalar> RobustKernel<T> {
    /// Create a new robust kernel with the general configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_config(config_presets::general())
    }

    /// Create a robust kernel with a custom configuration.
    #[must_use]
    pub const fn with_config(config: PredicateConfig) -> Self {
        Self {
            config,
            _phantom: PhantomData,
        }
    }

    /// The predicate configuration in use.
    #[must_use]
    pub const fn config(&self) -> &PredicateConfig {
        &self.config
    }
}

impl<T: CoordinateScalar> Default for RobustKernel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CoordinateScalar> Kernel for RobustKernel<T> {
    type Scalar = T;

    fn orientation(
        &self,
        points: &[Point<Self::Scalar>; 4],
    ) -> Result<Orientation, CoordinateConversionError> {
        robust_orientation(points, &self.config)
    }

    fn in_sphere(
        &self,
        simplex_points: &[Point<Self::Scalar>; 4],
        test_point: &Point<Self::Scalar>,
    ) -> Result<InSphere, CoordinateConversionError> {
        robust_insphere(simplex_points, test_point, &self.config)
    }
}
