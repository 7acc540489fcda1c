//! Seeded point-set generation for named input distributions.
//!
//! Produces the point tables fed to a triangulator in tests, benchmarks and the
//! demo. Every distribution is centered in the unit cube `[0, 1]³` and is fully
//! determined by `(count, distribution, seed)`.

use num_traits::cast;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution as _, StandardNormal, UnitBall, UnitSphere};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::point::Point;
use crate::geometry::traits::coordinate::CoordinateScalar;

/// Radius of the sphere used by [`Distribution::Sphere`] and [`Distribution::ThinSphere`].
pub const SPHERE_RADIUS: f64 = 0.45;

/// Relative shell thickness of [`Distribution::ThinSphere`].
pub const THIN_SPHERE_THICKNESS: f64 = 0.01;

/// Standard deviation of [`Distribution::Gaussian`] around the cube center.
pub const GAUSSIAN_SIGMA: f64 = 0.1;

/// Errors that can occur while generating a point set.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PointGenerationError {
    /// The requested number of points is not usable.
    #[error("Invalid point count: {n_points}")]
    InvalidPointCount {
        /// The requested number of points
        n_points: usize,
    },
    /// A generated coordinate could not be represented in the target scalar.
    #[error("Failed to convert generated coordinate {value} to {to_type}")]
    ConversionFailed {
        /// The generated `f64` coordinate
        value: String,
        /// Target type name
        to_type: &'static str,
    },
}

/// Named input distributions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Distribution {
    /// Uniform in the unit cube.
    #[default]
    Uniform,
    /// Uniform in the ball of radius 0.5 centered in the cube.
    Ball,
    /// Uniform on the sphere of radius [`SPHERE_RADIUS`] centered in the cube.
    Sphere,
    /// Uniform in a spherical shell of relative thickness [`THIN_SPHERE_THICKNESS`].
    ThinSphere,
    /// Normal around the cube center with deviation [`GAUSSIAN_SIGMA`].
    Gaussian,
    /// Regular lattice filling the cube, row-major, truncated to the count.
    Grid,
}

impl std::fmt::Display for Distribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Uniform => "Uniform",
            Self::Ball => "Ball",
            Self::Sphere => "Sphere",
            Self::ThinSphere => "ThinSphere",
            Self::Gaussian => "Gaussian",
            Self::Grid => "Grid",
        };
        write!(f, "{name}")
    }
}

/// Generate `n_points` points from `distribution`, deterministically per `seed`.
///
/// # Errors
///
/// * [`PointGenerationError::InvalidPointCount`] if `n_points` is zero
/// * [`PointGenerationError::ConversionFailed`] if a coordinate does not fit `T`
///
/// # Examples
///
/// ```
/// use delaunay_audit::geometry::point_generation::{Distribution, generate_points};
///
/// let a = generate_points::<f64>(50, Distribution::Ball, 7).unwrap();
/// let b = generate_points::<f64>(50, Distribution::Ball, 7).unwrap();
/// assert_eq!(a, b);
/// assert!(generate_points::<f32>(0, Distribution::Uniform, 7).is_err());
/// ```
pub fn generate_points<T: CoordinateScalar>(
    n_points: usize,
    distribution: Distribution,
    seed: u64,
) -> Result<Vec<Point<T>>, PointGenerationError> {
    if n_points == 0 {
        return Err(PointGenerationError::InvalidPointCount { n_points });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let raw: Vec<[f64; 3]> = match distribution {
        Distribution::Grid => grid_points(n_points),
        _ => (0..n_points)
            .map(|_| sample(&mut rng, distribution))
            .collect(),
    };

    raw.into_iter()
        .map(|[x, y, z]| Ok(Point::new([to_scalar(x)?, to_scalar(y)?, to_scalar(z)?])))
        .collect::<Result<Vec<_>, PointGenerationError>>()
}

fn to_scalar<T: CoordinateScalar>(value: f64) -> Result<T, PointGenerationError> {
    cast(value).ok_or_else(|| PointGenerationError::ConversionFailed {
        value: format!("{value:?}"),
        to_type: std::any::type_name::<T>(),
    })
}

fn sample<R: Rng>(rng: &mut R, distribution: Distribution) -> [f64; 3] {
    match distribution {
        Distribution::Uniform | Distribution::Grid => [
            rng.random_range(0.0..1.0),
            rng.random_range(0.0..1.0),
            rng.random_range(0.0..1.0),
        ],
        Distribution::Ball => around_center(UnitBall.sample(rng), 0.5),
        Distribution::Sphere => around_center(UnitSphere.sample(rng), SPHERE_RADIUS),
        Distribution::ThinSphere => {
            let radius = SPHERE_RADIUS * (1.0 - THIN_SPHERE_THICKNESS * rng.random_range(0.0..1.0));
            around_center(UnitSphere.sample(rng), radius)
        }
        Distribution::Gaussian => {
            let v: [f64; 3] = [(); 3].map(|()| rng.sample(StandardNormal));
            around_center(v, GAUSSIAN_SIGMA)
        }
    }
}

fn around_center(v: [f64; 3], scale: f64) -> [f64; 3] {
    v.map(|c| c.mul_add(scale, 0.5))
}

fn grid_points(n_points: usize) -> Vec<[f64; 3]> {
    let mut side = 1_usize;
    while side.saturating_mul(side).saturating_mul(side) < n_points {
        side += 1;
    }
    let step = if side > 1 {
        1.0 / (side - 1) as f64
    } else {
        0.0
    };

    let mut points = Vec::with_capacity(n_points);
    'fill: for i in 0..side {
        for j in 0..side {
            for k in 0..side {
                if points.len() == n_points {
                    break 'fill;
                }
                points.push([i as f64 * step, j as f64 * step, k as f64 * step]);
            }
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center_distance<T: CoordinateScalar>(p: &Point<T>) -> f64 {
        let c = p.to_f64().unwrap();
        c.iter().map(|x| (x - 0.5).powi(2)).sum::<f64>().sqrt()
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        for dist in [
            Distribution::Uniform,
            Distribution::Ball,
            Distribution::Sphere,
            Distribution::ThinSphere,
            Distribution::Gaussian,
            Distribution::Grid,
        ] {
            let a = generate_points::<f64>(64, dist, 123_456_789).unwrap();
            let b = generate_points::<f64>(64, dist, 123_456_789).unwrap();
            assert_eq!(a, b, "{dist} not deterministic");
            assert_eq!(a.len(), 64);
        }
        let c = generate_points::<f64>(64, Distribution::Uniform, 1).unwrap();
        let d = generate_points::<f64>(64, Distribution::Uniform, 2).unwrap();
        assert_ne!(c, d);
    }

    #[test]
    fn ball_points_stay_in_ball() {
        let points = generate_points::<f64>(500, Distribution::Ball, 3).unwrap();
        assert!(points.iter().all(|p| center_distance(p) <= 0.5 + 1e-12));
    }

    #[test]
    fn sphere_points_lie_on_shells() {
        let sphere = generate_points::<f64>(200, Distribution::Sphere, 5).unwrap();
        assert!(
            sphere
                .iter()
                .all(|p| (center_distance(p) - SPHERE_RADIUS).abs() < 1e-9)
        );

        let shell = generate_points::<f32>(200, Distribution::ThinSphere, 5).unwrap();
        let inner = SPHERE_RADIUS * (1.0 - THIN_SPHERE_THICKNESS);
        assert!(shell.iter().all(|p| {
            let r = center_distance(p);
            r >= inner - 1e-6 && r <= SPHERE_RADIUS + 1e-6
        }));
    }

    #[test]
    fn gaussian_points_cluster_around_center() {
        let points = generate_points::<f64>(2000, Distribution::Gaussian, 17).unwrap();
        let mean: f64 = points.iter().map(|p| p.coords()[0]).sum::<f64>() / 2000.0;
        assert!((mean - 0.5).abs() < 0.02, "mean {mean}");
        let within_four_sigma = points
            .iter()
            .filter(|p| center_distance(*p) < 4.0 * GAUSSIAN_SIGMA)
            .count();
        assert!(within_four_sigma > 1950);
    }

    #[test]
    fn uniform_points_stay_in_cube() {
        let points = generate_points::<f32>(300, Distribution::Uniform, 11).unwrap();
        assert!(
            points
                .iter()
                .all(|p| p.coords().iter().all(|&c| (0.0..=1.0).contains(&c)))
        );
    }

    #[test]
    fn grid_fills_lattice_in_order() {
        let points = generate_points::<f64>(8, Distribution::Grid, 0).unwrap();
        assert_eq!(points[0].coords(), &[0.0, 0.0, 0.0]);
        assert_eq!(points[1].coords(), &[0.0, 0.0, 1.0]);
        assert_eq!(points[7].coords(), &[1.0, 1.0, 1.0]);

        let single = generate_points::<f64>(1, Distribution::Grid, 0).unwrap();
        assert_eq!(single[0].coords(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn zero_points_is_rejected() {
        assert_eq!(
            generate_points::<f64>(0, Distribution::Gaussian, 1),
            Err(PointGenerationError::InvalidPointCount { n_points: 0 })
        );
    }
}
