//! Orientation check: every finite tetrahedron must have the same, non-zero
//! orientation sign.
//!
//! Tetrahedra with an auxiliary vertex have no geometric orientation and are
//! skipped (counted in [`OrientationReport::skipped_auxiliary`]).

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::mesh::{Mesh, TetIndex};
use crate::geometry::kernel::Kernel;
use crate::geometry::predicates::Orientation;
use crate::validation::error::ValidationError;
use crate::validation::parallel::try_map_tetrahedra;

/// Expected orientation sign of every finite tetrahedron.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrientationConvention {
    /// `(v1 − v0) · ((v2 − v0) × (v3 − v0)) > 0`.
    #[default]
    Positive,
    /// `(v1 − v0) · ((v2 − v0) × (v3 − v0)) < 0`.
    Negative,
}

impl OrientationConvention {
    /// The predicate outcome a conforming tetrahedron produces.
    #[must_use]
    pub const fn expected(self) -> Orientation {
        match self {
            Self::Positive => Orientation::POSITIVE,
            Self::Negative => Orientation::NEGATIVE,
        }
    }
}

/// Result of the orientation check.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrientationReport {
    /// Convention the tetrahedra were checked against.
    pub convention: OrientationConvention,
    /// Number of finite tetrahedra evaluated.
    pub checked: usize,
    /// Number of tetrahedra skipped because they contain an auxiliary vertex.
    pub skipped_auxiliary: usize,
    /// Finite tetrahedra with the opposite sign, in ascending order.
    pub inverted: Vec<TetIndex>,
    /// Finite tetrahedra whose vertices are coplanar, in ascending order.
    pub degenerate: Vec<TetIndex>,
}

impl OrientationReport {
    /// Number of inverted tetrahedra.
    #[must_use]
    pub fn inverted_count(&self) -> usize {
        self.inverted.len()
    }

    /// Number of degenerate tetrahedra.
    #[must_use]
    pub fn degenerate_count(&self) -> usize {
        self.degenerate.len()
    }

    /// Total number of tetrahedra failing the check.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.inverted.len() + self.degenerate.len()
    }

    /// Returns `true` if no finite tetrahedron is inverted or degenerate.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violation_count() == 0
    }
}

enum TetOrientation {
    Auxiliary,
    Conforming,
    Inverted,
    Degenerate,
}

/// Check the orientation of every finite tetrahedron.
///
/// # Errors
///
/// Returns [`ValidationError::NumericPredicate`] if the kernel cannot evaluate
/// a tetrahedron.
///
/// # Examples
///
/// ```
/// use delaunay_audit::core::mesh::{Mesh, Tetrahedron};
/// use delaunay_audit::geometry::kernel::FastKernel;
/// use delaunay_audit::geometry::point::Point;
/// use delaunay_audit::validation::orientation::{OrientationConvention, check_orientation};
///
/// let points = vec![
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
///     Point::new([0.0, 0.0, 1.0]),
/// ];
/// let tets = vec![
///     Tetrahedron::without_neighbors([0, 1, 2, 3]),
///     Tetrahedron::without_neighbors([1, 0, 2, 3]),
/// ];
/// let mesh = Mesh::new(points, tets, 0).unwrap();
///
/// let kernel = FastKernel::<f64>::new();
/// let report = check_orientation(&mesh, &kernel, OrientationConvention::Positive).unwrap();
/// assert_eq!(report.checked, 2);
/// assert_eq!(report.inverted, vec![1]);
/// ```
pub fn check_orientation<K: Kernel>(
    mesh: &Mesh<K::Scalar>,
    kernel: &K,
    convention: OrientationConvention,
) -> Result<OrientationReport, ValidationError> {
    let expected = convention.expected();

    let outcomes = try_map_tetrahedra(mesh, |tet_index, tet| {
        let Some(points) = mesh.tet_points(tet) else {
            return Ok(TetOrientation::Auxiliary);
        };
        let orientation =
            kernel
                .orientation(&points)
                .map_err(|source| ValidationError::NumericPredicate {
                    tet: tet_index,
                    vertex: None,
                    source,
                })?;
        Ok(if orientation == expected {
            TetOrientation::Conforming
        } else if orientation == Orientation::DEGENERATE {
            TetOrientation::Degenerate
        } else {
            TetOrientation::Inverted
        })
    })?;

    let mut report = OrientationReport {
        convention,
        ..OrientationReport::default()
    };
    for (tet_index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            TetOrientation::Auxiliary => report.skipped_auxiliary += 1,
            TetOrientation::Conforming => report.checked += 1,
            TetOrientation::Inverted => {
                report.checked += 1;
                report.inverted.push(tet_index);
            }
            TetOrientation::Degenerate => {
                report.checked += 1;
                report.degenerate.push(tet_index);
            }
        }
    }

    debug!(
        checked = report.checked,
        skipped_auxiliary = report.skipped_auxiliary,
        inverted = report.inverted_count(),
        degenerate = report.degenerate_count(),
        "Orientation check"
    );
    if !report.is_valid() {
        warn!(
            inverted = report.inverted_count(),
            degenerate = report.degenerate_count(),
            "Orientation check failed"
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mesh::Tetrahedron;
    use crate::geometry::kernel::{FastKernel, RobustKernel};
    use crate::geometry::point::Point;

    fn points() -> Vec<Point<f64>> {
        vec![
            Point::new([0.0, 0.0, 0.0]),
            Point::new([1.0, 0.0, 0.0]),
            Point::new([0.0, 1.0, 0.0]),
            Point::new([0.0, 0.0, 1.0]),
            Point::new([1.0, 1.0, 0.0]),
        ]
    }

    #[test]
    fn auxiliary_tetrahedra_are_skipped() {
        let tets = vec![
            Tetrahedron::without_neighbors([0, 1, 2, 3]),
            Tetrahedron::without_neighbors([5, 1, 2, 3]),
        ];
        let mesh = Mesh::new(points(), tets, 1).unwrap();
        let report = check_orientation(
            &mesh,
            &FastKernel::<f64>::new(),
            OrientationConvention::Positive,
        )
        .unwrap();
        assert_eq!(report.checked, 1);
        assert_eq!(report.skipped_auxiliary, 1);
        assert!(report.is_valid());
    }

    #[test]
    fn negative_convention_flags_positive_tetrahedra() {
        let tets = vec![
            Tetrahedron::without_neighbors([0, 1, 2, 3]),
            Tetrahedron::without_neighbors([0, 2, 1, 3]),
        ];
        let mesh = Mesh::new(points(), tets, 0).unwrap();
        let report =
            check_orientation(&mesh, &RobustKernel::<f64>::new(), OrientationConvention::Negative)
                .unwrap();
        assert_eq!(report.inverted, vec![0]);
        assert_eq!(report.convention, OrientationConvention::Negative);
    }

    #[test]
    fn coplanar_tetrahedron_is_degenerate() {
        let tets = vec![Tetrahedron::without_neighbors([0, 1, 2, 4])];
        let mesh = Mesh::new(points(), tets, 0).unwrap();
        let report = check_orientation(
            &mesh,
            &FastKernel::<f64>::new(),
            OrientationConvention::Positive,
        )
        .unwrap();
        assert_eq!(report.degenerate, vec![0]);
        assert!(report.inverted.is_empty());
        assert!(!report.is_valid());
    }
}
