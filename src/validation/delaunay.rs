//! Delaunay empty-circumsphere property validation.
//!
//! For every finite tetrahedron, no other vertex may lie strictly inside its
//! circumsphere. Two modes are available:
//! - [`DelaunayMode::Exhaustive`]: test every other finite vertex (`O(T·V)`),
//!   meant for auditing modest meshes;
//! - [`DelaunayMode::NeighborLocal`]: test only the opposite vertex of each
//!   stored neighbor, the local condition a flip-based constructor guarantees.
//!
//! A vertex on the sphere (within the kernel tolerance) is not a violation.
//! Flat tetrahedra define no sphere and are counted in
//! [`DelaunayReport::degenerate_skipped`].

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::collections::SmallBuffer;
use crate::core::mesh::{Mesh, TetIndex, Tetrahedron, VertexIndex};
use crate::geometry::kernel::Kernel;
use crate::geometry::point::Point;
use crate::geometry::predicates::{InSphere, Orientation};
use crate::geometry::traits::coordinate::{CoordinateConversionError, CoordinateScalar};
use crate::validation::error::ValidationError;
use crate::validation::parallel::try_map_tetrahedra;

/// Which vertices a tetrahedron's circumsphere is tested against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DelaunayMode {
    /// Every other finite vertex of the mesh.
    Exhaustive,
    /// The opposite vertex of each stored neighbor; auxiliary vertices skipped.
    #[default]
    NeighborLocal,
}

impl std::fmt::Display for DelaunayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhaustive => write!(f, "exhaustive"),
            Self::NeighborLocal => write!(f, "neighbor-local"),
        }
    }
}

/// A vertex found strictly inside a tetrahedron's circumsphere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DelaunayViolation {
    /// The tetrahedron whose circumsphere is not empty.
    pub tet: TetIndex,
    /// The offending vertex.
    pub vertex: VertexIndex,
}

/// Result of the Delaunay check.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelaunayReport {
    /// Mode the check ran in.
    pub mode: DelaunayMode,
    /// Number of finite, non-degenerate tetrahedra tested.
    pub checked: usize,
    /// Number of tetrahedra skipped because they contain an auxiliary vertex.
    pub skipped_auxiliary: usize,
    /// Number of flat tetrahedra skipped because they have no circumsphere.
    pub degenerate_skipped: usize,
    /// Tetrahedra with at least one violation, ascending.
    pub violating_tets: Vec<TetIndex>,
    /// Every offending `(tet, vertex)` pair, ordered by tetrahedron then vertex.
    pub violations: Vec<DelaunayViolation>,
}

impl DelaunayReport {
    /// Number of tetrahedra with a non-empty circumsphere.
    #[must_use]
    pub fn violating_count(&self) -> usize {
        self.violating_tets.len()
    }

    /// Returns `true` if every tested circumsphere is empty.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violating_tets.is_empty()
    }
}

enum TetOutcome {
    Auxiliary,
    Degenerate,
    Checked(SmallBuffer<VertexIndex, 4>),
}

/// Check the empty-circumsphere property.
///
/// # Errors
///
/// Returns [`ValidationError::NumericPredicate`] if the kernel cannot evaluate
/// a predicate.
///
/// # Examples
///
/// ```
/// use delaunay_audit::core::mesh::{Mesh, Tetrahedron};
/// use delaunay_audit::geometry::kernel::FastKernel;
/// use delaunay_audit::geometry::point::Point;
/// use delaunay_audit::validation::delaunay::{DelaunayMode, check_delaunay};
///
/// let points = vec![
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
///     Point::new([0.0, 0.0, 1.0]),
///     Point::new([0.25, 0.25, 0.25]), // inside the circumsphere
/// ];
/// let mesh = Mesh::new(points, vec![Tetrahedron::without_neighbors([0, 1, 2, 3])], 0).unwrap();
///
/// let kernel = FastKernel::<f64>::new();
/// let report = check_delaunay(&mesh, &kernel, DelaunayMode::Exhaustive).unwrap();
/// assert_eq!(report.violating_tets, vec![0]);
/// assert_eq!(report.violations[0].vertex, 4);
/// ```
pub fn check_delaunay<K: Kernel>(
    mesh: &Mesh<K::Scalar>,
    kernel: &K,
    mode: DelaunayMode,
) -> Result<DelaunayReport, ValidationError> {
    let outcomes = try_map_tetrahedra(mesh, |tet_index, tet| {
        let Some(points) = mesh.tet_points(tet) else {
            return Ok(TetOutcome::Auxiliary);
        };
        let predicate_error = |vertex, source| ValidationError::NumericPredicate {
            tet: tet_index,
            vertex,
            source,
        };

        let orientation = kernel
            .orientation(&points)
            .map_err(|source| predicate_error(None, source))?;
        if orientation == Orientation::DEGENERATE {
            return Ok(TetOutcome::Degenerate);
        }

        let mut offending = SmallBuffer::<VertexIndex, 4>::new();
        for vertex in candidate_vertices(mesh, tet, mode) {
            let Some(test_point) = mesh.point(vertex) else {
                continue;
            };
            if inside(kernel, &points, test_point)
                .map_err(|source| predicate_error(Some(vertex), source))?
                && !offending.contains(&vertex)
            {
                offending.push(vertex);
            }
        }
        offending.sort_unstable();
        Ok(TetOutcome::Checked(offending))
    })?;

    let mut report = DelaunayReport {
        mode,
        ..DelaunayReport::default()
    };
    for (tet_index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            TetOutcome::Auxiliary => report.skipped_auxiliary += 1,
            TetOutcome::Degenerate => report.degenerate_skipped += 1,
            TetOutcome::Checked(offending) => {
                report.checked += 1;
                if !offending.is_empty() {
                    report.violating_tets.push(tet_index);
                    report
                        .violations
                        .extend(offending.into_iter().map(|vertex| DelaunayViolation {
                            tet: tet_index,
                            vertex,
                        }));
                }
            }
        }
    }

    debug!(
        %mode,
        checked = report.checked,
        skipped_auxiliary = report.skipped_auxiliary,
        degenerate_skipped = report.degenerate_skipped,
        violating = report.violating_count(),
        "Delaunay check"
    );
    if !report.is_valid() {
        warn!(
            %mode,
            violating = report.violating_count(),
            violations = report.violations.len(),
            "Delaunay check failed"
        );
    }

    Ok(report)
}

fn inside<K: Kernel>(
    kernel: &K,
    simplex: &[Point<K::Scalar>; 4],
    test_point: &Point<K::Scalar>,
) -> Result<bool, CoordinateConversionError> {
    Ok(kernel.in_sphere(simplex, test_point)? == InSphere::INSIDE)
}

/// Vertices to test against `tet`'s circumsphere (may include auxiliary
/// indices, which the caller skips).
fn candidate_vertices<'a, T: CoordinateScalar>(
    mesh: &'a Mesh<T>,
    tet: &'a Tetrahedron,
    mode: DelaunayMode,
) -> Box<dyn Iterator<Item = VertexIndex> + 'a> {
    match mode {
        DelaunayMode::Exhaustive => {
            Box::new((0..mesh.point_count()).filter(move |&v| !tet.contains_vertex(v)))
        }
        DelaunayMode::NeighborLocal => Box::new(
            tet.neighbors
                .iter()
                .flatten()
                .filter_map(move |&n| mesh.tetrahedron(n))
                .flat_map(move |neighbor| {
                    neighbor
                        .vertices
                        .into_iter()
                        .filter(move |&v| !tet.contains_vertex(v))
                }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::kernel::{FastKernel, RobustKernel};

    fn unit_points(extra: [f64; 3]) -> Vec<Point<f64>> {
        vec![
            Point::new([0.0, 0.0, 0.0]),
            Point::new([1.0, 0.0, 0.0]),
            Point::new([0.0, 1.0, 0.0]),
            Point::new([0.0, 0.0, 1.0]),
            Point::new(extra),
        ]
    }

    #[test]
    fn neighbor_local_flags_both_sides_of_a_bad_facet() {
        // Tet 1 shares facet {1,2,3} with tet 0. Each opposite vertex lies
        // inside the other tetrahedron's circumsphere.
        let tets = vec![
            Tetrahedron::new([0, 1, 2, 3], [Some(1), None, None, None]),
            Tetrahedron::new([4, 2, 1, 3], [Some(0), None, None, None]),
        ];
        let mesh = Mesh::new(unit_points([0.6, 0.6, 0.6]), tets, 0).unwrap();
        let report =
            check_delaunay(&mesh, &FastKernel::<f64>::new(), DelaunayMode::NeighborLocal).unwrap();
        assert_eq!(report.checked, 2);
        assert_eq!(report.violating_tets, vec![0, 1]);
        assert_eq!(
            report.violations,
            vec![
                DelaunayViolation { tet: 0, vertex: 4 },
                DelaunayViolation { tet: 1, vertex: 0 },
            ]
        );
    }

    #[test]
    fn neighbor_local_ignores_unlinked_vertices() {
        let mesh = Mesh::new(
            unit_points([0.25, 0.25, 0.25]),
            vec![Tetrahedron::without_neighbors([0, 1, 2, 3])],
            0,
        )
        .unwrap();
        let local =
            check_delaunay(&mesh, &RobustKernel::<f64>::new(), DelaunayMode::NeighborLocal)
                .unwrap();
        assert!(local.is_valid());
        let exhaustive =
            check_delaunay(&mesh, &RobustKernel::<f64>::new(), DelaunayMode::Exhaustive).unwrap();
        assert!(!exhaustive.is_valid());
    }

    #[test]
    fn cospherical_vertex_is_not_a_violation() {
        let mesh = Mesh::new(
            unit_points([1.0, 1.0, 0.0]),
            vec![Tetrahedron::without_neighbors([0, 1, 2, 3])],
            0,
        )
        .unwrap();
        let report = check_delaunay(
            &mesh,
            &FastKernel::<f64>::with_tolerance(1e-12),
            DelaunayMode::Exhaustive,
        )
        .unwrap();
        assert!(report.is_valid());
        assert_eq!(report.checked, 1);
    }

    #[test]
    fn auxiliary_and_degenerate_tetrahedra_are_skipped() {
        let tets = vec![
            Tetrahedron::without_neighbors([0, 1, 2, 5]),
            Tetrahedron::without_neighbors([0, 1, 2, 4]),
        ];
        // Vertex 4 at (1,1,0) makes tet 1 flat.
        let mesh = Mesh::new(unit_points([1.0, 1.0, 0.0]), tets, 1).unwrap();
        let report =
            check_delaunay(&mesh, &FastKernel::<f64>::new(), DelaunayMode::Exhaustive).unwrap();
        assert_eq!(report.skipped_auxiliary, 1);
        assert_eq!(report.degenerate_skipped, 1);
        assert_eq!(report.checked, 0);
        assert!(report.is_valid());
    }

    #[test]
    fn auxiliary_opposite_vertex_is_skipped() {
        let tets = vec![
            Tetrahedron::new([0, 1, 2, 3], [Some(1), None, None, None]),
            Tetrahedron::new([5, 2, 1, 3], [Some(0), None, None, None]),
        ];
        let mesh = Mesh::new(unit_points([9.0, 9.0, 9.0]), tets, 1).unwrap();
        let report =
            check_delaunay(&mesh, &FastKernel::<f64>::new(), DelaunayMode::NeighborLocal).unwrap();
        assert_eq!(report.checked, 1);
        assert_eq!(report.skipped_auxiliary, 1);
        assert!(report.is_valid());
    }
}
