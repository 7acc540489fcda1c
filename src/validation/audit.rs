//! Aggregate audit: run every checker over one mesh snapshot.
//!
//! The checkers are independent; [`audit`] runs them in the order Euler,
//! orientation, adjacency, Delaunay and shares a single facet map between the
//! two combinatorial checks.

#![forbid(unsafe_code)]

use std::fmt;

use tracing::{debug, info};

use crate::config::AuditConfig;
use crate::core::mesh::Mesh;
use crate::geometry::kernel::{FastKernel, Kernel, RobustKernel};
use crate::geometry::traits::coordinate::CoordinateScalar;
use crate::topology::characteristics::validation::{EulerCheckResult, check_euler_with_facet_map};
use crate::validation::adjacency::{AdjacencyReport, check_adjacency_with_facet_map};
use crate::validation::delaunay::{DelaunayReport, check_delaunay};
use crate::validation::error::ValidationError;
use crate::validation::orientation::{OrientationReport, check_orientation};

/// The invariants checked by [`audit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InvariantKind {
    /// Euler characteristic of the mesh and of the finite hull surface.
    Euler,
    /// Consistent, non-degenerate orientation of finite tetrahedra.
    Orientation,
    /// Stored neighbor links agree with shared facets.
    Adjacency,
    /// Empty circumsphere property.
    Delaunay,
}

impl fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Euler => "Euler",
            Self::Orientation => "Orientation",
            Self::Adjacency => "Adjacency",
            Self::Delaunay => "Delaunay",
        };
        f.write_str(name)
    }
}

/// Combined result of the four checkers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditReport {
    /// Euler characteristic check.
    pub euler: EulerCheckResult,
    /// Orientation check.
    pub orientation: OrientationReport,
    /// Adjacency check.
    pub adjacency: AdjacencyReport,
    /// Delaunay check.
    pub delaunay: DelaunayReport,
}

impl AuditReport {
    /// Invariants that failed, in check order.
    #[must_use]
    pub fn failed_invariants(&self) -> Vec<InvariantKind> {
        [
            (InvariantKind::Euler, self.euler.is_valid()),
            (InvariantKind::Orientation, self.orientation.is_valid()),
            (InvariantKind::Adjacency, self.adjacency.is_valid()),
            (InvariantKind::Delaunay, self.delaunay.is_valid()),
        ]
        .into_iter()
        .filter_map(|(kind, ok)| (!ok).then_some(kind))
        .collect()
    }

    /// Returns `true` if every check passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.failed_invariants().is_empty()
    }
}

fn verdict(ok: bool) -> &'static str {
    if ok { "PASS" } else { "FAIL" }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let euler = &self.euler;
        writeln!(
            f,
            "Euler        {}  {} chi={} expected={}",
            verdict(euler.is_valid()),
            euler.counts,
            euler.chi,
            euler
                .expected
                .map_or_else(|| "-".to_string(), |e| e.to_string())
        )?;
        writeln!(
            f,
            "Orientation  {}  checked={} inverted={} degenerate={}",
            verdict(self.orientation.is_valid()),
            self.orientation.checked,
            self.orientation.inverted_count(),
            self.orientation.degenerate_count()
        )?;
        writeln!(
            f,
            "Adjacency    {}  facets={} open={} overshared={} asymmetric={} foreign={}",
            verdict(self.adjacency.is_valid()),
            self.adjacency.facets,
            self.adjacency.open_facets,
            self.adjacency.overshared_facets,
            self.adjacency.asymmetric_links.len(),
            self.adjacency.foreign_links.len()
        )?;
        write!(
            f,
            "Delaunay     {}  mode={} checked={} violating={}",
            verdict(self.delaunay.is_valid()),
            self.delaunay.mode,
            self.delaunay.checked,
            self.delaunay.violating_count()
        )
    }
}

/// Run every checker, choosing the kernel from `config.predicates`.
///
/// Adaptive configurations use [`RobustKernel`]; otherwise a [`FastKernel`]
/// with the configured relative tolerance. Tolerances are relative to each
/// determinant's magnitude bound, so one configuration serves `f32` and `f64`
/// meshes of any scale.
///
/// # Errors
///
/// Returns [`ValidationError`] if a geometric predicate cannot be evaluated.
///
/// # Examples
///
/// ```
/// use delaunay_audit::config::AuditConfig;
/// use delaunay_audit::core::mesh::{Mesh, Tetrahedron};
/// use delaunay_audit::geometry::point::Point;
/// use delaunay_audit::validation::audit::audit;
///
/// let points = vec![
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
///     Point::new([0.0, 0.0, 1.0]),
/// ];
/// let mesh = Mesh::new(points, vec![Tetrahedron::without_neighbors([0, 1, 2, 3])], 0).unwrap();
///
/// let report = audit(&mesh, &AuditConfig::default()).unwrap();
/// assert!(report.is_valid());
/// ```
pub fn audit<T: CoordinateScalar>(
    mesh: &Mesh<T>,
    config: &AuditConfig,
) -> Result<AuditReport, ValidationError> {
    if config.predicates.adaptive {
        audit_with_kernel(mesh, &RobustKernel::<T>::with_config(config.predicates), config)
    } else {
        audit_with_kernel(
            mesh,
            &FastKernel::<T>::with_tolerance(config.predicates.relative_tolerance),
            config,
        )
    }
}

/// Run every checker with an explicit kernel. `config.predicates` is ignored.
///
/// # Errors
///
/// Returns [`ValidationError`] if a geometric predicate cannot be evaluated.
pub fn audit_with_kernel<K: Kernel>(
    mesh: &Mesh<K::Scalar>,
    kernel: &K,
    config: &AuditConfig,
) -> Result<AuditReport, ValidationError> {
    debug!(
        points = mesh.point_count(),
        auxiliary = mesh.auxiliary_count(),
        tetrahedra = mesh.tet_count(),
        "Auditing mesh"
    );

    let facet_to_tets = mesh.build_facet_to_tets_map();
    let euler = check_euler_with_facet_map(mesh, &facet_to_tets, config.expected_euler);
    let orientation = check_orientation(mesh, kernel, config.orientation)?;
    let adjacency = check_adjacency_with_facet_map(mesh, &facet_to_tets);
    let delaunay = check_delaunay(mesh, kernel, config.delaunay_mode)?;

    let report = AuditReport {
        euler,
        orientation,
        adjacency,
        delaunay,
    };
    info!(
        valid = report.is_valid(),
        failed = ?report.failed_invariants(),
        "Audit finished"
    );
    Ok(report)
}
