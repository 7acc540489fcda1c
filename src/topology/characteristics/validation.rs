//! Euler characteristic check for tetrahedral meshes.
//!
//! Combines simplex counting, classification, and the hull-surface count into
//! one report. The check never aborts: mismatches are recorded in
//! [`EulerCheckResult::notes`] and reflected by [`EulerCheckResult::is_valid`].

use tracing::{debug, warn};

use crate::core::collections::FacetToTetsMap;
use crate::core::mesh::Mesh;
use crate::geometry::traits::coordinate::CoordinateScalar;
use crate::topology::characteristics::euler::{
    FVector, TopologyClassification, classify_mesh, count_hull_simplices,
    count_simplices_with_facet_map, euler_characteristic, expected_chi_for,
};

/// Euler characteristic of a 2-sphere, expected for the hull surface.
pub const HULL_EXPECTED_CHI: isize = 2;

/// Result of Euler characteristic validation.
///
/// # Examples
///
/// ```rust
/// use delaunay_audit::core::mesh::{Mesh, Tetrahedron};
/// use delaunay_audit::geometry::point::Point;
/// use delaunay_audit::topology::characteristics::validation;
///
/// let points = vec![
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
///     Point::new([0.0, 0.0, 1.0]),
/// ];
/// let mesh = Mesh::new(points, vec![Tetrahedron::without_neighbors([0, 1, 2, 3])], 0).unwrap();
///
/// let result = validation::check_euler(&mesh);
/// assert_eq!(result.chi, 1);
/// assert_eq!(result.hull_chi, 2);
/// assert!(result.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EulerCheckResult {
    /// Full simplex counts (f-vector) of the mesh, auxiliary vertices included.
    pub counts: FVector,

    /// Computed Euler characteristic V − E + F − C.
    pub chi: isize,

    /// Expected χ (from an override or the classification; None if undeterminable).
    pub expected: Option<isize>,

    /// Topological classification.
    pub classification: TopologyClassification,

    /// Simplex counts of the hull surface of the finite sub-complex.
    pub hull_counts: FVector,

    /// Euler characteristic V − E + F of the hull surface.
    pub hull_chi: isize,

    /// Expected hull χ (2, or None when no tetrahedron is finite).
    pub hull_expected: Option<isize>,

    /// Diagnostic notes or warnings.
    pub notes: Vec<String>,
}

impl EulerCheckResult {
    /// Returns `true` if χ and the hull χ both match expectation.
    ///
    /// A result without a volumetric expectation (non-manifold mesh) is never
    /// valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.expected.is_some_and(|exp| self.chi == exp)
            && self.hull_expected.is_none_or(|exp| self.hull_chi == exp)
    }
}

/// Run the Euler check with the expectation derived from the classification.
#[must_use]
pub fn check_euler<T: CoordinateScalar>(mesh: &Mesh<T>) -> EulerCheckResult {
    check_euler_with_expected(mesh, None)
}

/// Run the Euler check, optionally overriding the expected volumetric χ.
///
/// # Examples
///
/// ```rust
/// use delaunay_audit::core::mesh::{Mesh, Tetrahedron};
/// use delaunay_audit::geometry::point::Point;
/// use delaunay_audit::topology::characteristics::validation::check_euler_with_expected;
///
/// let points = vec![
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
///     Point::new([0.0, 0.0, 1.0]),
/// ];
/// let mesh = Mesh::new(points, vec![Tetrahedron::without_neighbors([0, 1, 2, 3])], 0).unwrap();
///
/// let result = check_euler_with_expected(&mesh, Some(2));
/// assert!(!result.is_valid());
/// assert_eq!(result.notes.len(), 1);
/// ```
#[must_use]
pub fn check_euler_with_expected<T: CoordinateScalar>(
    mesh: &Mesh<T>,
    expected_override: Option<isize>,
) -> EulerCheckResult {
    let facet_to_tets = if mesh.is_empty() {
        FacetToTetsMap::default()
    } else {
        mesh.build_facet_to_tets_map()
    };
    check_euler_with_facet_map(mesh, &facet_to_tets, expected_override)
}

pub(crate) fn check_euler_with_facet_map<T: CoordinateScalar>(
    mesh: &Mesh<T>,
    facet_to_tets: &FacetToTetsMap,
    expected_override: Option<isize>,
) -> EulerCheckResult {
    let counts = count_simplices_with_facet_map(mesh, facet_to_tets);
    let chi = euler_characteristic(&counts);
    let classification = classify_mesh(mesh, facet_to_tets);
    let expected = expected_override.or_else(|| expected_chi_for(&classification));

    let hull_counts = count_hull_simplices(mesh);
    let hull_chi = euler_characteristic(&hull_counts);
    let hull_expected = mesh
        .finite_tetrahedra()
        .next()
        .is_some()
        .then_some(HULL_EXPECTED_CHI);

    let mut notes = Vec::new();
    if let TopologyClassification::NonManifold { overshared_facets } = classification {
        notes.push(format!(
            "{overshared_facets} facets are owned by more than two tetrahedra"
        ));
    }
    if let Some(exp) = expected.filter(|&exp| chi != exp) {
        notes.push(format!(
            "Euler characteristic mismatch: computed {chi}, expected {exp}"
        ));
    }
    if let Some(exp) = hull_expected.filter(|&exp| hull_chi != exp) {
        notes.push(format!(
            "Hull Euler characteristic mismatch: computed {hull_chi}, expected {exp}"
        ));
    }

    debug!(
        counts = %counts,
        chi,
        ?expected,
        %classification,
        hull_chi,
        "Euler check"
    );
    for note in &notes {
        warn!("{note}");
    }

    EulerCheckResult {
        counts,
        chi,
        expected,
        classification,
        hull_counts,
        hull_chi,
        hull_expected,
        notes,
    }
}
