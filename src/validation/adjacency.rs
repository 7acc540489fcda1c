//! Adjacency check: stored neighbor links must agree with the facet sharing
//! derived from vertex indices.
//!
//! The facet → owners map is the ground truth. Every `(tetrahedron, facet)`
//! link is classified exactly once:
//! - consistent: the stored neighbor is the other owner of the facet, or both
//!   are absent on a legal boundary;
//! - asymmetric: the stored neighbor is missing, or is a tetrahedron that does
//!   contain the facet but is not its derived partner;
//! - foreign: the stored neighbor does not contain the facet at all.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::collections::{FacetIndex, FacetToTetsMap, SmallBuffer};
use crate::core::mesh::{Mesh, TetIndex};
use crate::geometry::traits::coordinate::CoordinateScalar;

/// One stored neighbor link, addressed by tetrahedron and local facet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdjacencyLink {
    /// Tetrahedron holding the link.
    pub tet: TetIndex,
    /// Local facet (index of the opposite vertex).
    pub facet: FacetIndex,
}

/// Result of the adjacency check.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyReport {
    /// Number of distinct facets.
    pub facets: usize,
    /// Number of stored links examined (four per tetrahedron).
    pub links_checked: usize,
    /// Facets with a single owner in a mesh without auxiliary vertices (legal).
    pub boundary_facets: usize,
    /// Facets with a single owner in a mesh that declares an auxiliary closure.
    pub open_facets: usize,
    /// Facets owned by more than two tetrahedra.
    pub overshared_facets: usize,
    /// Links that are missing or point at a non-partner owner of the facet.
    pub asymmetric_links: Vec<AdjacencyLink>,
    /// Links that point at a tetrahedron not containing the facet.
    pub foreign_links: Vec<AdjacencyLink>,
}

impl AdjacencyReport {
    /// Total number of violations across all categories.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.open_facets
            + self.overshared_facets
            + self.asymmetric_links.len()
            + self.foreign_links.len()
    }

    /// Returns `true` if no violation was found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violation_count() == 0
    }
}

/// Check neighbor links against facet sharing.
///
/// # Examples
///
/// ```
/// use delaunay_audit::core::mesh::{Mesh, Tetrahedron};
/// use delaunay_audit::geometry::point::Point;
/// use delaunay_audit::validation::adjacency::check_adjacency;
///
/// let points = vec![
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
///     Point::new([0.0, 0.0, 1.0]),
///     Point::new([1.0, 1.0, 1.0]),
/// ];
/// let tets = vec![
///     Tetrahedron::new([0, 1, 2, 3], [Some(1), None, None, None]),
///     Tetrahedron::new([4, 3, 2, 1], [Some(0), None, None, None]),
/// ];
/// let mesh = Mesh::new(points, tets, 0).unwrap();
/// let report = check_adjacency(&mesh);
/// assert!(report.is_valid());
/// assert_eq!(report.boundary_facets, 6);
/// ```
#[must_use]
pub fn check_adjacency<T: CoordinateScalar>(mesh: &Mesh<T>) -> AdjacencyReport {
    check_adjacency_with_facet_map(mesh, &mesh.build_facet_to_tets_map())
}

pub(crate) fn check_adjacency_with_facet_map<T: CoordinateScalar>(
    mesh: &Mesh<T>,
    facet_to_tets: &FacetToTetsMap,
) -> AdjacencyReport {
    let closed = mesh.auxiliary_count() > 0;
    let mut report = AdjacencyReport {
        facets: facet_to_tets.len(),
        ..AdjacencyReport::default()
    };

    for owners in facet_to_tets.values() {
        match owners.len() {
            1 if closed => report.open_facets += 1,
            1 => report.boundary_facets += 1,
            2 => {}
            _ => report.overshared_facets += 1,
        }
    }

    let tets = mesh.tetrahedra();
    for (tet_index, tet) in tets.iter().enumerate() {
        for (facet, &stored) in tet.neighbors.iter().enumerate() {
            report.links_checked += 1;
            let link = AdjacencyLink {
                tet: tet_index,
                // `facet` < 4
                facet: facet as FacetIndex,
            };
            let facet_verts = tet.facet_vertices(facet);
            let others: SmallBuffer<TetIndex, 2> = facet_to_tets
                .get(&tet.facet_key(facet))
                .into_iter()
                .flatten()
                .filter(|&&(t, f)| (t, usize::from(f)) != (tet_index, facet))
                .map(|&(t, _)| t)
                .collect();

            match stored {
                None if others.is_empty() => {}
                None => report.asymmetric_links.push(link),
                Some(neighbor) => {
                    let contains_facet = tets
                        .get(neighbor)
                        .is_some_and(|n| facet_verts.iter().all(|&v| n.contains_vertex(v)));
                    if !contains_facet {
                        report.foreign_links.push(link);
                    } else if neighbor == tet_index || !others.contains(&neighbor) {
                        report.asymmetric_links.push(link);
                    }
                }
            }
        }
    }

    debug!(
        facets = report.facets,
        links = report.links_checked,
        boundary = report.boundary_facets,
        "Adjacency check"
    );
    if !report.is_valid() {
        warn!(
            open = report.open_facets,
            overshared = report.overshared_facets,
            asymmetric = report.asymmetric_links.len(),
            foreign = report.foreign_links.len(),
            "Adjacency check failed"
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mesh::Tetrahedron;
    use crate::geometry::point::Point;

    fn points() -> Vec<Point<f64>> {
        vec![
            Point::new([0.0, 0.0, 0.0]),
            Point::new([1.0, 0.0, 0.0]),
            Point::new([0.0, 1.0, 0.0]),
            Point::new([0.0, 0.0, 1.0]),
            Point::new([1.0, 1.0, 1.0]),
            Point::new([-1.0, -1.0, -1.0]),
        ]
    }

    fn linked_pair() -> Vec<Tetrahedron> {
        vec![
            Tetrahedron::new([0, 1, 2, 3], [Some(1), None, None, None]),
            Tetrahedron::new([4, 3, 2, 1], [Some(0), None, None, None]),
        ]
    }

    #[test]
    fn missing_link_is_one_asymmetry() {
        let mut tets = linked_pair();
        tets[0].neighbors[0] = None;
        let report = check_adjacency(&Mesh::new(points(), tets, 0).unwrap());
        assert_eq!(
            report.asymmetric_links,
            vec![AdjacencyLink { tet: 0, facet: 0 }]
        );
        assert!(report.foreign_links.is_empty());
        assert_eq!(report.violation_count(), 1);
    }

    #[test]
    fn link_to_wrong_tetrahedron_is_foreign() {
        let mut tets = linked_pair();
        tets.push(Tetrahedron::without_neighbors([0, 1, 4, 5]));
        tets[1].neighbors[0] = Some(2);
        let report = check_adjacency(&Mesh::new(points(), tets, 0).unwrap());
        assert_eq!(report.foreign_links, vec![AdjacencyLink { tet: 1, facet: 0 }]);
        assert!(report.asymmetric_links.is_empty());
    }

    #[test]
    fn self_link_is_asymmetric() {
        let mut tets = linked_pair();
        tets[0].neighbors[1] = Some(0);
        let report = check_adjacency(&Mesh::new(points(), tets, 0).unwrap());
        assert_eq!(
            report.asymmetric_links,
            vec![AdjacencyLink { tet: 0, facet: 1 }]
        );
    }

    #[test]
    fn single_owner_facets_are_open_when_closure_is_declared() {
        let report = check_adjacency(&Mesh::new(points(), linked_pair(), 1).unwrap());
        assert_eq!(report.open_facets, 6);
        assert_eq!(report.boundary_facets, 0);
        assert!(!report.is_valid());
    }

    #[test]
    fn duplicated_tetrahedron_overshares_facets() {
        let mut tets = linked_pair();
        tets.push(tets[0]);
        let report = check_adjacency(&Mesh::new(points(), tets, 0).unwrap());
        // The shared facet now has three owners, the others two.
        assert_eq!(report.overshared_facets, 1);
        // Facets shared only by the two copies have no stored link on either side.
        assert_eq!(report.asymmetric_links.len(), 6);
        // Links across the over-shared facet name one of its two other owners.
        assert!(report.asymmetric_links.iter().all(|l| l.facet != 0));
        assert!(report.foreign_links.is_empty());
        assert!(!report.is_valid());
    }
}
